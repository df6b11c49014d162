//! Error taxonomy for the authentication boundary.
//!
//! Every engine operation returns one of these discriminated outcomes; all of
//! them are recoverable by the caller. Nothing panics across this boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity is already registered")]
    DuplicateIdentity,

    #[error("invalid identity")]
    InvalidIdentity,

    #[error("password does not meet the minimum length")]
    WeakPassword,

    #[error("user not found")]
    UserNotFound,

    #[error("account is locked, try again later")]
    AccountLocked,

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid two-factor code")]
    InvalidCode,

    #[error("login challenge unknown or expired")]
    ChallengeExpired,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
