pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

pub mod login;
pub use self::login::{login_resend, login_start, login_verify};

pub mod openapi;
pub use self::openapi::openapi;

// common functions for the handlers
use axum::http::StatusCode;

use crate::auth::AuthError;

/// Map domain outcomes onto transport status codes.
#[must_use]
pub fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidIdentity | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
        AuthError::DuplicateIdentity => StatusCode::CONFLICT,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::AccountLocked => StatusCode::LOCKED,
        AuthError::InvalidPassword | AuthError::InvalidCode | AuthError::ChallengeExpired => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(super) fn error_response(err: &AuthError) -> (StatusCode, String) {
    let status = status_for(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("internal error: {err}");
        return (status, "Internal error".to_string());
    }
    (status, err.to_string())
}
