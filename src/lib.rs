//! # Sentinelo
//!
//! Account authentication service: signup with email-format identities, a
//! password stage guarded by a time-bounded lockout policy, and a second
//! one-time code before a session is granted.
//!
//! The authentication state machine lives in [`auth`]; the HTTP surface in
//! [`sentinelo`] is a thin adapter over it and the CLI in [`cli`] only wires
//! configuration and logging.

pub mod auth;
pub mod cli;
pub mod sentinelo;
