//! Authentication core: credential store, lockout policy, code generation,
//! and the engine that orchestrates them.

pub mod audit;
pub mod clock;
pub mod code;
pub mod engine;
pub mod error;
pub mod lockout;
pub mod password;
pub mod store;
pub mod validate;

pub use self::engine::{AuthEngine, EngineConfig, LoginChallenge, Session, SignUp};
pub use self::error::AuthError;
