//! Identity validation seam. The engine consults a validator before signup;
//! the syntax rule itself is a collaborator, not core policy.

use regex::Regex;

pub trait IdentityValidator: Send + Sync {
    fn is_valid(&self, identity: &str) -> bool;
}

/// Email-format validation: local part, `@`, domain containing a dot.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmailValidator;

impl IdentityValidator for EmailValidator {
    fn is_valid(&self, identity: &str) -> bool {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(identity))
    }
}

/// Accepts every identity. Useful for tests that target lockout behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopValidator;

impl IdentityValidator for NoopValidator {
    fn is_valid(&self, _identity: &str) -> bool {
        true
    }
}
