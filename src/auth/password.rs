//! Credential derivation: one-way transformation of a plaintext secret into
//! the stored comparison value. Argon2id with PHC string storage.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};

/// Minimum policy: length only, no other complexity rule.
#[must_use]
pub fn acceptable(password: &SecretString, min_length: usize) -> bool {
    password.expose_secret().chars().count() >= min_length
}

/// Derive the stored comparison value from a plaintext secret.
///
/// # Errors
/// Returns an error if the hasher rejects its input.
pub fn derive(password: &SecretString) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|err| anyhow!("credential derivation failed: {err}"))?;
    Ok(hash.to_string())
}

/// Compare a plaintext secret against a stored PHC string.
#[must_use]
pub fn verify(password: &SecretString, credential_hash: &str) -> bool {
    PasswordHash::new(credential_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok()
    })
}
