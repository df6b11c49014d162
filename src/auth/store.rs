//! In-memory account store. Pure keyed access, unique key = identity; no
//! hashing or policy logic lives here.

use std::collections::HashMap;
use std::time::Instant;

use crate::auth::error::AuthError;

/// A registered account. The credential hash is set exactly once at creation
/// and the plaintext secret is never stored.
#[derive(Debug, Clone)]
pub struct Account {
    pub identity: String,
    pub credential_hash: String,
    pub two_factor_code: String,
    pub locked: bool,
    /// Monotonic timestamp of the failure that triggered the lock.
    pub locked_at: Option<Instant>,
}

impl Account {
    #[must_use]
    pub fn new(identity: String, credential_hash: String, two_factor_code: String) -> Self {
        Self {
            identity,
            credential_hash,
            two_factor_code,
            locked: false,
            locked_at: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: HashMap<String, Account>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new account.
    ///
    /// # Errors
    /// Returns `DuplicateIdentity` when the identity is already present.
    pub fn register(&mut self, account: Account) -> Result<(), AuthError> {
        if self.accounts.contains_key(&account.identity) {
            return Err(AuthError::DuplicateIdentity);
        }
        self.accounts.insert(account.identity.clone(), account);
        Ok(())
    }

    /// # Errors
    /// Returns `UserNotFound` when the identity is not registered.
    pub fn find(&self, identity: &str) -> Result<&Account, AuthError> {
        self.accounts.get(identity).ok_or(AuthError::UserNotFound)
    }

    /// # Errors
    /// Returns `UserNotFound` when the identity is not registered.
    pub fn update_lock_state(
        &mut self,
        identity: &str,
        locked: bool,
        locked_at: Option<Instant>,
    ) -> Result<(), AuthError> {
        let account = self.find_mut(identity)?;
        account.locked = locked;
        account.locked_at = locked_at;
        Ok(())
    }

    /// Overwrite the stored two-factor code.
    ///
    /// # Errors
    /// Returns `UserNotFound` when the identity is not registered.
    pub fn update_two_factor_code(
        &mut self,
        identity: &str,
        code: String,
    ) -> Result<(), AuthError> {
        self.find_mut(identity)?.two_factor_code = code;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn find_mut(&mut self, identity: &str) -> Result<&mut Account, AuthError> {
        self.accounts
            .get_mut(identity)
            .ok_or(AuthError::UserNotFound)
    }
}
