//! Lockout policy: per-identity failed-attempt counting and the time-bounded
//! lock state machine.
//!
//! The policy is the only code that touches attempt counters and the lock
//! fields on an account. The engine calls [`LockoutPolicy::gate`] before any
//! password work and [`LockoutPolicy::record`] with the verification outcome,
//! both under a single acquisition of the engine's state lock, so a
//! read-and-decide can never race a mutate.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::auth::error::AuthError;
use crate::auth::store::CredentialStore;

pub const MAX_LOGIN_ATTEMPTS: u32 = 3;
pub const LOCKOUT_DURATION: Duration = Duration::from_secs(60);

/// Decision taken before a verification attempt is allowed to proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Open,
    Locked,
}

/// Verification outcome reported back to the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// State change produced by recording an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    None,
    Locked,
}

#[derive(Debug)]
pub struct LockoutPolicy {
    max_attempts: u32,
    lockout: Duration,
    attempts: HashMap<String, u32>,
}

impl LockoutPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            max_attempts,
            lockout,
            attempts: HashMap::new(),
        }
    }

    /// Gate a login attempt before the password is even checked.
    ///
    /// A locked account whose window has not elapsed is rejected without
    /// consuming an attempt. Once the window has elapsed the account is
    /// unlocked, the counter reset, and the attempt proceeds as a normal
    /// verification.
    ///
    /// # Errors
    /// Returns `UserNotFound` when the identity is not registered.
    pub fn gate(
        &mut self,
        store: &mut CredentialStore,
        identity: &str,
        now: Instant,
    ) -> Result<Gate, AuthError> {
        let account = store.find(identity)?;
        if !account.locked {
            return Ok(Gate::Open);
        }

        match account.locked_at {
            Some(since) if now.duration_since(since) < self.lockout => Ok(Gate::Locked),
            _ => {
                store.update_lock_state(identity, false, None)?;
                self.attempts.remove(identity);
                Ok(Gate::Open)
            }
        }
    }

    /// Record the outcome of a password verification.
    ///
    /// Success resets the counter. Failure increments it; reaching
    /// `max_attempts` locks the account, stamps the failure time, and reports
    /// the transition so the engine can emit exactly one audit event.
    ///
    /// # Errors
    /// Returns `UserNotFound` when the identity is not registered.
    pub fn record(
        &mut self,
        store: &mut CredentialStore,
        identity: &str,
        outcome: AttemptOutcome,
        now: Instant,
    ) -> Result<Transition, AuthError> {
        match outcome {
            AttemptOutcome::Success => {
                self.attempts.remove(identity);
                Ok(Transition::None)
            }
            AttemptOutcome::Failure => {
                let count = self.attempts.entry(identity.to_string()).or_insert(0);
                *count += 1;
                if *count >= self.max_attempts {
                    store.update_lock_state(identity, true, Some(now))?;
                    Ok(Transition::Locked)
                } else {
                    Ok(Transition::None)
                }
            }
        }
    }

    /// Consecutive failures recorded for an identity since the last reset.
    #[must_use]
    pub fn failures(&self, identity: &str) -> u32 {
        self.attempts.get(identity).copied().unwrap_or(0)
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(MAX_LOGIN_ATTEMPTS, LOCKOUT_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::Account;

    const IDENTITY: &str = "a@b.com";

    fn store_with_account() -> CredentialStore {
        let mut store = CredentialStore::new();
        store
            .register(Account::new(
                IDENTITY.to_string(),
                "$argon2id$stub".to_string(),
                "ABC123".to_string(),
            ))
            .expect("register");
        store
    }

    #[test]
    fn failures_below_threshold_do_not_lock() {
        let mut store = store_with_account();
        let mut policy = LockoutPolicy::default();
        let now = Instant::now();

        for expected in 1..MAX_LOGIN_ATTEMPTS {
            let transition = policy
                .record(&mut store, IDENTITY, AttemptOutcome::Failure, now)
                .expect("record");
            assert_eq!(transition, Transition::None);
            assert_eq!(policy.failures(IDENTITY), expected);
        }
        assert!(!store.find(IDENTITY).expect("find").locked);
    }

    #[test]
    fn third_failure_locks_and_stamps_failure_time() {
        let mut store = store_with_account();
        let mut policy = LockoutPolicy::default();
        let now = Instant::now();

        let mut transitions = Vec::new();
        for _ in 0..MAX_LOGIN_ATTEMPTS {
            transitions.push(
                policy
                    .record(&mut store, IDENTITY, AttemptOutcome::Failure, now)
                    .expect("record"),
            );
        }

        assert_eq!(
            transitions,
            vec![Transition::None, Transition::None, Transition::Locked]
        );
        let account = store.find(IDENTITY).expect("find");
        assert!(account.locked);
        assert_eq!(account.locked_at, Some(now));
    }

    #[test]
    fn success_resets_the_counter() {
        let mut store = store_with_account();
        let mut policy = LockoutPolicy::default();
        let now = Instant::now();

        policy
            .record(&mut store, IDENTITY, AttemptOutcome::Failure, now)
            .expect("record");
        policy
            .record(&mut store, IDENTITY, AttemptOutcome::Failure, now)
            .expect("record");
        policy
            .record(&mut store, IDENTITY, AttemptOutcome::Success, now)
            .expect("record");
        assert_eq!(policy.failures(IDENTITY), 0);

        // counting starts over after the reset
        let transition = policy
            .record(&mut store, IDENTITY, AttemptOutcome::Failure, now)
            .expect("record");
        assert_eq!(transition, Transition::None);
        assert_eq!(policy.failures(IDENTITY), 1);
    }

    #[test]
    fn gate_rejects_inside_the_window() {
        let mut store = store_with_account();
        let mut policy = LockoutPolicy::default();
        let locked_at = Instant::now();

        for _ in 0..MAX_LOGIN_ATTEMPTS {
            policy
                .record(&mut store, IDENTITY, AttemptOutcome::Failure, locked_at)
                .expect("record");
        }

        let just_before = locked_at + LOCKOUT_DURATION - Duration::from_secs(1);
        assert_eq!(
            policy.gate(&mut store, IDENTITY, just_before).expect("gate"),
            Gate::Locked
        );
        assert!(store.find(IDENTITY).expect("find").locked);
    }

    #[test]
    fn gate_unlocks_once_the_window_elapses() {
        let mut store = store_with_account();
        let mut policy = LockoutPolicy::default();
        let locked_at = Instant::now();

        for _ in 0..MAX_LOGIN_ATTEMPTS {
            policy
                .record(&mut store, IDENTITY, AttemptOutcome::Failure, locked_at)
                .expect("record");
        }

        let elapsed = locked_at + LOCKOUT_DURATION;
        assert_eq!(
            policy.gate(&mut store, IDENTITY, elapsed).expect("gate"),
            Gate::Open
        );

        let account = store.find(IDENTITY).expect("find");
        assert!(!account.locked);
        assert!(account.locked_at.is_none());
        assert_eq!(policy.failures(IDENTITY), 0);
    }

    #[test]
    fn gate_is_open_for_unlocked_accounts() {
        let mut store = store_with_account();
        let mut policy = LockoutPolicy::default();
        assert_eq!(
            policy
                .gate(&mut store, IDENTITY, Instant::now())
                .expect("gate"),
            Gate::Open
        );
    }

    #[test]
    fn unknown_identity_is_reported() {
        let mut store = CredentialStore::new();
        let mut policy = LockoutPolicy::default();
        assert!(matches!(
            policy.gate(&mut store, "missing@b.com", Instant::now()),
            Err(AuthError::UserNotFound)
        ));
    }
}
