//! Authentication engine: orchestrates signup and the two-stage login.
//!
//! The engine owns the store, the lockout policy, and the parked second-factor
//! challenges behind one async mutex; every per-identity read-modify-write
//! happens under a single lock acquisition.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ulid::Ulid;
use uuid::Uuid;

use crate::auth::audit::{AuditEvent, AuditSink, TracingAuditSink};
use crate::auth::clock::{Clock, SystemClock};
use crate::auth::code;
use crate::auth::error::AuthError;
use crate::auth::lockout::{AttemptOutcome, Gate, LockoutPolicy, Transition};
use crate::auth::password;
use crate::auth::store::{Account, CredentialStore};
use crate::auth::validate::{EmailValidator, IdentityValidator};

/// Audit message emitted on every lock transition.
pub const LOCKOUT_MESSAGE: &str = "Account locked due to too many failed login attempts";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_LOCKOUT_SECONDS: u64 = 60;
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
const DEFAULT_CHALLENGE_TTL_SECONDS: u64 = 5 * 60;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    max_attempts: u32,
    lockout: Duration,
    min_password_length: usize,
    challenge_ttl: Duration,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout: Duration::from_secs(DEFAULT_LOCKOUT_SECONDS),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            challenge_ttl: Duration::from_secs(DEFAULT_CHALLENGE_TTL_SECONDS),
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_lockout(mut self, lockout: Duration) -> Self {
        self.lockout = lockout;
        self
    }

    #[must_use]
    pub fn with_min_password_length(mut self, min_password_length: usize) -> Self {
        self.min_password_length = min_password_length;
        self
    }

    #[must_use]
    pub fn with_challenge_ttl(mut self, challenge_ttl: Duration) -> Self {
        self.challenge_ttl = challenge_ttl;
        self
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn lockout(&self) -> Duration {
        self.lockout
    }

    #[must_use]
    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    #[must_use]
    pub fn challenge_ttl(&self) -> Duration {
        self.challenge_ttl
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a successful signup; the code is returned to the caller for
/// out-of-band delivery.
#[derive(Clone, Debug)]
pub struct SignUp {
    pub identity: String,
    pub two_factor_code: String,
}

/// Handle for the parked second-factor stage of a login.
#[derive(Clone, Copy, Debug)]
pub struct LoginChallenge {
    pub login_id: Uuid,
}

/// Proof of full authentication: password plus second factor.
#[derive(Clone, Debug)]
pub struct Session {
    pub identity: String,
    pub token: String,
}

struct PendingLogin {
    identity: String,
    created_at: Instant,
}

struct EngineState {
    store: CredentialStore,
    lockout: LockoutPolicy,
    pending: HashMap<Uuid, PendingLogin>,
}

pub struct AuthEngine {
    config: EngineConfig,
    state: Mutex<EngineState>,
    validator: Arc<dyn IdentityValidator>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
}

impl AuthEngine {
    #[must_use]
    pub fn new(
        config: EngineConfig,
        validator: Arc<dyn IdentityValidator>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = EngineState {
            store: CredentialStore::new(),
            lockout: LockoutPolicy::new(config.max_attempts(), config.lockout()),
            pending: HashMap::new(),
        };
        Self {
            config,
            state: Mutex::new(state),
            validator,
            audit,
            clock,
        }
    }

    /// Engine with the stock collaborators: email identities, audit events as
    /// log lines, process monotonic clock.
    #[must_use]
    pub fn with_defaults(config: EngineConfig) -> Self {
        Self::new(
            config,
            Arc::new(EmailValidator),
            Arc::new(TracingAuditSink),
            Arc::new(SystemClock),
        )
    }

    /// Register a new account and issue its first two-factor code.
    ///
    /// The plaintext password is not retained beyond this call; only the
    /// derived credential is stored.
    ///
    /// # Errors
    /// `InvalidIdentity`, `WeakPassword`, or `DuplicateIdentity`.
    pub async fn sign_up(
        &self,
        identity: &str,
        password: &SecretString,
    ) -> Result<SignUp, AuthError> {
        if !self.validator.is_valid(identity) {
            return Err(AuthError::InvalidIdentity);
        }
        if !password::acceptable(password, self.config.min_password_length()) {
            return Err(AuthError::WeakPassword);
        }

        let credential_hash = password::derive(password)?;
        let two_factor_code = code::generate();

        let mut state = self.state.lock().await;
        state.store.register(Account::new(
            identity.to_string(),
            credential_hash,
            two_factor_code.clone(),
        ))?;
        debug!(identity, "account registered");

        Ok(SignUp {
            identity: identity.to_string(),
            two_factor_code,
        })
    }

    /// First login stage: resolve the account, apply the lockout gate, verify
    /// the password, and park a second-factor challenge on success.
    ///
    /// # Errors
    /// `UserNotFound`, `AccountLocked` while the window holds, or
    /// `InvalidPassword` (which may transition the account to locked).
    pub async fn login_start(
        &self,
        identity: &str,
        password: &SecretString,
    ) -> Result<LoginChallenge, AuthError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let EngineState {
            store,
            lockout,
            pending,
        } = &mut *state;

        if lockout.gate(store, identity, now)? == Gate::Locked {
            debug!(identity, "attempt rejected, account locked");
            return Err(AuthError::AccountLocked);
        }

        let credential_hash = store.find(identity)?.credential_hash.clone();
        if !password::verify(password, &credential_hash) {
            let transition = lockout.record(store, identity, AttemptOutcome::Failure, now)?;
            if transition == Transition::Locked {
                warn!(identity, "account locked after repeated failures");
                self.audit.record(&AuditEvent::now(identity, LOCKOUT_MESSAGE));
            }
            return Err(AuthError::InvalidPassword);
        }
        lockout.record(store, identity, AttemptOutcome::Success, now)?;

        pending.retain(|_, entry| now.duration_since(entry.created_at) < self.config.challenge_ttl());
        let login_id = Uuid::new_v4();
        pending.insert(
            login_id,
            PendingLogin {
                identity: identity.to_string(),
                created_at: now,
            },
        );
        debug!(identity, %login_id, "password verified, awaiting second factor");

        Ok(LoginChallenge { login_id })
    }

    /// Second login stage: check the submitted code against the stored one.
    ///
    /// A wrong code keeps the challenge alive so the caller can retry or
    /// request a resend.
    ///
    /// # Errors
    /// `ChallengeExpired` for an unknown or expired handle, `InvalidCode` on
    /// mismatch.
    pub async fn login_verify(&self, login_id: Uuid, code: &str) -> Result<Session, AuthError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let identity = self.pending_identity(&mut state, login_id, now)?;
        let account = state.store.find(&identity)?;
        if account.two_factor_code != code {
            debug!(identity, "second factor mismatch");
            return Err(AuthError::InvalidCode);
        }

        state.pending.remove(&login_id);
        let token = Ulid::new().to_string();
        info!(identity, "authenticated");
        Ok(Session { identity, token })
    }

    /// Re-deliver the stored two-factor code for a pending login.
    ///
    /// The code is returned as-is: resend does not rotate. Rotation exists
    /// only as the explicit [`AuthEngine::rotate_code`] operation.
    ///
    /// # Errors
    /// `ChallengeExpired` for an unknown or expired handle.
    pub async fn login_resend(&self, login_id: Uuid) -> Result<String, AuthError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let identity = self.pending_identity(&mut state, login_id, now)?;
        let code = state.store.find(&identity)?.two_factor_code.clone();
        debug!(identity, "re-delivering stored second factor");
        Ok(code)
    }

    /// Replace the stored two-factor code with a freshly generated one.
    ///
    /// # Errors
    /// `UserNotFound` when the identity is not registered.
    pub async fn rotate_code(&self, identity: &str) -> Result<String, AuthError> {
        let code = code::generate();
        let mut state = self.state.lock().await;
        state
            .store
            .update_two_factor_code(identity, code.clone())?;
        debug!(identity, "two-factor code rotated");
        Ok(code)
    }

    /// Number of registered accounts.
    pub async fn account_count(&self) -> usize {
        self.state.lock().await.store.len()
    }

    fn pending_identity(
        &self,
        state: &mut EngineState,
        login_id: Uuid,
        now: Instant,
    ) -> Result<String, AuthError> {
        let Some(entry) = state.pending.get(&login_id) else {
            return Err(AuthError::ChallengeExpired);
        };
        if now.duration_since(entry.created_at) >= self.config.challenge_ttl() {
            state.pending.remove(&login_id);
            return Err(AuthError::ChallengeExpired);
        }
        Ok(entry.identity.clone())
    }
}
