use crate::auth::{
    audit::{AuditSink, FileAuditSink, TracingAuditSink},
    clock::SystemClock,
    validate::EmailValidator,
    AuthEngine, EngineConfig,
};
use crate::cli::actions::Action;
use crate::sentinelo;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            max_attempts,
            lockout_seconds,
            audit_log,
        } => {
            let audit: Arc<dyn AuditSink> = match audit_log {
                Some(path) => Arc::new(FileAuditSink::open(Path::new(&path))?),
                None => Arc::new(TracingAuditSink),
            };

            let config = EngineConfig::new()
                .with_max_attempts(max_attempts)
                .with_lockout(Duration::from_secs(lockout_seconds));

            let engine = Arc::new(AuthEngine::new(
                config,
                Arc::new(EmailValidator),
                audit,
                Arc::new(SystemClock),
            ));

            sentinelo::new(port, engine).await?;
        }
    }

    Ok(())
}
