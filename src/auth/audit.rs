//! Audit sink seam. Lock transitions are the auditable events; the sink is
//! append-only and must not stall the engine.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct AuditEvent {
    pub identity: String,
    pub message: String,
    /// Wall-clock timestamp; lockout timing itself stays on the monotonic clock.
    pub at: DateTime<Utc>,
}

impl AuditEvent {
    #[must_use]
    pub fn now(identity: &str, message: &str) -> Self {
        Self {
            identity: identity.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Emits audit events as structured log lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        tracing::info!(
            target: "audit",
            identity = %event.identity,
            at = %event.at.to_rfc3339(),
            "{}",
            event.message
        );
    }
}

/// Append-only file sink, flushed per event so no event is lost on abrupt
/// termination.
#[derive(Debug)]
pub struct FileAuditSink {
    file: Mutex<File>,
}

impl FileAuditSink {
    /// # Errors
    /// Returns an error if the file cannot be opened for appending.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open audit log at {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        let Ok(mut file) = self.file.lock() else {
            warn!("audit log lock poisoned, dropping event");
            return;
        };
        let line = format!(
            "[{}] User: {} - {}\n",
            event.at.to_rfc3339(),
            event.identity,
            event.message
        );
        if file
            .write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .is_err()
        {
            warn!(identity = %event.identity, "failed to append audit event");
        }
    }
}

/// Collects events in memory so tests can assert on emissions.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
