use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One captured per-record failure. Never aborts the batch it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillError {
    pub credential_id: String,
    pub credential_name: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Terminal state of one backfill run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every processed record migrated cleanly.
    Completed,
    /// At least one record failed and was captured.
    PartiallyFailed,
}

/// Summary of one `execute_backfill` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillResult {
    pub processed: u64,
    pub migrated: u64,
    pub failed: u64,
    pub errors: Vec<BackfillError>,
    pub outcome: RunOutcome,
    /// `true` only when a post-run scan finds zero unmigrated records.
    pub is_complete: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Migration progress counters, for operator dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillStatus {
    pub total: u64,
    pub migrated: u64,
    pub pending: u64,
    /// Rounded to two decimals; `0` when no records exist.
    pub percent_complete: f64,
    pub last_run: Option<DateTime<Utc>>,
}

/// Per-record decrypt capabilities of a migrated credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialValidation {
    pub credential_id: String,
    pub credential_name: String,
    /// Whether the retained legacy columns still decrypt.
    pub can_decrypt_legacy: bool,
    /// Whether the versioned payload decrypts.
    pub can_decrypt_enterprise: bool,
}

/// Outcome of a validation sweep over all migrated credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub checked: u64,
    pub items: Vec<CredentialValidation>,
    pub ran_at: DateTime<Utc>,
}

impl ValidationResult {
    /// `true` when every migrated credential decrypts through the versioned
    /// path, the precondition for purging legacy columns.
    #[must_use]
    pub fn all_enterprise_readable(&self) -> bool {
        self.items.iter().all(|item| item.can_decrypt_enterprise)
    }
}

/// Cooperative cancellation signal, checked between records.
///
/// A record's migrate-verify-write sequence is atomic with respect to
/// cancellation; the flag only stops the run at record boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
