//! One-way backfill of credentials from the legacy encrypted format to the
//! versioned one, plus the operator tooling around it: progress status, a
//! validation sweep over migrated records, and single-record revert.
//!
//! Each record is migrated atomically from the engine's perspective:
//! decrypt, re-encrypt, write, verify, with the original payload restored on
//! a verification mismatch. A failing record is captured and skipped, never
//! allowed to abort the batch.

mod engine;
mod error;
mod types;

pub use engine::BackfillEngine;
pub use error::{MigrationError, MigrationErrorExt};
pub use types::{
    BackfillError, BackfillResult, BackfillStatus, CancellationFlag, CredentialValidation,
    RunOutcome, ValidationResult,
};

pub mod prelude {
    pub use crate::engine::BackfillEngine;
    pub use crate::error::{MigrationError, MigrationErrorExt};
    pub use crate::types::{BackfillResult, BackfillStatus, CancellationFlag, ValidationResult};
}
