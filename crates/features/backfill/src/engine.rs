use crate::error::{MigrationError, MigrationErrorExt};
use crate::types::{
    BackfillError, BackfillResult, BackfillStatus, CancellationFlag, CredentialValidation,
    RunOutcome, ValidationResult,
};
use chrono::{DateTime, Utc};
use cvault_crypto::{CredentialPayload, DualReadCipher, LegacyCipher};
use cvault_domain::{CredentialRecord, CredentialStore, KeyRegistry, Purpose};
use fxhash::FxHashSet;
use parking_lot::Mutex;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// One-way batch migration from the legacy to the versioned format.
///
/// Sequential by design: records are processed one at a time so per-record
/// diagnostics stay attributable and peak key-derivation cost stays bounded.
/// Coordination of concurrent runs is the caller's responsibility; two
/// overlapping runs waste work but cannot corrupt a record, since every
/// write is a full self-consistent payload.
pub struct BackfillEngine<S, R> {
    store: S,
    cipher: DualReadCipher<R>,
    legacy: LegacyCipher,
    purpose: Purpose,
    last_run: Mutex<Option<DateTime<Utc>>>,
}

impl<S, R> std::fmt::Debug for BackfillEngine<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackfillEngine")
            .field("purpose", &self.purpose)
            .field("last_run", &*self.last_run.lock())
            .finish_non_exhaustive()
    }
}

impl<S, R> BackfillEngine<S, R>
where
    S: CredentialStore,
    R: KeyRegistry,
{
    /// `legacy` is held separately from the dual cipher: the only legacy
    /// *write* in the system is [`revert_credential`](Self::revert_credential),
    /// and routing it through [`DualReadCipher`] would undo the one-way
    /// migration guarantee that type enforces.
    pub fn new(store: S, cipher: DualReadCipher<R>, legacy: LegacyCipher) -> Self {
        Self {
            store,
            cipher,
            legacy,
            purpose: Purpose::CREDENTIAL_PASSWORD,
            last_run: Mutex::new(None),
        }
    }

    /// Overrides the key purpose used for re-encryption.
    #[must_use]
    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Migrates up to `batch_size` unmigrated records.
    ///
    /// Per-record failures are captured into the result and never abort the
    /// batch; only a failure to list candidates aborts the run. The
    /// cancellation flag is checked between records, never mid-record.
    ///
    /// # Errors
    /// [`MigrationError::Store`] when listing candidate records fails.
    pub async fn execute_backfill(
        &self,
        batch_size: usize,
        cancellation: &CancellationFlag,
    ) -> Result<BackfillResult, MigrationError> {
        let started_at = Utc::now();
        let mut errors = Vec::new();
        let mut migrated: u64 = 0;
        let mut attempted = FxHashSet::default();
        let mut cancelled = false;

        info!(batch_size, "Backfill run started");

        // Failed records stay unmigrated, so a single listing pass would
        // return them again on the next call. Drain in pages, skipping ids
        // already attempted this run, until the batch is full or the store
        // has nothing new.
        'scan: while attempted.len() < batch_size {
            let page = self
                .store
                .list_unmigrated(batch_size - attempted.len())
                .await
                .context("Listing unmigrated credentials")?;

            let fresh: Vec<CredentialRecord> =
                page.into_iter().filter(|r| !attempted.contains(&r.id)).collect();
            if fresh.is_empty() {
                break;
            }

            for record in fresh {
                if cancellation.is_cancelled() {
                    info!(processed = attempted.len(), "Backfill run cancelled");
                    cancelled = true;
                    break 'scan;
                }

                attempted.insert(record.id.clone());
                match self.migrate_one(&record).await {
                    Ok(()) => migrated += 1,
                    Err(error) => {
                        warn!(
                            credential = %record.id,
                            %error,
                            "Credential failed to migrate, continuing batch"
                        );
                        errors.push(BackfillError {
                            credential_id: record.id,
                            credential_name: record.name,
                            message: error.to_string(),
                            occurred_at: Utc::now(),
                        });
                    }
                }
            }
        }

        let is_complete = !cancelled
            && self
                .store
                .list_unmigrated(1)
                .await
                .context("Scanning for remaining credentials")?
                .is_empty();

        *self.last_run.lock() = Some(started_at);

        let processed = attempted.len() as u64;
        let failed = errors.len() as u64;
        let result = BackfillResult {
            processed,
            migrated,
            failed,
            errors,
            outcome: if failed == 0 { RunOutcome::Completed } else { RunOutcome::PartiallyFailed },
            is_complete,
            started_at,
            duration_ms: u64::try_from((Utc::now() - started_at).num_milliseconds())
                .unwrap_or_default(),
        };

        info!(
            processed = result.processed,
            migrated = result.migrated,
            failed = result.failed,
            is_complete = result.is_complete,
            "Backfill run finished"
        );
        Ok(result)
    }

    /// Decrypt, re-encrypt, write back, then verify by decrypting the
    /// just-written payload and comparing byte-for-byte. On a verification
    /// mismatch the original legacy payload is restored before the error is
    /// reported, so the record never persists an unreadable state.
    async fn migrate_one(&self, record: &CredentialRecord) -> Result<(), MigrationError> {
        let plaintext = Zeroizing::new(self.cipher.decrypt(record).await?);

        let data = self.cipher.encrypt_with_enterprise(&plaintext, &self.purpose).await?;
        self.store.store_versioned(&record.id, &data).await?;

        let written = self
            .store
            .fetch(&record.id)
            .await?
            .ok_or_else(|| MigrationError::Internal {
                message: "Credential disappeared between write and verification".into(),
                context: None,
            })?;
        let roundtrip = Zeroizing::new(self.cipher.decrypt(&written).await?);

        if *roundtrip != *plaintext {
            if let CredentialPayload::Legacy(original) = CredentialPayload::resolve(record)? {
                self.store.store_legacy(&record.id, &original).await?;
            }
            return Err(MigrationError::Internal {
                message: "Verification mismatch after migration. Legacy payload restored".into(),
                context: None,
            });
        }

        Ok(())
    }

    /// Migration progress from store counters plus the last run timestamp.
    pub async fn get_status(&self) -> Result<BackfillStatus, MigrationError> {
        let total = self.store.count_total().await.context("Counting credentials")?;
        let migrated = self.store.count_migrated().await.context("Counting migrated credentials")?;

        Ok(BackfillStatus {
            total,
            migrated,
            pending: total.saturating_sub(migrated),
            percent_complete: percent_complete(migrated, total),
            last_run: *self.last_run.lock(),
        })
    }

    /// Probes every migrated credential for decryptability through both
    /// formats, so an operator can confirm a safe window before purging
    /// legacy columns.
    pub async fn validate_migrated_credentials(&self) -> Result<ValidationResult, MigrationError> {
        let records =
            self.store.list_migrated().await.context("Listing migrated credentials")?;

        let mut items = Vec::with_capacity(records.len());
        for record in records {
            let can_decrypt_enterprise = self.cipher.can_decrypt(&record).await;

            // The legacy probe runs on a view of the record with the
            // discriminator flipped, since dispatch follows the flag.
            let can_decrypt_legacy = if record.has_legacy_fields() {
                let mut legacy_view = record.clone();
                legacy_view.is_migrated_to_v2 = false;
                self.cipher.can_decrypt(&legacy_view).await
            } else {
                false
            };

            items.push(CredentialValidation {
                credential_id: record.id,
                credential_name: record.name,
                can_decrypt_legacy,
                can_decrypt_enterprise,
            });
        }

        Ok(ValidationResult { checked: items.len() as u64, items, ran_at: Utc::now() })
    }

    /// Rolls a single migrated credential back to the legacy format.
    ///
    /// Returns `false` for an unknown or still-unmigrated id. Single-record
    /// on purpose, to bound the blast radius of a bad migration.
    pub async fn revert_credential(&self, id: &str) -> Result<bool, MigrationError> {
        let Some(record) = self.store.fetch(id).await.context("Fetching credential")? else {
            return Ok(false);
        };
        if !record.is_migrated_to_v2 {
            return Ok(false);
        }

        let plaintext = Zeroizing::new(self.cipher.decrypt(&record).await?);
        let legacy_data = self.legacy.encrypt(&plaintext)?;
        self.store.store_legacy(id, &legacy_data).await?;

        info!(credential = %id, "Credential reverted to legacy format");
        Ok(true)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent_complete(migrated: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = migrated as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::percent_complete;

    #[test]
    fn percent_is_rounded_to_two_decimals() {
        assert!((percent_complete(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((percent_complete(2, 3) - 66.67).abs() < f64::EPSILON);
        assert!((percent_complete(3, 3) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_is_zero_for_empty_store() {
        assert!((percent_complete(0, 0) - 0.0).abs() < f64::EPSILON);
    }
}
