//! Trait seams to the external stores.
//!
//! The key registry and the credential store are owned by the hosting
//! application's persistence layer; this core only reads and writes through
//! these traits, one record per call.

use crate::credential::CredentialRecord;
use crate::keys::{KeyId, KeyRecord, Purpose};
use crate::payload::{EncryptedCredentialData, LegacyEncryptedData};
use std::borrow::Cow;

/// A specialized [`StoreError`] enum for external-store failures.
#[cvault_derive::cvault_error]
pub enum StoreError {
    /// Backend transport or query failure.
    #[error("Store backend error{}: {message}", format_context(.context))]
    Backend { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed record does not exist.
    #[error("Record not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Read access to the key registry.
///
/// The registry maps key identity and version to metadata and a derivation
/// fingerprint. At most one record per purpose is active at any time; that
/// invariant is enforced by the provisioning process, and
/// [`KeyRegistry::active_records`] returns everything flagged active so the
/// caller can reject violations instead of silently picking one.
#[allow(async_fn_in_trait)]
pub trait KeyRegistry {
    /// Looks up one key record by identity and version.
    async fn find(&self, key_id: KeyId, version: u32) -> Result<Option<KeyRecord>, StoreError>;

    /// Returns every record flagged active for the purpose.
    async fn active_records(&self, purpose: &Purpose) -> Result<Vec<KeyRecord>, StoreError>;
}

/// Read/write access to credential rows, scoped to one record per call.
#[allow(async_fn_in_trait)]
pub trait CredentialStore {
    /// Fetches one record by id.
    async fn fetch(&self, id: &str) -> Result<Option<CredentialRecord>, StoreError>;

    /// Returns up to `limit` records with `is_migrated_to_v2 = false`.
    async fn list_unmigrated(&self, limit: usize) -> Result<Vec<CredentialRecord>, StoreError>;

    /// Returns every record with `is_migrated_to_v2 = true`.
    async fn list_migrated(&self) -> Result<Vec<CredentialRecord>, StoreError>;

    /// Total number of credential records.
    async fn count_total(&self) -> Result<u64, StoreError>;

    /// Number of records with `is_migrated_to_v2 = true`.
    async fn count_migrated(&self) -> Result<u64, StoreError>;

    /// Writes the versioned columns for `id` and sets the discriminator.
    ///
    /// Fails with [`StoreError::NotFound`] when the record does not exist.
    async fn store_versioned(
        &self,
        id: &str,
        data: &EncryptedCredentialData,
    ) -> Result<(), StoreError>;

    /// Writes the legacy columns for `id` and clears the discriminator.
    ///
    /// Fails with [`StoreError::NotFound`] when the record does not exist.
    async fn store_legacy(&self, id: &str, data: &LegacyEncryptedData) -> Result<(), StoreError>;
}
