//! # Domain
//!
//! Shared domain model for the credential vault core: key identities and
//! registry records, the two encrypted payload shapes (legacy and versioned),
//! the credential store row, and the trait seams to the external key-registry
//! and credential stores.
//!
//! Nothing in this crate performs cryptography; it defines the data the
//! crypto and backfill layers operate on, plus settings loading for the
//! process-wide master secret.

pub mod config;
mod credential;
mod keys;
mod payload;
pub mod store;

pub use config::{MasterSecret, SettingsError, SettingsErrorExt, VaultSettings, load_settings};
pub use credential::CredentialRecord;
pub use keys::{KeyId, KeyIdentity, KeyRecord, Purpose};
pub use payload::{
    EncryptedCredentialData, IV_LEN, KEY_LEN, LegacyEncryptedData, SALT_LEN, TAG_LEN,
};
pub use store::{CredentialStore, KeyRegistry, StoreError, StoreErrorExt};
