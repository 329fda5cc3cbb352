#![allow(dead_code)]

use cvault_crypto::prelude::*;
use cvault_domain::{
    CredentialRecord, CredentialStore, EncryptedCredentialData, KeyId, KeyIdentity, KeyRecord,
    KeyRegistry, LegacyEncryptedData, MasterSecret, Purpose, StoreError,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const MASTER: &str = "0123456789abcdef0123456789abcdef";

/// In-memory key registry with one active record for the credential purpose.
pub struct MemoryKeyRegistry {
    records: Vec<KeyRecord>,
}

impl MemoryKeyRegistry {
    #[must_use]
    pub fn single_active() -> Self {
        Self {
            records: vec![KeyRecord {
                identity: KeyIdentity::new(
                    KeyId::from_bytes(*b"fixture-key-id-0"),
                    1,
                    Purpose::CREDENTIAL_PASSWORD,
                ),
                algorithm: "AES-256-GCM".into(),
                is_active: true,
                fingerprint: b"fixture-fingerprint".to_vec(),
            }],
        }
    }
}

impl KeyRegistry for MemoryKeyRegistry {
    async fn find(&self, key_id: KeyId, version: u32) -> Result<Option<KeyRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.identity.key_id == key_id && r.identity.version == version)
            .cloned())
    }

    async fn active_records(&self, purpose: &Purpose) -> Result<Vec<KeyRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_active && r.identity.purpose == *purpose)
            .cloned()
            .collect())
    }
}

/// In-memory credential store keyed by id, ordered for deterministic
/// listing.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    records: Arc<RwLock<BTreeMap<String, CredentialRecord>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: CredentialRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<CredentialRecord> {
        self.records.read().get(id).cloned()
    }

    /// Makes a stored record undecryptable by corrupting its legacy blob.
    /// # Panics
    /// * If the id is unknown or the record has no legacy payload.
    pub fn corrupt_legacy_payload(&self, id: &str) {
        let mut records = self.records.write();
        let record = records.get_mut(id).expect("Unknown credential id");
        let payload = record.encrypted_password.as_mut().expect("No legacy payload");
        *payload = "!!not-base64!!".into();
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn fetch(&self, id: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn list_unmigrated(&self, limit: usize) -> Result<Vec<CredentialRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| !r.is_migrated_to_v2)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_migrated(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        Ok(self.records.read().values().filter(|r| r.is_migrated_to_v2).cloned().collect())
    }

    async fn count_total(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().len() as u64)
    }

    async fn count_migrated(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().values().filter(|r| r.is_migrated_to_v2).count() as u64)
    }

    async fn store_versioned(
        &self,
        id: &str,
        data: &EncryptedCredentialData,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(id).ok_or_else(|| StoreError::NotFound {
            message: format!("No credential '{id}'").into(),
            context: None,
        })?;
        record.apply_versioned(data);
        Ok(())
    }

    async fn store_legacy(&self, id: &str, data: &LegacyEncryptedData) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(id).ok_or_else(|| StoreError::NotFound {
            message: format!("No credential '{id}'").into(),
            context: None,
        })?;
        record.apply_legacy(data);
        Ok(())
    }
}

/// Builds the cipher stack over a single-active-key registry.
/// # Panics
/// * If the master secret fixture is rejected, the function will panic.
#[must_use]
pub fn setup_ciphers() -> (DualReadCipher<MemoryKeyRegistry>, LegacyCipher) {
    let master = MasterSecret::new(MASTER).expect("Master secret fixture invalid");
    let legacy = LegacyCipher::new(master.clone());
    let keys = KeyManager::new(master, MemoryKeyRegistry::single_active());
    (DualReadCipher::new(legacy.clone(), VersionedCipher::new(keys)), legacy)
}

/// Seeds `count` legacy credentials named `cred-1..=count` with
/// predictable plaintexts `password-<n>`.
pub fn seed_legacy_credentials(store: &MemoryCredentialStore, legacy: &LegacyCipher, count: usize) {
    for n in 1..=count {
        let data = legacy.encrypt(format!("password-{n}").as_bytes()).expect("Seeding failed");
        store.insert(CredentialRecord::legacy(
            format!("cred-{n}"),
            format!("service-{n}"),
            &data,
        ));
    }
}
