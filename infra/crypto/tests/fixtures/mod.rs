#![allow(dead_code)]

use cvault_crypto::prelude::*;
use cvault_domain::{
    KeyId, KeyIdentity, KeyRecord, KeyRegistry, MasterSecret, Purpose, StoreError,
};

pub const MASTER: &str = "0123456789abcdef0123456789abcdef";

/// In-memory key registry seeded with fixed records.
pub struct MemoryKeyRegistry {
    records: Vec<KeyRecord>,
}

impl MemoryKeyRegistry {
    #[must_use]
    pub fn new(records: Vec<KeyRecord>) -> Self {
        Self { records }
    }

    /// One active v2 record plus a retired v1 for the credential purpose.
    #[must_use]
    pub fn with_rotation_history() -> Self {
        Self::new(vec![key_record(1, false), key_record(2, true)])
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

#[must_use]
pub fn key_record(version: u32, is_active: bool) -> KeyRecord {
    KeyRecord {
        identity: KeyIdentity::new(test_key_id(), version, Purpose::CREDENTIAL_PASSWORD),
        algorithm: "AES-256-GCM".into(),
        is_active,
        fingerprint: b"fixture-fingerprint".to_vec(),
    }
}

#[must_use]
pub fn test_key_id() -> KeyId {
    KeyId::from_bytes(*b"fixture-key-id-0")
}

/// Builds the full cipher stack over [`MemoryKeyRegistry::with_rotation_history`].
/// # Panics
/// * If the master secret fixture is rejected, the function will panic.
#[must_use]
pub fn setup_cipher() -> DualReadCipher<MemoryKeyRegistry> {
    let master = MasterSecret::new(MASTER).expect("Master secret fixture invalid");
    let keys = KeyManager::new(master.clone(), MemoryKeyRegistry::with_rotation_history());
    DualReadCipher::new(LegacyCipher::new(master), VersionedCipher::new(keys))
}
