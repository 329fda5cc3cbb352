use crate::error::{CryptoError, CryptoErrorExt};
use crate::kdf::{self, DerivedKey};
use cvault_domain::{KeyId, KeyIdentity, KeyRegistry, MasterSecret, Purpose};
use tracing::warn;

/// Resolves registry records into derived key material.
///
/// The registry stores identities and fingerprints only, never key bytes.
/// Actual material is re-derived on demand from the master secret plus the
/// record's derivation context, so a registry leak on its own discloses
/// nothing usable.
#[derive(Debug, Clone)]
pub struct KeyManager<R> {
    master: MasterSecret,
    registry: R,
}

impl<R: KeyRegistry> KeyManager<R> {
    pub const fn new(master: MasterSecret, registry: R) -> Self {
        Self { master, registry }
    }

    /// Resolves the single active key for `purpose` and derives its material.
    ///
    /// # Errors
    /// [`CryptoError::NoActiveKey`] when zero or more than one active record
    /// exists. Multiple active records mean the rotation procedure was left
    /// half-finished, and picking one silently would make encryption
    /// nondeterministic across nodes.
    pub async fn active_key(
        &self,
        purpose: &Purpose,
    ) -> Result<(KeyIdentity, DerivedKey), CryptoError> {
        let records = self
            .registry
            .active_records(purpose)
            .await
            .context("Resolving active key records")?;

        let record = match records.as_slice() {
            [single] => single,
            [] => {
                return Err(CryptoError::NoActiveKey {
                    message: format!("No active key for purpose '{purpose}'").into(),
                    context: None,
                });
            }
            many => {
                warn!(
                    purpose = %purpose,
                    count = many.len(),
                    "Multiple active key records, refusing to choose"
                );
                return Err(CryptoError::NoActiveKey {
                    message: format!(
                        "{} active keys for purpose '{purpose}'. Expected exactly one",
                        many.len()
                    )
                    .into(),
                    context: None,
                });
            }
        };

        let key = kdf::derive_versioned_key(
            &self.master,
            record.identity.key_id,
            record.identity.version,
            &record.fingerprint,
        )?;

        Ok((record.identity.clone(), key))
    }

    /// Derives material for a specific key identity, active or retired.
    ///
    /// # Errors
    /// [`CryptoError::UnknownKey`] when no registry record matches.
    pub async fn key(&self, key_id: KeyId, version: u32) -> Result<DerivedKey, CryptoError> {
        let record = self
            .registry
            .find(key_id, version)
            .await
            .context("Looking up key record")?
            .ok_or_else(|| CryptoError::UnknownKey {
                message: format!("No registry record for key {key_id} v{version}").into(),
                context: None,
            })?;

        kdf::derive_versioned_key(
            &self.master,
            record.identity.key_id,
            record.identity.version,
            &record.fingerprint,
        )
    }

    /// Whether a record for this identity exists, without deriving material.
    ///
    /// Non-throwing with respect to *absence* only: a missing record is
    /// `Ok(false)`, never an error. Registry transport failures still
    /// propagate, since an outage says nothing about whether the key exists.
    pub async fn key_exists(&self, key_id: KeyId, version: u32) -> Result<bool, CryptoError> {
        let record = self
            .registry
            .find(key_id, version)
            .await
            .context("Checking key record existence")?;
        Ok(record.is_some())
    }
}
