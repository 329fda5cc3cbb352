//! Facade crate for the credential vault core.
//! Wires validated settings, both ciphers and the backfill tooling into one
//! entry point. Keep this crate thin: it composes the other crates, it does
//! not implement cryptography or migration logic itself.

pub use cvault_backfill as backfill;
pub use cvault_crypto as crypto;
pub use cvault_domain as domain;

use cvault_backfill::BackfillEngine;
use cvault_crypto::{CryptoError, DualReadCipher, KeyManager, LegacyCipher, VersionedCipher};
use cvault_domain::{
    CredentialRecord, CredentialStore, KeyRegistry, SettingsError, VaultSettings,
};
use tracing::error;

pub mod prelude {
    pub use crate::CredentialVault;
    pub use cvault_backfill::prelude::*;
    pub use cvault_crypto::prelude::*;
    pub use cvault_domain::{VaultSettings, load_settings};
}

/// The assembled vault: a dual-format read path, a versioned-only write
/// path and the migration engine, all sharing one master secret.
pub struct CredentialVault<S, R> {
    cipher: DualReadCipher<R>,
    engine: BackfillEngine<S, R>,
}

impl<S, R> std::fmt::Debug for CredentialVault<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault").finish_non_exhaustive()
    }
}

impl<S, R> CredentialVault<S, R>
where
    S: CredentialStore,
    R: KeyRegistry + Clone,
{
    /// Builds the full stack from validated settings.
    ///
    /// # Errors
    /// [`SettingsError::Validation`] when the configured master secret is
    /// too short, a fatal startup misconfiguration.
    pub fn from_settings(
        settings: &VaultSettings,
        store: S,
        registry: R,
    ) -> Result<Self, SettingsError> {
        let master = settings.master_secret()?;

        let legacy = LegacyCipher::new(master.clone());
        let versioned = VersionedCipher::new(KeyManager::new(master, registry));
        let cipher = DualReadCipher::new(legacy.clone(), versioned);
        let engine = BackfillEngine::new(store, cipher.clone(), legacy);

        Ok(Self { cipher, engine })
    }

    #[must_use]
    pub const fn cipher(&self) -> &DualReadCipher<R> {
        &self.cipher
    }

    #[must_use]
    pub const fn engine(&self) -> &BackfillEngine<S, R> {
        &self.engine
    }

    /// Decrypts a credential for display to an end user.
    ///
    /// The specific failure taxonomy is logged for operators but never
    /// surfaced to the caller, which sees one opaque error.
    pub async fn reveal(&self, record: &CredentialRecord) -> Result<Vec<u8>, CryptoError> {
        self.cipher.decrypt(record).await.map_err(|source| {
            error!(credential = %record.id, %source, "Credential reveal failed");
            CryptoError::Internal {
                message: "Cannot decrypt credential".into(),
                context: None,
            }
        })
    }
}
