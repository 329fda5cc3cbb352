//! Cryptographic core for credential storage.
//!
//! Two payload formats coexist while a migration is in flight:
//!
//! - **Legacy**: one master secret, a per-payload PBKDF2 salt, ciphertext
//!   and tag stored as a single blob. Self-contained, no rotation story.
//! - **Versioned**: payloads stamped with a key identity and version
//!   resolved through an external key registry, so keys can rotate without
//!   touching old data.
//!
//! Both formats use AES-256-GCM with a 96-bit random IV and a detached
//! 128-bit tag. [`DualReadCipher`] reads either format, dispatched by the
//! record's migration discriminator, and writes only the versioned one.
//!
//! ```rust,no_run
//! use cvault_crypto::prelude::*;
//! use cvault_domain::{MasterSecret, Purpose};
//!
//! # async fn demo(registry: impl cvault_domain::KeyRegistry) -> Result<(), CryptoError> {
//! let master = MasterSecret::new("0123456789abcdef0123456789abcdef").unwrap();
//! let keys = KeyManager::new(master.clone(), registry);
//! let cipher = DualReadCipher::new(LegacyCipher::new(master), VersionedCipher::new(keys));
//!
//! let data = cipher
//!     .encrypt_with_enterprise(b"s3cret", &Purpose::CREDENTIAL_PASSWORD)
//!     .await?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```

mod cipher;
mod dual;
mod error;
mod kdf;
mod keys;
mod legacy;
mod versioned;

pub use dual::{CredentialPayload, DualReadCipher};
pub use error::{CryptoError, CryptoErrorExt};
pub use kdf::{DerivedKey, KEY_KDF_ITERATIONS, LEGACY_KDF_ITERATIONS};
pub use keys::KeyManager;
pub use legacy::LegacyCipher;
pub use versioned::{VersionedCipher, validate_sizes};

pub mod prelude {
    pub use crate::dual::{CredentialPayload, DualReadCipher};
    pub use crate::error::{CryptoError, CryptoErrorExt};
    pub use crate::keys::KeyManager;
    pub use crate::legacy::LegacyCipher;
    pub use crate::versioned::VersionedCipher;
}
