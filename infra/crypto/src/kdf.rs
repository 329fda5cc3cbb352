//! Password-based key derivation for both payload formats.
//!
//! Both derivations run PBKDF2-HMAC-SHA512 over the process master secret;
//! they differ in salt construction and iteration count. The legacy format
//! derives per *secret* (embedded random salt, hardened against brute force
//! at 600k iterations). The versioned format derives per *key resolution*
//! from the key identity and registry fingerprint; key separation, not
//! secrecy strengthening, dominates there, so 100k iterations keep the cost
//! cheap relative to request latency.

use crate::error::CryptoError;
use cvault_domain::{KEY_LEN, KeyId, MasterSecret, SALT_LEN};
use hmac::Hmac;
use sha2::Sha512;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 iteration count for the legacy per-secret derivation.
pub const LEGACY_KDF_ITERATIONS: u32 = 600_000;

/// PBKDF2 iteration count for the per-key-version derivation.
pub const KEY_KDF_ITERATIONS: u32 = 100_000;

/// 256-bit key material, alive only for the duration of one encrypt or
/// decrypt call.
///
/// Never persisted and never cached; zeroed on drop along every exit path.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    #[must_use]
    pub(crate) const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derives the legacy-format key from the master secret and a per-payload
/// salt.
pub fn derive_legacy_key(
    master: &MasterSecret,
    salt: &[u8; SALT_LEN],
) -> Result<DerivedKey, CryptoError> {
    pbkdf2_sha512(master.as_bytes(), salt, LEGACY_KDF_ITERATIONS)
}

/// Derives key material for one key identity and version.
///
/// The context buffer is `key_id (16) || version (4, big-endian) ||
/// fingerprint`. Folding the version in guarantees that rotating to a new
/// version yields independent material even if a fingerprint were reused,
/// and old versions stay re-derivable as long as their registry record
/// persists.
pub fn derive_versioned_key(
    master: &MasterSecret,
    key_id: KeyId,
    version: u32,
    fingerprint: &[u8],
) -> Result<DerivedKey, CryptoError> {
    let mut context = Vec::with_capacity(16 + 4 + fingerprint.len());
    context.extend_from_slice(key_id.as_bytes());
    context.extend_from_slice(&version.to_be_bytes());
    context.extend_from_slice(fingerprint);

    pbkdf2_sha512(master.as_bytes(), &context, KEY_KDF_ITERATIONS)
}

fn pbkdf2_sha512(password: &[u8], salt: &[u8], rounds: u32) -> Result<DerivedKey, CryptoError> {
    let mut output = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha512>>(password, salt, rounds, &mut output).map_err(|_| {
        CryptoError::Internal {
            message: "PBKDF2 derivation failed".into(),
            context: None,
        }
    })?;
    Ok(DerivedKey(output))
}
