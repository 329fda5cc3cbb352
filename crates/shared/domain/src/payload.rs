use crate::keys::KeyId;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Salt length for both payload formats (256-bit).
pub const SALT_LEN: usize = 32;

/// AEAD nonce length (96-bit, mandated by GCM).
pub const IV_LEN: usize = 12;

/// AEAD tag length (128-bit).
pub const TAG_LEN: usize = 16;

/// Derived key length (AES-256).
pub const KEY_LEN: usize = 32;

/// Legacy encrypted payload: self-contained, keyed by a per-payload
/// salt-derived key with no registry involvement.
///
/// `cipher_and_tag` is ciphertext immediately followed by the 16-byte tag,
/// no length prefix; consumers split on the fixed tag length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEncryptedData {
    pub cipher_and_tag: Vec<u8>,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
}

impl LegacyEncryptedData {
    /// Renders the components in the text form stored by the legacy schema
    /// (standard base64 of the raw bytes).
    #[must_use]
    pub fn to_base64_parts(&self) -> (String, String, String) {
        (
            BASE64.encode(&self.cipher_and_tag),
            BASE64.encode(self.salt),
            BASE64.encode(self.iv),
        )
    }
}

/// Versioned encrypted payload: self-describing, carries the key identity
/// needed to re-derive the correct key through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedCredentialData {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
    pub salt: Vec<u8>,
    pub iv: Vec<u8>,
    pub key_id: KeyId,
    pub key_version: u32,
}
