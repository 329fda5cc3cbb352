use crate::cipher;
use crate::error::CryptoError;
use crate::kdf;
use cvault_domain::{IV_LEN, LegacyEncryptedData, MasterSecret, SALT_LEN, TAG_LEN};
use getrandom::fill;

/// Cipher for the original single-master-key format.
///
/// Every payload is self-contained: the key is re-derived from the master
/// secret and the payload's embedded salt, with no registry involvement.
/// There is no rotation story — one master secret services all legacy data
/// forever, which is exactly why the versioned format exists.
#[derive(Debug, Clone)]
pub struct LegacyCipher {
    master: MasterSecret,
}

impl LegacyCipher {
    #[must_use]
    pub const fn new(master: MasterSecret) -> Self {
        Self { master }
    }

    /// Encrypts `plaintext` under a fresh salt and IV.
    ///
    /// The returned blob is ciphertext immediately followed by the 16-byte
    /// tag, no length prefix.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<LegacyEncryptedData, CryptoError> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        fill(&mut salt).expect("System RNG unavailable for salt generation");
        fill(&mut iv).expect("System RNG unavailable for IV generation");

        let key = kdf::derive_legacy_key(&self.master, &salt)?;
        let (mut cipher_and_tag, tag) = cipher::seal(&key, &iv, plaintext)?;
        cipher_and_tag.extend_from_slice(&tag);

        Ok(LegacyEncryptedData { cipher_and_tag, salt, iv })
    }

    /// Decrypts a legacy payload.
    ///
    /// # Errors
    /// * [`CryptoError::Validation`] when the blob is too short to contain a
    ///   tag.
    /// * [`CryptoError::Authentication`] when the tag does not verify —
    ///   tampered data or a wrong master secret, indistinguishable by
    ///   design.
    pub fn decrypt(&self, data: &LegacyEncryptedData) -> Result<Vec<u8>, CryptoError> {
        if data.cipher_and_tag.len() < TAG_LEN {
            return Err(CryptoError::Validation {
                message: format!(
                    "Legacy blob too short ({} bytes). Expected at least {TAG_LEN} bytes",
                    data.cipher_and_tag.len()
                )
                .into(),
                context: None,
            });
        }

        let (ciphertext, tag_slice) = data.cipher_and_tag.split_at(data.cipher_and_tag.len() - TAG_LEN);
        let tag: [u8; TAG_LEN] = tag_slice.try_into().map_err(|_| CryptoError::Internal {
            message: "Tag split produced wrong length".into(),
            context: None,
        })?;

        let key = kdf::derive_legacy_key(&self.master, &data.salt)?;
        cipher::open(&key, &data.iv, ciphertext, &tag)
    }
}
