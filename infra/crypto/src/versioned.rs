use crate::cipher;
use crate::error::CryptoError;
use crate::keys::KeyManager;
use cvault_domain::{
    EncryptedCredentialData, IV_LEN, KeyId, KeyRegistry, Purpose, SALT_LEN, TAG_LEN,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use getrandom::fill;

/// Cipher for the registry-backed, self-describing payload format.
///
/// Payloads carry their key identity and version, so any historical key
/// remains resolvable through the registry without re-encrypting old data.
#[derive(Debug, Clone)]
pub struct VersionedCipher<R> {
    keys: KeyManager<R>,
}

impl<R: KeyRegistry> VersionedCipher<R> {
    pub const fn new(keys: KeyManager<R>) -> Self {
        Self { keys }
    }

    pub const fn key_manager(&self) -> &KeyManager<R> {
        &self.keys
    }

    /// Encrypts `plaintext` under the single active key for `purpose`,
    /// stamping the result with that key's identity and version.
    pub async fn encrypt(
        &self,
        plaintext: &[u8],
        purpose: &Purpose,
    ) -> Result<EncryptedCredentialData, CryptoError> {
        let (identity, key) = self.keys.active_key(purpose).await?;

        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        fill(&mut salt).expect("System RNG unavailable for salt generation");
        fill(&mut iv).expect("System RNG unavailable for IV generation");

        let (ciphertext, tag) = cipher::seal(&key, &iv, plaintext)?;

        Ok(EncryptedCredentialData {
            ciphertext,
            tag: tag.to_vec(),
            salt: salt.to_vec(),
            iv: iv.to_vec(),
            key_id: identity.key_id,
            key_version: identity.version,
        })
    }

    /// Decrypts a versioned payload.
    ///
    /// Sizes are validated before any key derivation is spent, so corrupt
    /// storage surfaces as [`CryptoError::Validation`] rather than a tag
    /// mismatch.
    pub async fn decrypt(&self, data: &EncryptedCredentialData) -> Result<Vec<u8>, CryptoError> {
        validate_sizes(&data.ciphertext, &data.salt, &data.iv, &data.tag)?;

        let key = self.keys.key(data.key_id, data.key_version).await?;

        let iv: [u8; IV_LEN] = data.iv.as_slice().try_into().map_err(|_| {
            CryptoError::Internal { message: "IV length changed after validation".into(), context: None }
        })?;
        let tag: [u8; TAG_LEN] = data.tag.as_slice().try_into().map_err(|_| {
            CryptoError::Internal { message: "Tag length changed after validation".into(), context: None }
        })?;

        cipher::open(&key, &iv, &data.ciphertext, &tag)
    }

    /// Decrypts a payload whose components were stored as base64 text with
    /// the tag appended to the ciphertext, while the key identity is already
    /// versioned.
    ///
    /// Bridge for rows written during an intermediate migration phase.
    pub async fn decrypt_legacy_shaped(
        &self,
        ciphertext_b64: &str,
        salt_b64: &str,
        iv_b64: &str,
        key_id: KeyId,
        version: u32,
    ) -> Result<Vec<u8>, CryptoError> {
        let blob = BASE64.decode(ciphertext_b64)?;
        let salt = BASE64.decode(salt_b64)?;
        let iv = BASE64.decode(iv_b64)?;

        if blob.len() <= TAG_LEN {
            return Err(CryptoError::Validation {
                message: format!(
                    "Combined blob too short ({} bytes). Expected ciphertext plus {TAG_LEN}-byte tag",
                    blob.len()
                )
                .into(),
                context: None,
            });
        }
        let (ciphertext, tag) = blob.split_at(blob.len() - TAG_LEN);

        let data = EncryptedCredentialData {
            ciphertext: ciphertext.to_vec(),
            tag: tag.to_vec(),
            salt,
            iv,
            key_id,
            key_version: version,
        };
        self.decrypt(&data).await
    }
}

/// Rejects component sizes that cannot possibly decrypt, before any key
/// derivation runs.
pub fn validate_sizes(
    ciphertext: &[u8],
    salt: &[u8],
    iv: &[u8],
    tag: &[u8],
) -> Result<(), CryptoError> {
    let failure = |what: &str, expected: usize, actual: usize| CryptoError::Validation {
        message: format!("Invalid {what} length {actual}. Expected {expected}").into(),
        context: None,
    };

    if ciphertext.is_empty() {
        return Err(CryptoError::Validation {
            message: "Empty ciphertext".into(),
            context: None,
        });
    }
    if salt.len() != SALT_LEN {
        return Err(failure("salt", SALT_LEN, salt.len()));
    }
    if iv.len() != IV_LEN {
        return Err(failure("IV", IV_LEN, iv.len()));
    }
    if tag.len() != TAG_LEN {
        return Err(failure("tag", TAG_LEN, tag.len()));
    }
    Ok(())
}
