use crate::error::CryptoError;
use crate::legacy::LegacyCipher;
use crate::versioned::VersionedCipher;
use cvault_domain::{
    CredentialRecord, EncryptedCredentialData, IV_LEN, KeyRegistry, LegacyEncryptedData, Purpose,
    SALT_LEN,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

/// The payload shape a record resolves to, per its discriminator.
#[derive(Debug, Clone)]
pub enum CredentialPayload {
    Legacy(LegacyEncryptedData),
    Versioned(EncryptedCredentialData),
}

impl CredentialPayload {
    /// Resolves the record's populated columns into exactly one payload
    /// shape, driven by `is_migrated_to_v2`.
    ///
    /// Field-presence failures name the offending column so migration
    /// tooling can report per-field diagnostics instead of a generic error.
    pub fn resolve(record: &CredentialRecord) -> Result<Self, CryptoError> {
        if record.is_migrated_to_v2 {
            Ok(Self::Versioned(EncryptedCredentialData {
                ciphertext: required_bytes(&record.enterprise_ciphertext, "enterprise_ciphertext")?,
                tag: required_bytes(&record.enterprise_tag, "enterprise_tag")?,
                salt: required_bytes(&record.enterprise_salt, "enterprise_salt")?,
                iv: required_bytes(&record.enterprise_iv, "enterprise_iv")?,
                key_id: record.enterprise_key_id.ok_or_else(|| missing("enterprise_key_id"))?,
                key_version: record
                    .enterprise_key_version
                    .ok_or_else(|| missing("enterprise_key_version"))?,
            }))
        } else {
            let blob = required_base64(&record.encrypted_password, "encrypted_password")?;
            let salt = required_base64(&record.salt, "salt")?;
            let iv = required_base64(&record.iv, "iv")?;

            Ok(Self::Legacy(LegacyEncryptedData {
                cipher_and_tag: blob,
                salt: sized("salt", salt)?,
                iv: sized("iv", iv)?,
            }))
        }
    }
}

fn missing(field: &'static str) -> CryptoError {
    CryptoError::Argument {
        message: format!("Required field '{field}' is missing or empty").into(),
        context: None,
    }
}

fn required_bytes(field: &Option<Vec<u8>>, name: &'static str) -> Result<Vec<u8>, CryptoError> {
    match field {
        Some(bytes) if !bytes.is_empty() => Ok(bytes.clone()),
        _ => Err(missing(name)),
    }
}

fn required_base64(field: &Option<String>, name: &'static str) -> Result<Vec<u8>, CryptoError> {
    match field {
        Some(text) if !text.is_empty() => Ok(BASE64.decode(text)?),
        _ => Err(missing(name)),
    }
}

fn sized<const N: usize>(name: &'static str, bytes: Vec<u8>) -> Result<[u8; N], CryptoError> {
    let actual = bytes.len();
    bytes.try_into().map_err(|_| CryptoError::Validation {
        message: format!("Decoded {name} is {actual} bytes. Expected {N}").into(),
        context: None,
    })
}

/// Read path spanning both payload formats, write path locked to the
/// versioned one.
///
/// There is intentionally no legacy write operation here; once a record is
/// re-encrypted it never moves back, which is what makes the migration
/// monotonic.
#[derive(Debug, Clone)]
pub struct DualReadCipher<R> {
    legacy: LegacyCipher,
    versioned: VersionedCipher<R>,
}

impl<R: KeyRegistry> DualReadCipher<R> {
    pub const fn new(legacy: LegacyCipher, versioned: VersionedCipher<R>) -> Self {
        Self { legacy, versioned }
    }

    pub const fn versioned(&self) -> &VersionedCipher<R> {
        &self.versioned
    }

    /// Decrypts whichever payload shape the record's discriminator selects.
    pub async fn decrypt(&self, record: &CredentialRecord) -> Result<Vec<u8>, CryptoError> {
        match CredentialPayload::resolve(record)? {
            CredentialPayload::Legacy(data) => self.legacy.decrypt(&data),
            CredentialPayload::Versioned(data) => self.versioned.decrypt(&data).await,
        }
    }

    /// Same dispatch as [`decrypt`](Self::decrypt), with every failure
    /// downgraded to `false`. Classification tool for the validation sweep.
    pub async fn can_decrypt(&self, record: &CredentialRecord) -> bool {
        match self.decrypt(record).await {
            Ok(_) => true,
            Err(error) => {
                debug!(credential = %record.id, %error, "Record failed decrypt probe");
                false
            }
        }
    }

    /// Encrypts in the versioned format under the active key for `purpose`.
    pub async fn encrypt_with_enterprise(
        &self,
        plaintext: &[u8],
        purpose: &Purpose,
    ) -> Result<EncryptedCredentialData, CryptoError> {
        self.versioned.encrypt(plaintext, purpose).await
    }
}
