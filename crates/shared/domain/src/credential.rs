use crate::keys::KeyId;
use crate::payload::{EncryptedCredentialData, LegacyEncryptedData};
use serde::{Deserialize, Serialize};

/// Credential store row as this core sees it.
///
/// Exactly one of the two payload shapes is meaningful, selected by
/// `is_migrated_to_v2`: the legacy text columns (base64) when `false`, the
/// versioned binary columns when `true`. The crypto layer rejects rows whose
/// populated fields disagree with the discriminator instead of guessing.
///
/// Legacy columns are not cleared when a row is migrated; they are retained
/// until an operator confirms a safe purge window through the validation
/// sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,

    // Legacy format (base64 text, as the original schema stored them)
    pub encrypted_password: Option<String>,
    pub salt: Option<String>,
    pub iv: Option<String>,

    // Versioned format
    pub enterprise_ciphertext: Option<Vec<u8>>,
    pub enterprise_tag: Option<Vec<u8>>,
    pub enterprise_salt: Option<Vec<u8>>,
    pub enterprise_iv: Option<Vec<u8>>,
    pub enterprise_key_id: Option<KeyId>,
    pub enterprise_key_version: Option<u32>,

    pub is_migrated_to_v2: bool,
}

impl CredentialRecord {
    /// Creates an unmigrated row holding a legacy payload.
    #[must_use]
    pub fn legacy(id: impl Into<String>, name: impl Into<String>, data: &LegacyEncryptedData) -> Self {
        let mut record = Self::empty(id, name);
        record.apply_legacy(data);
        record
    }

    /// Creates a migrated row holding a versioned payload.
    #[must_use]
    pub fn versioned(
        id: impl Into<String>,
        name: impl Into<String>,
        data: &EncryptedCredentialData,
    ) -> Self {
        let mut record = Self::empty(id, name);
        record.apply_versioned(data);
        record
    }

    fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            encrypted_password: None,
            salt: None,
            iv: None,
            enterprise_ciphertext: None,
            enterprise_tag: None,
            enterprise_salt: None,
            enterprise_iv: None,
            enterprise_key_id: None,
            enterprise_key_version: None,
            is_migrated_to_v2: false,
        }
    }

    /// Writes the legacy columns and flips the discriminator to `false`.
    pub fn apply_legacy(&mut self, data: &LegacyEncryptedData) {
        let (password, salt, iv) = data.to_base64_parts();
        self.encrypted_password = Some(password);
        self.salt = Some(salt);
        self.iv = Some(iv);
        self.is_migrated_to_v2 = false;
    }

    /// Writes the versioned columns and flips the discriminator to `true`.
    ///
    /// Legacy columns are deliberately left untouched.
    pub fn apply_versioned(&mut self, data: &EncryptedCredentialData) {
        self.enterprise_ciphertext = Some(data.ciphertext.clone());
        self.enterprise_tag = Some(data.tag.clone());
        self.enterprise_salt = Some(data.salt.clone());
        self.enterprise_iv = Some(data.iv.clone());
        self.enterprise_key_id = Some(data.key_id);
        self.enterprise_key_version = Some(data.key_version);
        self.is_migrated_to_v2 = true;
    }

    /// `true` when all legacy columns are populated and non-empty.
    #[must_use]
    pub fn has_legacy_fields(&self) -> bool {
        [&self.encrypted_password, &self.salt, &self.iv]
            .iter()
            .all(|field| field.as_ref().is_some_and(|v| !v.is_empty()))
    }
}
