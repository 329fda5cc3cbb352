use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Opaque 128-bit key identifier.
///
/// Rendered as 32 lowercase hex characters in text form (logs, config,
/// serialized records).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyId([u8; 16]);

impl KeyId {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({self})")
    }
}

impl FromStr for KeyId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for KeyId {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyId> for String {
    fn from(id: KeyId) -> Self {
        id.to_string()
    }
}

/// String tag partitioning the key namespace by usage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Purpose(Cow<'static, str>);

impl Purpose {
    /// Purpose tag for stored credential passwords.
    pub const CREDENTIAL_PASSWORD: Self = Self(Cow::Borrowed("CredentialPassword"));

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one key-derivation context: which key, which version, for what.
///
/// Immutable once issued; `version` is always positive (version 0 never
/// exists in the registry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyIdentity {
    pub key_id: KeyId,
    pub version: u32,
    pub purpose: Purpose,
}

impl KeyIdentity {
    #[must_use]
    pub const fn new(key_id: KeyId, version: u32, purpose: Purpose) -> Self {
        Self { key_id, version, purpose }
    }
}

/// Key-registry row, read-only to this core.
///
/// Provisioning and the `is_active` flip during rotation happen elsewhere;
/// historical records are never deleted so old versions stay resolvable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub identity: KeyIdentity,
    pub algorithm: String,
    pub is_active: bool,
    pub fingerprint: Vec<u8>,
}
