//! Settings loading for the vault core.
//!
//! Layered strategy: a base file (TOML/JSON, defaulting to `cvault` in the
//! working directory) overlaid with environment variables prefixed `CVAULT__`
//! (double underscore separating nesting levels).

use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum accepted master secret length, in characters.
pub const MIN_MASTER_SECRET_CHARS: usize = 32;

/// A specialized [`SettingsError`] enum for configuration failures.
#[cvault_derive::cvault_error]
pub enum SettingsError {
    /// Underlying configuration source failure.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// A loaded value violates a startup invariant.
    #[error("Invalid settings{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Process-wide master secret, loaded once at startup and immutable for the
/// process lifetime.
///
/// Wraps the configured string with zero-on-drop semantics; `Debug` output is
/// redacted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(String);

impl MasterSecret {
    /// Validates and wraps the configured secret.
    ///
    /// # Errors
    /// [`SettingsError::Validation`] when the secret is shorter than
    /// [`MIN_MASTER_SECRET_CHARS`] — a fatal misconfiguration.
    pub fn new(secret: impl Into<String>) -> Result<Self, SettingsError> {
        let secret = secret.into();
        if secret.chars().count() < MIN_MASTER_SECRET_CHARS {
            return Err(SettingsError::Validation {
                message: format!(
                    "Master secret must be at least {MIN_MASTER_SECRET_CHARS} characters"
                )
                .into(),
                context: Some("master_secret".into()),
            });
        }
        Ok(Self(secret))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(..)")
    }
}

/// Settings consumed by the vault core.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultSettings {
    pub master_secret: String,
}

impl VaultSettings {
    /// Validates the configured secret into a [`MasterSecret`].
    pub fn master_secret(&self) -> Result<MasterSecret, SettingsError> {
        MasterSecret::new(self.master_secret.clone())
    }
}

/// Loads settings from a base file plus `CVAULT__` environment overrides.
///
/// # Errors
/// [`SettingsError::Config`] when the file is missing or deserialization
/// fails.
pub fn load_settings<T>(path: Option<impl AsRef<Path>>) -> Result<T, SettingsError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("cvault"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("CVAULT")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading settings from {}", effective_path.display());

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<T>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}
