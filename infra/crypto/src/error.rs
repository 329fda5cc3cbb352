//! # Crypto Errors
//!
//! This module defines the [`CryptoError`] enum used throughout the crypto
//! crate. The variants are deliberately distinct so callers and audit logs
//! can tell a caller mistake, storage corruption, a wrong key, and a
//! registry gap apart.

use cvault_domain::StoreError;
use std::borrow::Cow;

/// A specialized [`CryptoError`] enum for cryptographic failures.
#[cvault_derive::cvault_error]
pub enum CryptoError {
    /// Missing or empty required input. Caller's fault; not retryable
    /// without fixing the call.
    #[error("Invalid argument{}: {message}", format_context(.context))]
    Argument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A payload component's length does not match its mandated size.
    /// Signals storage corruption or schema drift; not retryable.
    #[error("Component validation failed{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// AEAD tag verification failed: wrong key or tampered data. Surfaced as
    /// a single opaque error, never partial plaintext.
    #[error("Authentication failure{}: {message}", format_context(.context))]
    Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The registry has no record for the requested key identity/version.
    /// Possibly transient while registry provisioning is in flight.
    #[error("Unknown key{}: {message}", format_context(.context))]
    UnknownKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No usable active key for the purpose: none provisioned, or the
    /// at-most-one-active invariant is violated. Fatal until an operator
    /// intervenes.
    #[error("No active key{}: {message}", format_context(.context))]
    NoActiveKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A text-form component is not valid base64.
    #[error("Encoding error{}: {source}", format_context(.context))]
    Encoding { source: base64::DecodeError, context: Option<Cow<'static, str>> },

    /// A key-registry read failed at the store boundary.
    #[error("Registry store error{}: {source}", format_context(.context))]
    Store {
        #[source]
        source: StoreError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal crypto error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
