use cvault_crypto::CryptoError;
use cvault_domain::StoreError;
use std::borrow::Cow;

/// A specialized [`MigrationError`] enum for backfill failures that abort a
/// whole run. Per-record failures are captured into
/// [`BackfillError`](crate::BackfillError) items instead.
#[cvault_derive::cvault_error]
pub enum MigrationError {
    /// Credential or registry store failure.
    #[error("Store failure{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    /// Cryptographic failure outside any per-record capture scope.
    #[error("Crypto failure{}: {source}", format_context(.context))]
    Crypto { source: CryptoError, context: Option<Cow<'static, str>> },

    /// Unexpected internal failure.
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
