#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the workspace. Currently this is only the
//! [`macro@cvault_error`] attribute, which turns a plain enum into the
//! standard error type used by every crate in the workspace.

mod expand;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining the workspace's domain error enums.
///
/// Transforms a plain enum with named-field variants into a fully wired error
/// type:
///
/// * Derives `Debug` and `thiserror::Error`.
/// * Generates a companion `<Name>Ext` trait adding `.context(...)` to
///   `Result<T, Name>` and to `Result<T, Source>` for every wrapped source
///   error, so call sites can annotate failures at the `?` boundary.
/// * Implements `From<Source>` for variants carrying a `source` field (or a
///   field marked `#[source]`/`#[from]`).
/// * Implements `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present, for ad-hoc internal failures.
/// * Emits a module-local `format_context` helper used by the `#[error(...)]`
///   display attributes.
///
/// # Requirements
///
/// Variants must use named fields. A variant that wraps a source error must
/// also carry a `context: Option<Cow<'static, str>>` field so the `Ext` trait
/// has somewhere to put the annotation.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[cvault_derive::cvault_error]
/// pub enum StoreError {
///     #[error("Backend failure{}: {message}", format_context(.context))]
///     Backend { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn cvault_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand::expand_error(input).into()
}
