#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`callkit_error`] turns an enum into a `thiserror` error with `.context(...)` support.
//! * [`api_model`] and [`api_handler`] keep DTOs and Axum handlers consistent with the
//!   generated `OpenAPI` document.
//! * [`callkit_slice`] wraps feature state so it can be registered in the kernel.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros;
//! the consuming crates exercise them in their tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a request/response model for the control API.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when they are not derived already,
/// `utoipa::ToSchema` when the consuming crate enables its `server` feature, and the
/// serde policy `rename_all = "camelCase"` + `deny_unknown_fields`.
///
/// # Arguments
///
/// * `rename_all = "snake_case"` - overrides the rename policy.
/// * `deny_unknown_fields = false` - accepts unknown fields.
///
/// # Example
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct CredentialsStatus {
///     pub credentials_set: bool,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an Axum handler with `utoipa::path` when the `server` feature is on.
///
/// Accepts the usual `utoipa::path` arguments.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = SYSTEM_TAG,
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into the workspace error shape.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for variants with a `source` field (or a `#[source]`/`#[from]` field).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A module-private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must have named fields. A variant with a source must also have
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[callkit_derive::callkit_error]
/// pub enum StoreError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &Path) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading credentials file")
/// }
/// ```
#[proc_macro_attribute]
pub fn callkit_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Declares a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is a cheap `Arc` wrapper
/// that derefs to it and implements `FeatureSlice`.
///
/// # Example
/// ```rust,ignore
/// #[callkit_derive::callkit_slice]
/// pub struct Credentials {
///     pub store: CredentialStore,
/// }
///
/// let slice = Credentials::new(CredentialsInner { store });
/// ```
#[proc_macro_attribute]
pub fn callkit_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
