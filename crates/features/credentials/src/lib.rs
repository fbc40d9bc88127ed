//! Credentials feature slice: stores the telephony account credentials in a plain
//! env file and serves them masked.

mod env_file;
mod error;
mod mask;
mod store;

#[cfg(feature = "server")]
pub mod api;

pub use error::{CredentialsError, CredentialsErrorExt};
pub use mask::mask_secret;
pub use store::{AccountCredentials, CredentialStore};

#[cfg(feature = "server")]
use callkit_kernel::domain::{config::ApiConfig, registry::InitializedSlice};

/// Credentials feature state
#[callkit_derive::callkit_slice]
pub struct Credentials {
    pub store: CredentialStore,
}

/// Initialize the credentials feature.
///
/// # Errors
/// Never fails today; kept fallible like every slice initializer.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, CredentialsError> {
    let store = CredentialStore::new(&config.credentials.env_file);
    tracing::info!(path = %store.path().display(), "Credentials slice initialized");

    Ok(InitializedSlice::new(Credentials::new(CredentialsInner { store })))
}
