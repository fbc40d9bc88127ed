//! Telephony feature slice: provider client factory, tunnel status client and the
//! outbound call initiator, plus the `/numbers` and `/call` endpoints.

mod call;
mod client;
mod error;
mod tunnel;

#[cfg(feature = "server")]
pub mod api;

pub use call::CallInitiator;
pub use client::{TelephonyClientFactory, TwilioClient};
pub use error::{TelephonyError, TelephonyErrorExt};
pub use tunnel::{TunnelClient, TunnelError};

use callkit_credentials::{CredentialStore, CredentialsError};
#[cfg(feature = "server")]
use callkit_kernel::domain::{config::ApiConfig, registry::InitializedSlice};

impl From<TunnelError> for TelephonyError {
    fn from(err: TunnelError) -> Self {
        Self::Internal { message: err.to_string().into(), context: None }
    }
}

/// Telephony feature state
#[callkit_derive::callkit_slice]
pub struct Telephony {
    pub factory: TelephonyClientFactory,
    pub initiator: CallInitiator,
    pub credentials: CredentialStore,
    pub numbers_page_size: u32,
}

impl TelephonyInner {
    /// Client built from the stored credentials; `None` when they are not set.
    ///
    /// # Errors
    /// Returns an error when the credentials file cannot be read.
    pub fn stored_client(&self) -> Result<Option<TwilioClient>, CredentialsError> {
        let stored = self.credentials.load()?;
        Ok(self.factory.create(
            stored.as_ref().map(|c| c.account_sid.as_str()),
            stored.as_ref().map(|c| c.auth_token.as_str()),
        ))
    }
}

/// Initialize the telephony feature.
///
/// # Errors
/// Returns an error if an HTTP client cannot be constructed.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, TelephonyError> {
    let factory = TelephonyClientFactory::new(&config.telephony)?;
    let tunnel = TunnelClient::new(&config.tunnel)?;
    let initiator = CallInitiator::new(&config.telephony, tunnel);

    tracing::info!(
        api_base = %config.telephony.api_base,
        webhook_url = ?config.telephony.webhook_url,
        "Telephony slice initialized"
    );

    Ok(InitializedSlice::new(Telephony::new(TelephonyInner {
        factory,
        initiator,
        credentials: CredentialStore::new(&config.credentials.env_file),
        numbers_page_size: config.telephony.numbers_page_size,
    })))
}
