//! Where the engine observes the world.

use crate::error::ReadinessError;
use callkit_credentials::CredentialStore;
use callkit_domain::models::{MaskedCredentials, PhoneNumberRecord};
use callkit_telephony::{TelephonyClientFactory, TelephonyError, TunnelClient};
use std::future::Future;

/// Observations the engine merges on every tick, plus the one write it performs.
pub trait ReadinessSource: Send + Sync + 'static {
    fn credentials_set(&self) -> impl Future<Output = Result<bool, ReadinessError>> + Send;

    fn masked_credentials(
        &self,
    ) -> impl Future<Output = Result<Option<MaskedCredentials>, ReadinessError>> + Send;

    /// Numbers on the account in provider order; empty when no credentials are stored.
    fn phone_numbers(&self) -> impl Future<Output = Result<Vec<PhoneNumberRecord>, ReadinessError>> + Send;

    /// Public URL reported by the tunnel server. `Err` means the server is down.
    fn public_url(&self) -> impl Future<Output = Result<Option<String>, ReadinessError>> + Send;

    fn update_voice_url(
        &self,
        number_sid: &str,
        voice_url: &str,
    ) -> impl Future<Output = Result<PhoneNumberRecord, ReadinessError>> + Send;
}

/// The credentials file, the provider API and the local tunnel server.
#[derive(Debug, Clone)]
pub struct LocalSource {
    credentials: CredentialStore,
    factory: TelephonyClientFactory,
    tunnel: TunnelClient,
    page_size: u32,
}

impl LocalSource {
    pub const fn new(
        credentials: CredentialStore,
        factory: TelephonyClientFactory,
        tunnel: TunnelClient,
        page_size: u32,
    ) -> Self {
        Self { credentials, factory, tunnel, page_size }
    }
}

impl ReadinessSource for LocalSource {
    async fn credentials_set(&self) -> Result<bool, ReadinessError> {
        Ok(self.credentials.is_set()?)
    }

    async fn masked_credentials(&self) -> Result<Option<MaskedCredentials>, ReadinessError> {
        Ok(self.credentials.masked()?)
    }

    async fn phone_numbers(&self) -> Result<Vec<PhoneNumberRecord>, ReadinessError> {
        let Some(credentials) = self.credentials.load()? else {
            return Ok(Vec::new());
        };
        let client = self.factory.with_credentials(credentials);
        Ok(client.list_numbers(self.page_size).await?)
    }

    async fn public_url(&self) -> Result<Option<String>, ReadinessError> {
        Ok(self.tunnel.public_url().await?)
    }

    async fn update_voice_url(
        &self,
        number_sid: &str,
        voice_url: &str,
    ) -> Result<PhoneNumberRecord, ReadinessError> {
        let client = self
            .credentials
            .load()?
            .map(|credentials| self.factory.with_credentials(credentials))
            .ok_or(TelephonyError::ClientNotInitialized { context: None })?;

        Ok(client.update_voice_url(number_sid, voice_url).await?)
    }
}
