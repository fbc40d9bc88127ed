//! Outbound call placement.

use crate::client::TwilioClient;
use crate::error::TelephonyError;
use crate::tunnel::{TunnelClient, TunnelError};
use callkit_domain::config::TelephonyConfig;
use callkit_domain::constants::callback_url;
use tracing::{info, warn};

/// Resolves the callback URL and caller number, then dispatches the call.
#[derive(Debug, Clone)]
pub struct CallInitiator {
    webhook_url: Option<String>,
    phone_number: Option<String>,
    tunnel: TunnelClient,
}

impl CallInitiator {
    pub fn new(config: &TelephonyConfig, tunnel: TunnelClient) -> Self {
        Self {
            webhook_url: configured(config.webhook_url.as_deref()),
            phone_number: configured(config.phone_number.as_deref()),
            tunnel,
        }
    }

    /// Places a call to `destination` and returns the provider's call sid.
    ///
    /// Checked in order: a client exists, the destination is non-empty, the callback URL
    /// resolves, a caller number exists. Nothing is dispatched unless all four hold.
    ///
    /// # Errors
    /// `ClientNotInitialized`, `MissingInput`, `Configuration`, `UpstreamUnavailable`,
    /// or `Provider` when the call itself is rejected.
    pub async fn place_call(
        &self,
        client: Option<&TwilioClient>,
        destination: &str,
    ) -> Result<String, TelephonyError> {
        let client = client.ok_or(TelephonyError::ClientNotInitialized { context: None })?;

        let to = destination.trim();
        if to.is_empty() {
            return Err(TelephonyError::MissingInput {
                message: "Phone number is required".into(),
                context: None,
            });
        }

        let url = self.resolve_callback_url().await?;
        let from = self.resolve_from_number(client).await?;

        info!(from = %from, to = %to, url = %url, "Making outbound call");
        client.create_call(to, &from, &url).await
    }

    /// Configured webhook URL, or the tunnel's public URL plus `/twiml`.
    ///
    /// # Errors
    /// `Configuration` when no public URL can be determined, `UpstreamUnavailable` when
    /// the tunnel status endpoint answers with an error.
    pub async fn resolve_callback_url(&self) -> Result<String, TelephonyError> {
        if let Some(url) = &self.webhook_url {
            return Ok(url.clone());
        }

        match self.tunnel.public_url().await {
            Ok(public_url) => public_url.as_deref().and_then(callback_url).ok_or_else(|| {
                TelephonyError::configuration(
                    "Public URL not configured. Make sure ngrok is running and PUBLIC_URL is set in websocket-server/.env",
                )
            }),
            Err(TunnelError::Status { status, .. }) => {
                warn!(status, url = %self.tunnel.status_url(), "Tunnel status endpoint returned an error");
                Err(TelephonyError::UpstreamUnavailable {
                    message: "Could not connect to websocket server. Make sure it's running.".into(),
                    context: None,
                })
            },
            Err(err @ TunnelError::Transport { .. }) => {
                warn!(error = %err, url = %self.tunnel.status_url(), "Tunnel status endpoint unreachable");
                Err(TelephonyError::configuration(format!(
                    "Could not determine the public URL: {} is unreachable. Start the websocket server or set telephony.webhook_url.",
                    self.tunnel.status_url()
                )))
            },
        }
    }

    async fn resolve_from_number(&self, client: &TwilioClient) -> Result<String, TelephonyError> {
        if let Some(number) = &self.phone_number {
            return Ok(number.clone());
        }

        client
            .list_numbers(1)
            .await?
            .into_iter()
            .next()
            .map(|number| number.phone_number)
            .ok_or_else(|| TelephonyError::configuration("No phone numbers available for outbound calling"))
    }
}

fn configured(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}
