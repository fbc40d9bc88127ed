//! Status endpoint of the local tunnel/websocket server.

use callkit_domain::config::TunnelConfig;
use callkit_domain::constants::PUBLIC_URL_PATH;
use serde::Deserialize;
use std::borrow::Cow;

#[callkit_derive::callkit_error]
pub enum TunnelError {
    /// The server did not answer (connection refused, timeout, undecodable body).
    #[error("Tunnel status unreachable{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Tunnel status returned HTTP {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicUrlBody {
    #[serde(default)]
    public_url: Option<String>,
}

/// Reads `GET <base_url>/public-url`.
#[derive(Debug, Clone)]
pub struct TunnelClient {
    http: reqwest::Client,
    status_url: String,
}

impl TunnelClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &TunnelConfig) -> Result<Self, TunnelError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build tunnel HTTP client")?;

        Ok(Self {
            http,
            status_url: format!("{}{PUBLIC_URL_PATH}", config.base_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    /// The public URL the server reports; `None` when it reports none (or a blank one).
    ///
    /// # Errors
    /// `Transport` when the server cannot be reached, `Status` on a non-2xx answer.
    pub async fn public_url(&self) -> Result<Option<String>, TunnelError> {
        let response = self.http.get(&self.status_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TunnelError::Status { status: status.as_u16(), context: None });
        }

        let body: PublicUrlBody = response.json().await?;
        Ok(body.public_url.map(|url| url.trim().to_owned()).filter(|url| !url.is_empty()))
    }
}
