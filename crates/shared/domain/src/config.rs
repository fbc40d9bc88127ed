use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub credentials: CredentialsConfig,
    pub telephony: TelephonyConfig,
    pub tunnel: TunnelConfig,
    pub readiness: ReadinessConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`RUST_LOG` still wins).
    pub level: String,
    /// Rolling log file directory; console only when unset.
    pub dir: Option<PathBuf>,
    pub json: bool,
}

/// Where the account credentials are persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Plain `KEY=value` file holding `TWILIO_ACCOUNT_SID` and `TWILIO_AUTH_TOKEN`.
    pub env_file: PathBuf,
}

/// Telephony provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelephonyConfig {
    /// Base URL of the provider REST API.
    pub api_base: String,
    /// Fixed callback URL for outbound calls; resolved from the tunnel when unset.
    pub webhook_url: Option<String>,
    /// Fixed caller number; the first provisioned number is used when unset.
    pub phone_number: Option<String>,
    pub request_timeout_secs: u64,
    pub numbers_page_size: u32,
}

/// The local tunnel/websocket server that publishes the public URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    /// Base URL; the status endpoint is `<base_url>/public-url`.
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// Polling and probing cadence of the readiness engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub poll_interval_ms: u64,
    pub probe_attempts: u32,
    pub probe_interval_ms: u64,
    /// Probe the public URL automatically when the tunnel server comes up.
    pub auto_probe: bool,
}

impl TelephonyConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl TunnelConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ReadinessConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), dir: None, json: false }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self { env_file: PathBuf::from(".env") }
    }
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.twilio.com".to_owned(),
            webhook_url: None,
            phone_number: None,
            request_timeout_secs: 10,
            numbers_page_size: 20,
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8081".to_owned(), request_timeout_secs: 5 }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 1000, probe_attempts: 5, probe_interval_ms: 3000, auto_probe: true }
    }
}
