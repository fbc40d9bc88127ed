//! Readiness feature slice.
//!
//! The [`ReadinessEngine`] observes the credentials file, the provider's number list and
//! the local tunnel server, reconciles them into a six-step checklist and publishes a
//! [`ReadinessSnapshot`](callkit_domain::readiness::ReadinessSnapshot) on every tick.
//! A [`Poller`] drives the ticks; the [`Prober`] checks that the tunnel's public URL is
//! reachable from the outside.

mod checklist;
mod engine;
mod error;
mod prober;
mod scheduler;
mod source;

#[cfg(feature = "server")]
pub mod api;

pub use checklist::ReadinessFacts;
pub use engine::ReadinessEngine;
pub use error::{ReadinessError, ReadinessErrorExt};
pub use prober::{ProbeOutcome, Prober, retry_fixed};
pub use scheduler::{PollOptions, Poller};
pub use source::{LocalSource, ReadinessSource};

use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(feature = "server")]
use callkit_credentials::CredentialStore;
#[cfg(feature = "server")]
use callkit_kernel::domain::{config::ApiConfig, registry::InitializedSlice};
#[cfg(feature = "server")]
use callkit_telephony::{TelephonyClientFactory, TunnelClient};

/// Readiness feature state
#[callkit_derive::callkit_slice]
pub struct Readiness {
    pub engine: Arc<ReadinessEngine<LocalSource>>,
    pub poll: PollOptions,
    poller: Mutex<Option<Poller>>,
}

impl ReadinessInner {
    /// Starts the polling task unless it is already running. Needs a Tokio runtime.
    pub fn start_polling(&self) -> bool {
        let mut slot = self.poller.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(Poller::spawn(Arc::clone(&self.engine), self.poll));
        true
    }

    /// Stops the polling task and waits for it to exit.
    pub async fn stop_polling(&self) {
        let poller = self.poller.lock().take();
        if let Some(poller) = poller {
            poller.stop().await;
        }
    }
}

/// Initialize the readiness feature. Polling starts with [`ReadinessInner::start_polling`].
///
/// # Errors
/// Returns an error if an HTTP client cannot be constructed.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, ReadinessError> {
    let source = LocalSource::new(
        CredentialStore::new(&config.credentials.env_file),
        TelephonyClientFactory::new(&config.telephony)?,
        TunnelClient::new(&config.tunnel)?,
        config.telephony.numbers_page_size,
    );
    let prober = Prober::new(&config.readiness, config.tunnel.request_timeout())?;

    tracing::info!(
        attempts = config.readiness.probe_attempts,
        probe_interval = ?config.readiness.probe_interval(),
        "Readiness slice initialized"
    );

    Ok(InitializedSlice::new(Readiness::new(ReadinessInner {
        engine: Arc::new(ReadinessEngine::new(source, prober)),
        poll: PollOptions::from(&config.readiness),
        poller: Mutex::new(None),
    })))
}
