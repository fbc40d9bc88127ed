//! Bounded fixed-interval reachability checks for the tunnel's public URL.

use crate::error::{ReadinessError, ReadinessErrorExt};
use callkit_domain::config::ReadinessConfig;
use callkit_domain::constants::PUBLIC_URL_PATH;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs `op` until it succeeds or `attempts` tries are used up, sleeping `interval`
/// between tries (never after the last one). `op` receives the 1-based attempt number.
///
/// Returns the last result together with the number of attempts made. `attempts` of
/// zero is treated as one.
pub async fn retry_fixed<T, E, F, Fut>(attempts: u32, interval: Duration, mut op: F) -> (Result<T, E>, u32)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return (Ok(value), attempt),
            Err(err) if attempt >= attempts => return (Err(err), attempt),
            Err(_) => {
                tokio::time::sleep(interval).await;
                attempt += 1;
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reached { attempts: u32 },
    Unreached { attempts: u32 },
}

impl ProbeOutcome {
    #[must_use]
    pub const fn is_reached(self) -> bool {
        matches!(self, Self::Reached { .. })
    }

    #[must_use]
    pub const fn attempts(self) -> u32 {
        match self {
            Self::Reached { attempts } | Self::Unreached { attempts } => attempts,
        }
    }
}

/// Checks that `GET <public_url>/public-url` answers 2xx from the outside.
#[derive(Debug, Clone)]
pub struct Prober {
    http: reqwest::Client,
    attempts: u32,
    interval: Duration,
}

impl Prober {
    /// `request_timeout` bounds every single attempt.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ReadinessConfig, request_timeout: Duration) -> Result<Self, ReadinessError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build probe HTTP client")?;

        Ok(Self { http, attempts: config.probe_attempts, interval: config.probe_interval() })
    }

    pub async fn probe(&self, public_url: &str) -> ProbeOutcome {
        let target = format!("{}{PUBLIC_URL_PATH}", public_url.trim().trim_end_matches('/'));
        let target = target.as_str();

        let (result, attempts) = retry_fixed(self.attempts, self.interval, |attempt| {
            let request = self.http.get(target);
            async move {
                let outcome = match request.send().await {
                    Ok(response) if response.status().is_success() => Ok(()),
                    Ok(response) => Err(format!("HTTP {}", response.status())),
                    Err(err) => Err(err.to_string()),
                };
                if let Err(reason) = &outcome {
                    debug!(attempt, url = %target, reason = %reason, "Public URL probe failed");
                }
                outcome
            }
        })
        .await;

        match result {
            Ok(()) => ProbeOutcome::Reached { attempts },
            Err(_) => ProbeOutcome::Unreached { attempts },
        }
    }
}
