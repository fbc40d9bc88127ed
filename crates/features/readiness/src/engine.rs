//! Readiness reconciliation: merges the observations of each tick into one snapshot.

use crate::checklist::{Affordances, ReadinessFacts, checklist};
use crate::error::ReadinessError;
use crate::prober::{ProbeOutcome, Prober};
use crate::source::ReadinessSource;
use callkit_domain::constants::callback_url;
use callkit_domain::models::{MaskedCredentials, PhoneNumberRecord};
use callkit_domain::readiness::{ReadinessSnapshot, TunnelStatus};
use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct EngineState {
    credentials_set: bool,
    masked: Option<MaskedCredentials>,
    numbers: Vec<PhoneNumberRecord>,
    /// Remembered across ticks, even while the number list is empty.
    selected_sid: Option<String>,
    local_server_up: bool,
    public_url: String,
    /// Public URL of the last successful probe.
    reachable_url: Option<String>,
    /// Last failure per observation, so repeated failures are logged once.
    failures: [Option<String>; 3],
}

#[derive(Clone, Copy)]
enum Observation {
    Credentials = 0,
    Numbers = 1,
    Tunnel = 2,
}

impl Observation {
    const fn name(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Numbers => "phone numbers",
            Self::Tunnel => "tunnel status",
        }
    }
}

impl EngineState {
    fn selected(&self) -> Option<&PhoneNumberRecord> {
        let sid = self.selected_sid.as_deref()?;
        self.numbers.iter().find(|number| number.sid == sid)
    }

    fn public_url_accessible(&self) -> bool {
        !self.public_url.is_empty() && self.reachable_url.as_deref() == Some(self.public_url.as_str())
    }

    fn facts(&self) -> ReadinessFacts {
        let expected = callback_url(&self.public_url);
        let selected = self.selected();
        ReadinessFacts {
            account: self.credentials_set,
            phone_number: !self.numbers.is_empty(),
            calling_number: selected.is_some(),
            local_server: self.local_server_up,
            tunnel: self.public_url_accessible(),
            webhook: expected.is_some_and(|url| selected.is_some_and(|n| n.voice_url == url)),
        }
    }

    fn snapshot(&self, probe_in_progress: bool) -> ReadinessSnapshot {
        let facts = self.facts();
        let expected_webhook_url = callback_url(&self.public_url);
        let affordances = Affordances {
            number_count: self.numbers.len(),
            can_probe: self.local_server_up && !self.public_url.is_empty() && !probe_in_progress,
            can_update_webhook: self.selected().is_some() && expected_webhook_url.is_some(),
        };

        ReadinessSnapshot {
            ready: facts.ready(),
            items: checklist(facts, affordances),
            credentials_set: self.credentials_set,
            masked_credentials: self.masked.clone(),
            phone_numbers: self.numbers.clone(),
            selected_number: self.selected().cloned(),
            tunnel: TunnelStatus {
                local_server_up: self.local_server_up,
                public_url: self.public_url.clone(),
                public_url_accessible: self.public_url_accessible(),
            },
            expected_webhook_url,
            probe_in_progress,
        }
    }

    /// Logs a failing observation at `warn` once, then at `debug` while it keeps failing.
    fn record_failure(&mut self, observation: Observation, err: &impl Display) {
        let message = err.to_string();
        let slot = &mut self.failures[observation as usize];
        if slot.as_deref() == Some(message.as_str()) {
            debug!(source = observation.name(), error = %message, "Readiness observation still failing");
        } else {
            warn!(source = observation.name(), error = %message, "Readiness observation failed");
            *slot = Some(message);
        }
    }

    fn record_success(&mut self, observation: Observation) {
        if self.failures[observation as usize].take().is_some() {
            info!(source = observation.name(), "Readiness observation recovered");
        }
    }
}

/// Resets the in-progress flag even if the probe future is dropped.
struct ProbeGuard<'a>(&'a AtomicBool);

impl<'a> ProbeGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).ok().map(|_| Self(flag))
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Polls a [`ReadinessSource`], derives the six checklist facts and publishes snapshots.
///
/// State sits behind a short-held mutex that is never locked across an `.await`, so a
/// probe may overlap a tick; whichever finishes last wins.
#[derive(Debug)]
pub struct ReadinessEngine<S> {
    source: S,
    prober: Prober,
    state: Mutex<EngineState>,
    probing: AtomicBool,
    snapshots: watch::Sender<ReadinessSnapshot>,
}

impl<S: ReadinessSource> ReadinessEngine<S> {
    pub fn new(source: S, prober: Prober) -> Self {
        let (snapshots, _) = watch::channel(EngineState::default().snapshot(false));
        Self { source, prober, state: Mutex::new(EngineState::default()), probing: AtomicBool::new(false), snapshots }
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ReadinessSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receives every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ReadinessSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self, state: &EngineState) -> ReadinessSnapshot {
        let snapshot = state.snapshot(self.probing.load(Ordering::Acquire));
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    fn publish_current(&self) -> ReadinessSnapshot {
        let state = self.state.lock();
        self.publish(&state)
    }

    /// Runs one observation pass. Failed observations degrade their items; the tick
    /// itself never fails.
    pub async fn tick(&self) -> ReadinessSnapshot {
        let credentials = self.source.credentials_set().await;
        let masked = match &credentials {
            Ok(true) => Some(self.source.masked_credentials().await),
            _ => None,
        };
        let numbers = self.source.phone_numbers().await;
        let public_url = self.source.public_url().await;

        let mut state = self.state.lock();

        match credentials {
            Ok(set) => {
                state.record_success(Observation::Credentials);
                state.credentials_set = set;
                if !set {
                    state.masked = None;
                }
            },
            Err(err) => {
                state.record_failure(Observation::Credentials, &err);
                state.credentials_set = false;
                state.masked = None;
            },
        }
        match masked {
            Some(Ok(masked)) => state.masked = masked,
            Some(Err(err)) => debug!(error = %err, "Keeping previous masked credentials"),
            None => {},
        }

        let numbers = match numbers {
            Ok(numbers) => {
                state.record_success(Observation::Numbers);
                numbers
            },
            Err(err) => {
                state.record_failure(Observation::Numbers, &err);
                Vec::new()
            },
        };
        state.numbers = numbers;
        if state.selected().is_none() {
            if let Some(first) = state.numbers.first().map(|number| number.sid.clone()) {
                if let Some(previous) = &state.selected_sid {
                    debug!(previous = %previous, sid = %first, "Selected number vanished, falling back to the first one");
                }
                state.selected_sid = Some(first);
            }
        }

        match public_url {
            Ok(url) => {
                state.record_success(Observation::Tunnel);
                state.local_server_up = true;
                state.public_url = url.unwrap_or_default();
            },
            Err(err) => {
                state.record_failure(Observation::Tunnel, &err);
                state.local_server_up = false;
                state.public_url.clear();
            },
        }

        self.publish(&state)
    }

    /// Selects the number used for the calling-number and webhook steps.
    ///
    /// # Errors
    /// `NotFound` when `sid` is not among the numbers of the last tick.
    pub fn select_number(&self, sid: &str) -> Result<ReadinessSnapshot, ReadinessError> {
        let mut state = self.state.lock();
        if !state.numbers.iter().any(|number| number.sid == sid) {
            return Err(ReadinessError::NotFound {
                message: format!("Phone number {sid} not found").into(),
                context: None,
            });
        }
        state.selected_sid = Some(sid.to_owned());
        info!(sid, "Phone number selected");
        Ok(self.publish(&state))
    }

    /// Probes the current public URL and records whether it is reachable.
    ///
    /// Returns `None` without probing when the tunnel server is down, no public URL is
    /// known, or another probe is already running.
    pub async fn probe_tunnel(&self) -> Option<ProbeOutcome> {
        let url = {
            let state = self.state.lock();
            if !state.local_server_up || state.public_url.is_empty() {
                return None;
            }
            state.public_url.clone()
        };

        let Some(guard) = ProbeGuard::acquire(&self.probing) else {
            debug!("Tunnel probe already in progress");
            return None;
        };
        self.publish_current();

        let outcome = self.prober.probe(&url).await;
        info!(url = %url, reached = outcome.is_reached(), attempts = outcome.attempts(), "Tunnel probe finished");

        {
            let mut state = self.state.lock();
            if outcome.is_reached() {
                state.reachable_url = Some(url);
            } else if state.reachable_url.as_deref() == Some(url.as_str()) {
                state.reachable_url = None;
            }
        }
        drop(guard);
        self.publish_current();

        Some(outcome)
    }

    /// Points the selected number's voice URL at `<public URL>/twiml`.
    ///
    /// # Errors
    /// `Precondition` without a selected number or a public URL; provider errors as-is.
    pub async fn update_webhook(&self) -> Result<ReadinessSnapshot, ReadinessError> {
        let (sid, url) = {
            let state = self.state.lock();
            let sid = state.selected().map(|number| number.sid.clone()).ok_or_else(|| {
                ReadinessError::Precondition { message: "No phone number selected".into(), context: None }
            })?;
            let url = callback_url(&state.public_url).ok_or_else(|| ReadinessError::Precondition {
                message: "Public URL not configured. Start the websocket server and ngrok first".into(),
                context: None,
            })?;
            (sid, url)
        };

        self.source.update_voice_url(&sid, &url).await?;
        info!(sid = %sid, url = %url, "Webhook URL updated");

        let mut state = self.state.lock();
        if let Some(number) = state.numbers.iter_mut().find(|number| number.sid == sid) {
            number.voice_url = url;
        }
        Ok(self.publish(&state))
    }
}
