//! Periodic ticking of the readiness engine.

use crate::engine::ReadinessEngine;
use crate::source::ReadinessSource;
use callkit_domain::config::ReadinessConfig;
use callkit_domain::readiness::{ReadinessSnapshot, TunnelStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    /// Probe the public URL when the tunnel server comes up (or its URL changes) while
    /// the checklist is not complete.
    pub auto_probe: bool,
}

impl From<&ReadinessConfig> for PollOptions {
    fn from(config: &ReadinessConfig) -> Self {
        Self { interval: config.poll_interval(), auto_probe: config.auto_probe }
    }
}

/// Handle to the polling task. The task runs until [`Poller::stop`].
#[derive(Debug)]
pub struct Poller {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Spawns the polling task on the current runtime. The first tick fires immediately.
    pub fn spawn<S: ReadinessSource>(engine: Arc<ReadinessEngine<S>>, options: PollOptions) -> Self {
        let (stop, stop_rx) = watch::channel(false);
        let task = tokio::spawn(poll_loop(engine, options, stop_rx));
        info!(interval = ?options.interval, auto_probe = options.auto_probe, "Readiness polling started");
        Self { stop, task }
    }

    /// Signals the task and waits for it to finish its current tick.
    pub async fn stop(self) {
        self.stop.send_replace(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "Readiness polling task ended abnormally");
        }
        info!("Readiness polling stopped");
    }
}

async fn poll_loop<S: ReadinessSource>(
    engine: Arc<ReadinessEngine<S>>,
    options: PollOptions,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(options.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut previous: Option<TunnelStatus> = None;

    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = ticker.tick() => {},
        }
        if *stop.borrow() {
            break;
        }

        let snapshot = engine.tick().await;

        if options.auto_probe && should_auto_probe(previous.as_ref(), &snapshot) {
            debug!(url = %snapshot.tunnel.public_url, "Tunnel server is up, probing public URL");
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine.probe_tunnel().await;
            });
        }
        previous = Some(snapshot.tunnel);
    }
}

/// True when the tunnel server just came up or started reporting a different URL, while
/// the checklist is incomplete and the current URL is not known to be reachable.
pub(crate) fn should_auto_probe(previous: Option<&TunnelStatus>, current: &ReadinessSnapshot) -> bool {
    let tunnel = &current.tunnel;
    if current.ready || !tunnel.local_server_up || tunnel.public_url.is_empty() || tunnel.public_url_accessible {
        return false;
    }
    previous.is_none_or(|prev| !prev.local_server_up || prev.public_url != tunnel.public_url)
}
