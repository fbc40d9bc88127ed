#![allow(clippy::print_stdout)]

use crate::cli::{Cli, Commands, CredentialsCommands, NumbersCommands, WebhookCommands};
use crate::client::{AccountOverride, ControlClient};
use crate::render;
use anyhow::Result;
use callkit::domain::readiness::ReadinessSnapshot;
use serde::Serialize;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

/// Executes one parsed command against the control API.
///
/// # Errors
/// Transport failures, API errors and the readiness gate of `call`.
pub async fn run(cli: Cli) -> Result<()> {
    let account = cli
        .account_sid
        .zip(cli.auth_token)
        .map(|(account_sid, auth_token)| AccountOverride { account_sid, auth_token });
    let client = ControlClient::new(&cli.server, account)?;
    let json = cli.json;

    match cli.command {
        Commands::Status => {
            let snapshot = client.readiness().await?;
            emit(json, &snapshot, render::checklist)
        },
        Commands::Watch { interval_ms, until_ready } => {
            watch(&client, Duration::from_millis(interval_ms.max(100)), until_ready, json).await
        },
        Commands::Credentials { command } => match command {
            CredentialsCommands::Show => {
                let masked = client.credentials().await?;
                emit(json, &masked, render::credentials)
            },
            CredentialsCommands::Set { sid, token } => {
                client.save_credentials(&sid, &token).await?;
                let masked = client.credentials().await?;
                emit(json, &masked, |m| format!("Credentials saved\n{}", render::credentials(m)))
            },
        },
        Commands::Numbers { command } => match command {
            NumbersCommands::List => {
                let numbers = client.numbers().await?;
                let selected = client.readiness().await.ok().and_then(|s| s.selected_number);
                let selected_sid = selected.as_ref().map(|n| n.sid.as_str());
                emit(json, &numbers, |n| render::numbers(n, selected_sid))
            },
            NumbersCommands::Select { sid } => {
                let snapshot = client.select_number(&sid).await?;
                emit(json, &snapshot, render::checklist)
            },
        },
        Commands::Webhook { command } => match command {
            WebhookCommands::Update => {
                let snapshot = client.update_webhook().await?;
                emit(json, &snapshot, |s| {
                    let url = s.expected_webhook_url.as_deref().unwrap_or_default();
                    format!("Webhook updated to {url}\n\n{}", render::checklist(s))
                })
            },
            WebhookCommands::Set { sid, voice_url } => {
                let number = client.set_voice_url(&sid, &voice_url).await?;
                emit(json, &number, |n| format!("{} now calls {}\n", n.phone_number, n.voice_url))
            },
        },
        Commands::Probe => {
            if let Some(notice) = render::probe_notice(json) {
                println!("{notice}");
            }
            let probe = client.probe().await?;
            emit(json, &probe, |p| match (p.attempts, p.reached) {
                (0, _) => "Probe skipped: the tunnel server is down or has no public URL yet\n".to_owned(),
                (n, true) => format!("Public URL reachable after {n} attempt(s)\n"),
                (n, false) => format!("Public URL not reachable after {n} attempts\n"),
            })
        },
        Commands::Call { phone_number, force } => {
            let snapshot = client.readiness().await?;
            render::ensure_ready(&snapshot, force)?;
            if !snapshot.ready {
                warn!("Calling with an incomplete setup");
            }
            let call = client.place_call(&phone_number).await?;
            info!(call_sid = %call.call_sid, "Call placed");
            emit(json, &call, |c| format!("Calling {phone_number} (call {})\n", c.call_sid))
        },
    }
}

/// Prints the checklist whenever it changes; Ctrl+C stops.
async fn watch(client: &ControlClient, interval: Duration, until_ready: bool, json: bool) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last: Option<ReadinessSnapshot> = None;
    let mut unreachable = false;

    loop {
        tokio::select! {
            _ = &mut shutdown => return Ok(()),
            _ = ticker.tick() => {},
        }

        let snapshot = match client.readiness().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                if !unreachable {
                    warn!(server = %client.base(), error = %err, "Readiness unavailable");
                    unreachable = true;
                }
                continue;
            },
        };
        unreachable = false;

        if last.as_ref() != Some(&snapshot) {
            emit(json, &snapshot, |s| format!("{}\n", render::checklist(s)))?;
        }
        if until_ready && snapshot.ready {
            return Ok(());
        }
        last = Some(snapshot);
    }
}
