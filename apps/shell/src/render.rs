//! Plain-text rendering of API results.

use crate::error::ShellError;
use callkit::domain::models::{MaskedCredentials, PhoneNumberRecord};
use callkit::domain::readiness::{ChecklistControl, ChecklistItem, ReadinessSnapshot};
use std::fmt::Write;

/// Command hint for an item's affordance.
pub fn control_hint(control: &ChecklistControl) -> String {
    match control {
        ChecklistControl::OpenUrl { url } => format!("open {url}"),
        ChecklistControl::EditCredentials => "callkit credentials set <ACCOUNT_SID> <AUTH_TOKEN>".to_owned(),
        ChecklistControl::SelectNumber => "callkit numbers select <SID>".to_owned(),
        ChecklistControl::CheckTunnel => "callkit probe".to_owned(),
        ChecklistControl::UpdateWebhook => "callkit webhook update".to_owned(),
    }
}

fn item(out: &mut String, item: &ChecklistItem) {
    let mark = if item.done { 'x' } else { ' ' };
    let _ = writeln!(out, "[{mark}] {}", item.label);
    if !item.done {
        let _ = writeln!(out, "      {}", item.description);
    }
    if let Some(control) = &item.control {
        let _ = writeln!(out, "      -> {}", control_hint(control));
    }
}

pub fn checklist(snapshot: &ReadinessSnapshot) -> String {
    let mut out = String::new();
    let pending = snapshot.pending().count();
    if snapshot.ready {
        out.push_str("Ready to call\n");
    } else {
        let _ = writeln!(out, "Setup incomplete ({pending} of {} steps pending)", snapshot.items.len());
    }
    out.push('\n');

    for entry in &snapshot.items {
        item(&mut out, entry);
    }

    out.push('\n');
    if let Some(number) = &snapshot.selected_number {
        let _ = writeln!(out, "Calling number: {} ({})", number.phone_number, number.sid);
    }
    if !snapshot.tunnel.public_url.is_empty() {
        let reachable = if snapshot.tunnel.public_url_accessible { "reachable" } else { "not verified" };
        let _ = writeln!(out, "Public URL:     {} [{reachable}]", snapshot.tunnel.public_url);
    }
    if let Some(webhook) = &snapshot.expected_webhook_url {
        let _ = writeln!(out, "Webhook URL:    {webhook}");
    }
    if snapshot.probe_in_progress {
        out.push_str("Probing the public URL...\n");
    }
    out
}

/// Progress line shown while a probe runs; suppressed for JSON output.
pub const fn probe_notice(json: bool) -> Option<&'static str> {
    if json { None } else { Some("Probing the public URL, this can take a few seconds...") }
}

pub fn numbers(numbers: &[PhoneNumberRecord], selected: Option<&str>) -> String {
    if numbers.is_empty() {
        return "No phone numbers on this account\n".to_owned();
    }

    let mut out = String::new();
    for number in numbers {
        let marker = if Some(number.sid.as_str()) == selected { '*' } else { ' ' };
        let voice_url = if number.voice_url.is_empty() { "-" } else { &number.voice_url };
        let _ = writeln!(
            out,
            "{marker} {}  {}  {}  voice: {voice_url}",
            number.sid, number.phone_number, number.friendly_name
        );
    }
    out
}

pub fn credentials(masked: &MaskedCredentials) -> String {
    if masked.account_sid.is_empty() && masked.auth_token.is_empty() {
        return "No credentials stored\n".to_owned();
    }
    format!("Account SID: {}\nAuth Token:  {}\n", masked.account_sid, masked.auth_token)
}

/// Refuses to call until every checklist step is done, unless `force` is set.
///
/// # Errors
/// `NotReady` listing the pending steps.
pub fn ensure_ready(snapshot: &ReadinessSnapshot, force: bool) -> Result<(), ShellError> {
    if snapshot.ready || force {
        return Ok(());
    }
    let pending = snapshot.pending().map(|item| item.label.as_str()).collect::<Vec<_>>().join(", ");
    Err(ShellError::NotReady {
        message: format!("Setup is not complete. Pending: {pending}. Use --force to call anyway").into(),
        context: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit::domain::readiness::{ChecklistStep, TunnelStatus};

    fn snapshot(done: &[ChecklistStep]) -> ReadinessSnapshot {
        let items: Vec<ChecklistItem> = ChecklistStep::ALL
            .into_iter()
            .map(|step| ChecklistItem {
                step,
                label: step.label().to_owned(),
                description: step.description().to_owned(),
                done: done.contains(&step),
                control: None,
            })
            .collect();
        ReadinessSnapshot {
            ready: items.iter().all(|item| item.done),
            items,
            tunnel: TunnelStatus {
                local_server_up: true,
                public_url: "https://abc.ngrok.app".to_owned(),
                public_url_accessible: false,
            },
            ..ReadinessSnapshot::default()
        }
    }

    #[test]
    fn checklist_marks_done_steps() {
        let text = checklist(&snapshot(&[ChecklistStep::Account, ChecklistStep::LocalServer]));

        assert!(text.starts_with("Setup incomplete (4 of 6 steps pending)"));
        assert!(text.contains("[x] Set up Twilio account"));
        assert!(text.contains("[ ] Start ngrok"));
        assert!(text.contains("https://abc.ngrok.app [not verified]"));
    }

    #[test]
    fn checklist_shows_control_hints() {
        let mut snap = snapshot(&[]);
        snap.items[4].control = Some(ChecklistControl::CheckTunnel);

        assert!(checklist(&snap).contains("-> callkit probe"));
    }

    #[test]
    fn call_gate_lists_pending_steps() {
        let snap = snapshot(&[
            ChecklistStep::Account,
            ChecklistStep::PhoneNumber,
            ChecklistStep::CallingNumber,
            ChecklistStep::LocalServer,
            ChecklistStep::Tunnel,
        ]);

        let err = ensure_ready(&snap, false).unwrap_err();
        assert!(err.to_string().contains("Update Twilio webhook URL"));
        assert!(!err.to_string().contains("Start ngrok"));

        assert!(ensure_ready(&snap, true).is_ok());
        assert!(ensure_ready(&snapshot(&ChecklistStep::ALL), false).is_ok());
    }

    #[test]
    fn numbers_mark_the_selection() {
        let records = vec![
            PhoneNumberRecord {
                sid: "PN1".to_owned(),
                friendly_name: "Main".to_owned(),
                phone_number: "+15550001111".to_owned(),
                voice_url: String::new(),
            },
            PhoneNumberRecord {
                sid: "PN2".to_owned(),
                friendly_name: "Spare".to_owned(),
                phone_number: "+15550002222".to_owned(),
                voice_url: "https://abc.ngrok.app/twiml".to_owned(),
            },
        ];

        let text = numbers(&records, Some("PN2"));
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("  PN1") && lines[0].ends_with("voice: -"));
        assert!(lines[1].starts_with("* PN2"));
        assert_eq!(numbers(&[], None), "No phone numbers on this account\n");
    }

    #[test]
    fn json_output_has_no_progress_text() {
        assert_eq!(probe_notice(true), None);
        assert!(probe_notice(false).is_some());
    }

    #[test]
    fn empty_credentials_are_reported() {
        assert_eq!(credentials(&MaskedCredentials::default()), "No credentials stored\n");
    }
}
