//! Readiness checklist and snapshot models.

use crate::models::{MaskedCredentials, PhoneNumberRecord};
use callkit_derive::api_model;
use serde::{Deserialize, Serialize};

/// The six checklist steps, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum ChecklistStep {
    Account,
    PhoneNumber,
    CallingNumber,
    LocalServer,
    Tunnel,
    Webhook,
}

impl ChecklistStep {
    pub const ALL: [Self; 6] = [
        Self::Account,
        Self::PhoneNumber,
        Self::CallingNumber,
        Self::LocalServer,
        Self::Tunnel,
        Self::Webhook,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Account => "Set up Twilio account",
            Self::PhoneNumber => "Set up Twilio phone number",
            Self::CallingNumber => "Configure Twilio calling number",
            Self::LocalServer => "Start local WebSocket server",
            Self::Tunnel => "Start ngrok",
            Self::Webhook => "Update Twilio webhook URL",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Account => "Enter your Twilio credentials or update them in the credentials file",
            Self::PhoneNumber => "Costs around $1.15/month",
            Self::CallingNumber => "Set telephony.phone_number or use the first available number",
            Self::LocalServer => "cd websocket-server && npm run dev",
            Self::Tunnel => "Then set the ngrok URL in websocket-server/.env",
            Self::Webhook => "Can also be done manually in the Twilio console",
        }
    }
}

/// Interactive affordance attached to a checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ChecklistControl {
    /// Open a provider console page.
    OpenUrl { url: String },
    /// Enter or update the account credentials.
    EditCredentials,
    /// Choose among several provisioned numbers.
    SelectNumber,
    /// Run the reachability probe for the public URL.
    CheckTunnel,
    /// Point the selected number's voice URL at the expected callback.
    UpdateWebhook,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub step: ChecklistStep,
    pub label: String,
    pub description: String,
    pub done: bool,
    pub control: Option<ChecklistControl>,
}

#[api_model]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TunnelStatus {
    pub local_server_up: bool,
    /// Public URL reported by the tunnel server; empty when unknown.
    pub public_url: String,
    /// Set by the reachability probe for the current public URL.
    pub public_url_accessible: bool,
}

/// Everything a presentation layer needs to render the checklist.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ReadinessSnapshot {
    /// Logical AND of every item's `done`.
    pub ready: bool,
    pub items: Vec<ChecklistItem>,
    pub credentials_set: bool,
    pub masked_credentials: Option<MaskedCredentials>,
    pub phone_numbers: Vec<PhoneNumberRecord>,
    pub selected_number: Option<PhoneNumberRecord>,
    pub tunnel: TunnelStatus,
    /// `publicUrl + "/twiml"` when a public URL is known.
    pub expected_webhook_url: Option<String>,
    pub probe_in_progress: bool,
}

impl ReadinessSnapshot {
    /// Items that still block readiness.
    pub fn pending(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|item| !item.done)
    }
}

/// Body of `POST /readiness/select`.
#[api_model]
#[derive(Clone)]
pub struct SelectNumberRequest {
    pub phone_number_sid: String,
}

/// Result of `POST /readiness/probe`.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub reached: bool,
    pub attempts: u32,
    pub snapshot: ReadinessSnapshot,
}
