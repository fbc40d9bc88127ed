//! Minimal client for the provider's REST API (accounts, numbers, calls).

use crate::error::{TelephonyError, TelephonyErrorExt};
use callkit_credentials::AccountCredentials;
use callkit_domain::config::TelephonyConfig;
use callkit_domain::models::PhoneNumberRecord;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const API_VERSION: &str = "2010-04-01";

#[derive(Deserialize)]
struct NumberPage {
    #[serde(default)]
    incoming_phone_numbers: Vec<WireNumber>,
}

#[derive(Deserialize)]
struct WireNumber {
    sid: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    voice_url: Option<String>,
}

impl From<WireNumber> for PhoneNumberRecord {
    fn from(wire: WireNumber) -> Self {
        Self {
            sid: wire.sid,
            friendly_name: wire.friendly_name.unwrap_or_default(),
            phone_number: wire.phone_number.unwrap_or_default(),
            voice_url: wire.voice_url.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct WireCall {
    sid: String,
}

#[derive(Deserialize)]
struct WireError {
    message: String,
}

/// Builds [`TwilioClient`]s from credential strings.
///
/// Clients are cheap: they share one connection pool and are created per request, so a
/// credential change takes effect on the next call without any global state.
#[derive(Debug, Clone)]
pub struct TelephonyClientFactory {
    http: reqwest::Client,
    api_base: String,
}

impl TelephonyClientFactory {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &TelephonyConfig) -> Result<Self, TelephonyError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build telephony HTTP client")?;

        Ok(Self { http, api_base: config.api_base.trim_end_matches('/').to_owned() })
    }

    /// A client for the given credentials, or `None` (disabled) when either one is
    /// missing or blank.
    #[must_use]
    pub fn create(&self, account_sid: Option<&str>, auth_token: Option<&str>) -> Option<TwilioClient> {
        let Some(credentials) = AccountCredentials::from_parts(account_sid, auth_token) else {
            warn!("Twilio credentials not provided. Twilio client will be disabled.");
            return None;
        };
        Some(self.with_credentials(credentials))
    }

    #[must_use]
    pub fn with_credentials(&self, credentials: AccountCredentials) -> TwilioClient {
        TwilioClient { http: self.http.clone(), api_base: self.api_base.clone(), credentials }
    }
}

/// Account-scoped client. `Debug` masks the credentials.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    api_base: String,
    credentials: AccountCredentials,
}

impl TwilioClient {
    fn account_url(&self, resource: &str) -> String {
        format!("{}/{API_VERSION}/Accounts/{}/{resource}", self.api_base, self.credentials.account_sid)
    }

    /// Numbers provisioned on the account, in provider order.
    ///
    /// # Errors
    /// `Provider` when the API rejects the request, `Http` on transport failures.
    pub async fn list_numbers(&self, limit: u32) -> Result<Vec<PhoneNumberRecord>, TelephonyError> {
        let request = self
            .http
            .get(self.account_url("IncomingPhoneNumbers.json"))
            .query(&[("PageSize", limit)]);

        let page: NumberPage = self.send(request).await.context("Listing phone numbers")?;
        debug!(count = page.incoming_phone_numbers.len(), "Listed phone numbers");

        Ok(page.incoming_phone_numbers.into_iter().map(PhoneNumberRecord::from).collect())
    }

    /// Points a number's voice webhook at `voice_url` and returns the updated record.
    ///
    /// # Errors
    /// `Provider` when the API rejects the request, `Http` on transport failures.
    pub async fn update_voice_url(
        &self,
        number_sid: &str,
        voice_url: &str,
    ) -> Result<PhoneNumberRecord, TelephonyError> {
        let request = self
            .http
            .post(self.account_url(&format!("IncomingPhoneNumbers/{number_sid}.json")))
            .form(&[("VoiceUrl", voice_url)]);

        let number: WireNumber = self.send(request).await.context("Updating voice URL")?;
        Ok(number.into())
    }

    /// Starts an outbound call and returns its sid.
    ///
    /// # Errors
    /// `Provider` when the API rejects the request, `Http` on transport failures.
    pub async fn create_call(&self, to: &str, from: &str, url: &str) -> Result<String, TelephonyError> {
        let request =
            self.http.post(self.account_url("Calls.json")).form(&[("To", to), ("From", from), ("Url", url)]);

        let call: WireCall = self.send(request).await.context("Creating call")?;
        Ok(call.sid)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TelephonyError> {
        let response = request
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TelephonyError::Provider { message: provider_message(status, &body).into(), context: None })
    }
}

/// The provider's own error message, falling back to the raw body or the status line.
fn provider_message(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<WireError>(body) {
        return err.message;
    }
    let body = body.trim();
    if body.is_empty() { format!("Telephony provider returned {status}") } else { body.to_owned() }
}
