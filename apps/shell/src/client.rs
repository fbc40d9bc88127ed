//! Typed client for the control API.

use crate::error::{ShellError, ShellErrorExt};
use callkit::domain::constants::{ACCOUNT_SID_HEADER, AUTH_TOKEN_HEADER};
use callkit::domain::models::{
    CredentialsStatus, ErrorBody, MaskedCredentials, PhoneNumberRecord, PlaceCallRequest,
    PlaceCallResponse, SaveCredentialsRequest, SuccessResponse, UpdateVoiceUrlRequest,
};
use callkit::domain::readiness::{ProbeResponse, ReadinessSnapshot, SelectNumberRequest};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

// Probes retry for up to attempts * interval on the server side.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Credentials sent with every request instead of the stored ones.
#[derive(Clone)]
pub struct AccountOverride {
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for AccountOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountOverride")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ControlClient {
    http: reqwest::Client,
    base: String,
    account: Option<AccountOverride>,
}

impl ControlClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base: &str, account: Option<AccountOverride>) -> Result<Self, ShellError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base: base.trim_end_matches('/').to_owned(), account })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{path}", self.base));
        match &self.account {
            Some(account) => request
                .header(ACCOUNT_SID_HEADER, &account.account_sid)
                .header(AUTH_TOKEN_HEADER, &account.auth_token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ShellError> {
        let response = request.send().await.context(format!("Connecting to {}", self.base))?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Control API response");

        if status.is_success() {
            return response.json::<T>().await.context("Decoding response");
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|err| err.error)
            .ok()
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_owned()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_owned());

        Err(ShellError::Api { status: status.as_u16(), message: message.into(), context: None })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ShellError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ShellError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// # Errors
    /// Transport or API errors.
    pub async fn readiness(&self) -> Result<ReadinessSnapshot, ShellError> {
        self.get("/readiness").await
    }

    /// # Errors
    /// Transport or API errors.
    pub async fn credentials_status(&self) -> Result<CredentialsStatus, ShellError> {
        self.get("/credentials-status").await
    }

    /// # Errors
    /// Transport or API errors.
    pub async fn credentials(&self) -> Result<MaskedCredentials, ShellError> {
        self.get("/credentials").await
    }

    /// # Errors
    /// `Api` with status 400 when a field is blank.
    pub async fn save_credentials(&self, account_sid: &str, auth_token: &str) -> Result<(), ShellError> {
        let body = SaveCredentialsRequest {
            account_sid: Some(account_sid.to_owned()),
            auth_token: Some(auth_token.to_owned()),
        };
        let _: SuccessResponse = self.post("/credentials", &body).await?;
        Ok(())
    }

    /// # Errors
    /// Transport or API errors.
    pub async fn numbers(&self) -> Result<Vec<PhoneNumberRecord>, ShellError> {
        self.get("/numbers").await
    }

    /// # Errors
    /// Transport or API errors.
    pub async fn set_voice_url(&self, sid: &str, voice_url: &str) -> Result<PhoneNumberRecord, ShellError> {
        let body = UpdateVoiceUrlRequest { phone_number_sid: sid.to_owned(), voice_url: voice_url.to_owned() };
        self.post("/numbers", &body).await
    }

    /// # Errors
    /// `Api` with status 404 for an unknown number.
    pub async fn select_number(&self, sid: &str) -> Result<ReadinessSnapshot, ShellError> {
        self.post("/readiness/select", &SelectNumberRequest { phone_number_sid: sid.to_owned() }).await
    }

    /// # Errors
    /// Transport or API errors.
    pub async fn probe(&self) -> Result<ProbeResponse, ShellError> {
        self.post("/readiness/probe", &serde_json::json!({})).await
    }

    /// # Errors
    /// `Api` with status 400 without a selected number or public URL.
    pub async fn update_webhook(&self) -> Result<ReadinessSnapshot, ShellError> {
        self.post("/readiness/webhook", &serde_json::json!({})).await
    }

    /// # Errors
    /// Transport or API errors; see the control API for the failure kinds.
    pub async fn place_call(&self, phone_number: &str) -> Result<PlaceCallResponse, ShellError> {
        self.post("/call", &PlaceCallRequest { phone_number: Some(phone_number.to_owned()) }).await
    }
}
