use callkit_derive::api_model;

/// A number provisioned on the telephony account.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct PhoneNumberRecord {
    /// Stable provider identifier (`PN...`).
    pub sid: String,
    pub friendly_name: String,
    /// E.164 number used as the caller id.
    pub phone_number: String,
    /// Currently configured voice callback; empty when none is set.
    pub voice_url: String,
}

/// Credentials as shown to users: first and last four characters only.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MaskedCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CredentialsStatus {
    pub credentials_set: bool,
}

/// Body of `POST /credentials`; both fields are required.
#[api_model]
#[derive(Clone, Default)]
pub struct SaveCredentialsRequest {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Body of `POST /numbers`.
#[api_model]
#[derive(Clone)]
pub struct UpdateVoiceUrlRequest {
    pub phone_number_sid: String,
    pub voice_url: String,
}

/// Body of `POST /call`.
#[api_model]
#[derive(Clone, Default)]
pub struct PlaceCallRequest {
    pub phone_number: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct PlaceCallResponse {
    pub success: bool,
    pub call_sid: String,
}

/// Error body returned by every failing endpoint.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
