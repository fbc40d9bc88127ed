//! Wire-level names shared by the server, the slices and the shell.

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const CREDENTIALS_TAG: &str = "Credentials";
pub const TELEPHONY_TAG: &str = "Telephony";
pub const READINESS_TAG: &str = "Readiness";

/// Keys written to the credentials file.
pub const ACCOUNT_SID_KEY: &str = "TWILIO_ACCOUNT_SID";
pub const AUTH_TOKEN_KEY: &str = "TWILIO_AUTH_TOKEN";
/// Tag line written once above the credential lines.
pub const CREDENTIALS_COMMENT: &str = "# Twilio credentials";

/// Per-request credential override headers.
pub const ACCOUNT_SID_HEADER: &str = "x-twilio-account-sid";
pub const AUTH_TOKEN_HEADER: &str = "x-twilio-auth-token";

/// Path served by the tunnel server (and echoed through the public URL).
pub const PUBLIC_URL_PATH: &str = "/public-url";
/// Path appended to the public URL to form the voice callback.
pub const TWIML_PATH: &str = "/twiml";

pub const CONSOLE_URL: &str = "https://console.twilio.com/";
pub const NUMBERS_CONSOLE_URL: &str =
    "https://console.twilio.com/us1/develop/phone-numbers/manage/incoming";

/// Builds the callback URL for a public tunnel URL; `None` when the URL is empty.
#[must_use]
pub fn callback_url(public_url: &str) -> Option<String> {
    let base = public_url.trim().trim_end_matches('/');
    (!base.is_empty()).then(|| format!("{base}{TWIML_PATH}"))
}
