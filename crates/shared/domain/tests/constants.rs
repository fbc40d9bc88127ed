use callkit_domain::constants::{
    ACCOUNT_SID_HEADER, ACCOUNT_SID_KEY, AUTH_TOKEN_HEADER, AUTH_TOKEN_KEY, TWIML_PATH, callback_url,
};

#[test]
fn constants_match_wire_names() {
    assert_eq!(ACCOUNT_SID_KEY, "TWILIO_ACCOUNT_SID");
    assert_eq!(AUTH_TOKEN_KEY, "TWILIO_AUTH_TOKEN");
    assert_eq!(ACCOUNT_SID_HEADER, "x-twilio-account-sid");
    assert_eq!(AUTH_TOKEN_HEADER, "x-twilio-auth-token");
    assert_eq!(TWIML_PATH, "/twiml");
}

#[test]
fn callback_url_appends_twiml_path() {
    assert_eq!(callback_url("https://abc.ngrok.app").as_deref(), Some("https://abc.ngrok.app/twiml"));
    assert_eq!(callback_url("https://abc.ngrok.app/").as_deref(), Some("https://abc.ngrok.app/twiml"));
    assert_eq!(callback_url(""), None);
    assert_eq!(callback_url("   "), None);
}
