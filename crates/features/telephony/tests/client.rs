use callkit_domain::config::TelephonyConfig;
use callkit_telephony::{TelephonyClientFactory, TelephonyError, TwilioClient};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SID: &str = "AC00000000000000000000000000000001";
const TOKEN: &str = "test-auth-token-value";

fn client_for(server: &MockServer) -> TwilioClient {
    let config = TelephonyConfig { api_base: server.uri(), ..TelephonyConfig::default() };
    TelephonyClientFactory::new(&config)
        .expect("factory")
        .create(Some(SID), Some(TOKEN))
        .expect("client")
}

#[test]
fn factory_disables_without_both_credentials() {
    let factory = TelephonyClientFactory::new(&TelephonyConfig::default()).expect("factory");

    assert!(factory.create(None, None).is_none());
    assert!(factory.create(Some(SID), None).is_none());
    assert!(factory.create(Some(""), Some(TOKEN)).is_none());
    assert!(factory.create(Some(SID), Some(TOKEN)).is_some());
}

#[test]
fn client_debug_never_prints_the_token() {
    let factory = TelephonyClientFactory::new(&TelephonyConfig::default()).expect("factory");
    let client = factory.create(Some(SID), Some(TOKEN)).expect("client");

    assert!(!format!("{client:?}").contains(TOKEN));
}

#[tokio::test]
async fn list_numbers_maps_provider_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/2010-04-01/Accounts/{SID}/IncomingPhoneNumbers.json")))
        .and(query_param("PageSize", "20"))
        .and(basic_auth(SID, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "incoming_phone_numbers": [
                {
                    "sid": "PN1",
                    "friendly_name": "(555) 000-1111",
                    "phone_number": "+15550001111",
                    "voice_url": "https://abc.ngrok.app/twiml"
                },
                { "sid": "PN2", "friendly_name": "Spare", "phone_number": "+15550002222", "voice_url": null }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let numbers = client_for(&server).list_numbers(20).await.expect("numbers");

    assert_eq!(numbers.len(), 2);
    assert_eq!(numbers[0].sid, "PN1");
    assert_eq!(numbers[0].phone_number, "+15550001111");
    assert_eq!(numbers[0].voice_url, "https://abc.ngrok.app/twiml");
    assert_eq!(numbers[1].voice_url, "");
}

#[tokio::test]
async fn update_voice_url_posts_form_and_returns_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/2010-04-01/Accounts/{SID}/IncomingPhoneNumbers/PN1.json")))
        .and(body_string_contains("VoiceUrl=https%3A%2F%2Fabc.ngrok.app%2Ftwiml"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sid": "PN1",
            "friendly_name": "Main",
            "phone_number": "+15550001111",
            "voice_url": "https://abc.ngrok.app/twiml"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record =
        client_for(&server).update_voice_url("PN1", "https://abc.ngrok.app/twiml").await.expect("update");

    assert_eq!(record.voice_url, "https://abc.ngrok.app/twiml");
    assert_eq!(record.friendly_name, "Main");
}

#[tokio::test]
async fn provider_errors_are_passed_through_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/2010-04-01/Accounts/{SID}/Calls.json")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 21211,
            "message": "The 'To' number +1555 is not a valid phone number.",
            "status": 400
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_call("+1555", "+15550001111", "https://abc.ngrok.app/twiml")
        .await
        .expect_err("provider rejects");

    assert!(matches!(err, TelephonyError::Provider { .. }));
    assert_eq!(err.to_string(), "The 'To' number +1555 is not a valid phone number.");
}

#[tokio::test]
async fn non_json_provider_errors_fall_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).list_numbers(1).await.expect_err("unavailable");
    assert_eq!(err.to_string(), "Telephony provider returned 503 Service Unavailable");
}
