use callkit_domain::config::{TelephonyConfig, TunnelConfig};
use callkit_telephony::{CallInitiator, TelephonyClientFactory, TelephonyError, TunnelClient, TwilioClient};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SID: &str = "AC00000000000000000000000000000002";

fn client_for(server: &MockServer) -> TwilioClient {
    let config = TelephonyConfig { api_base: server.uri(), ..TelephonyConfig::default() };
    TelephonyClientFactory::new(&config)
        .expect("factory")
        .create(Some(SID), Some("token-token-token"))
        .expect("client")
}

fn initiator(telephony: TelephonyConfig, tunnel_base: String) -> CallInitiator {
    let tunnel = TunnelClient::new(&TunnelConfig { base_url: tunnel_base, request_timeout_secs: 2 })
        .expect("tunnel client");
    CallInitiator::new(&telephony, tunnel)
}

/// A base URL nothing listens on.
fn dead_tunnel() -> String {
    "http://127.0.0.1:9".to_owned()
}

#[tokio::test]
async fn missing_client_is_reported_first() {
    let initiator = initiator(TelephonyConfig::default(), dead_tunnel());

    let err = initiator.place_call(None, "").await.expect_err("no client");
    assert!(matches!(err, TelephonyError::ClientNotInitialized { .. }));
}

#[tokio::test]
async fn empty_destination_is_missing_input() {
    let provider = MockServer::start().await;
    let initiator = initiator(TelephonyConfig::default(), dead_tunnel());

    let err = initiator.place_call(Some(&client_for(&provider)), "  ").await.expect_err("no number");
    assert!(matches!(err, TelephonyError::MissingInput { .. }));
    assert_eq!(err.to_string(), "Phone number is required");
}

#[tokio::test]
async fn unreachable_tunnel_without_webhook_names_the_public_url() {
    let provider = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&provider).await;
    let initiator = initiator(TelephonyConfig::default(), dead_tunnel());

    let err = initiator
        .place_call(Some(&client_for(&provider)), "+15551234567")
        .await
        .expect_err("no callback url");

    assert!(matches!(err, TelephonyError::Configuration { .. }));
    assert!(err.to_string().contains("public URL"), "{err}");
}

#[tokio::test]
async fn blank_public_url_is_a_configuration_error() {
    let provider = MockServer::start().await;
    let tunnel = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "publicUrl": "" })))
        .mount(&tunnel)
        .await;
    let initiator = initiator(TelephonyConfig::default(), tunnel.uri());

    let err = initiator
        .place_call(Some(&client_for(&provider)), "+15551234567")
        .await
        .expect_err("blank public url");

    assert!(matches!(err, TelephonyError::Configuration { .. }));
    assert!(err.to_string().starts_with("Public URL not configured"));
}

#[tokio::test]
async fn failing_tunnel_status_is_upstream_unavailable() {
    let provider = MockServer::start().await;
    let tunnel = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).mount(&tunnel).await;
    let initiator = initiator(TelephonyConfig::default(), tunnel.uri());

    let err = initiator
        .place_call(Some(&client_for(&provider)), "+15551234567")
        .await
        .expect_err("tunnel error");

    assert!(matches!(err, TelephonyError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn resolves_callback_and_first_number_then_dispatches() {
    let provider = MockServer::start().await;
    let tunnel = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public-url"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "publicUrl": "https://abc.ngrok.app/" })),
        )
        .mount(&tunnel)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/2010-04-01/Accounts/{SID}/IncomingPhoneNumbers.json")))
        .and(query_param("PageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "incoming_phone_numbers": [
                { "sid": "PN1", "friendly_name": "Main", "phone_number": "+15550001111", "voice_url": "" }
            ]
        })))
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/2010-04-01/Accounts/{SID}/Calls.json")))
        .and(body_string_contains("To=%2B15551234567"))
        .and(body_string_contains("From=%2B15550001111"))
        .and(body_string_contains("Url=https%3A%2F%2Fabc.ngrok.app%2Ftwiml"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": "CA123" })))
        .expect(1)
        .mount(&provider)
        .await;
    let initiator = initiator(TelephonyConfig::default(), tunnel.uri());

    let call_sid =
        initiator.place_call(Some(&client_for(&provider)), "+15551234567").await.expect("call placed");

    assert_eq!(call_sid, "CA123");
}

#[tokio::test]
async fn configured_values_skip_discovery() {
    let provider = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&provider).await;
    Mock::given(method("POST"))
        .and(body_string_contains("From=%2B15559990000"))
        .and(body_string_contains("Url=https%3A%2F%2Ffixed.example.com%2Ftwiml"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": "CA999" })))
        .expect(1)
        .mount(&provider)
        .await;
    let telephony = TelephonyConfig {
        webhook_url: Some("https://fixed.example.com/twiml".to_owned()),
        phone_number: Some("+15559990000".to_owned()),
        ..TelephonyConfig::default()
    };
    let initiator = initiator(telephony, dead_tunnel());

    let call_sid =
        initiator.place_call(Some(&client_for(&provider)), "+15551234567").await.expect("call placed");

    assert_eq!(call_sid, "CA999");
}

#[tokio::test]
async fn empty_number_list_is_a_configuration_error() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "incoming_phone_numbers": [] })))
        .mount(&provider)
        .await;
    let telephony = TelephonyConfig {
        webhook_url: Some("https://fixed.example.com/twiml".to_owned()),
        ..TelephonyConfig::default()
    };
    let initiator = initiator(telephony, dead_tunnel());

    let err = initiator
        .place_call(Some(&client_for(&provider)), "+15551234567")
        .await
        .expect_err("no numbers");

    assert_eq!(err.to_string(), "No phone numbers available for outbound calling");
}
