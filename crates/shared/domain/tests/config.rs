use callkit_domain::config::{ApiConfig, ReadinessConfig, ServerConfig, TelephonyConfig, TunnelConfig};
use serde_json::json;
use std::time::Duration;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let telephony = TelephonyConfig::default();
    assert_eq!(telephony.api_base, "https://api.twilio.com");
    assert!(telephony.webhook_url.is_none());
    assert_eq!(telephony.numbers_page_size, 20);

    let readiness = ReadinessConfig::default();
    assert_eq!(readiness.poll_interval(), Duration::from_secs(1));
    assert_eq!(readiness.probe_attempts, 5);
    assert_eq!(readiness.probe_interval(), Duration::from_secs(3));
    assert!(readiness.auto_probe);

    assert_eq!(TunnelConfig::default().base_url, "http://localhost:8081");
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "port": 8080 },
        "credentials": { "env_file": "/tmp/webapp/.env" },
        "telephony": { "webhook_url": "https://example.ngrok.app/twiml" },
        "readiness": { "probe_attempts": 2 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.credentials.env_file, std::path::PathBuf::from("/tmp/webapp/.env"));
    assert_eq!(cfg.telephony.webhook_url.as_deref(), Some("https://example.ngrok.app/twiml"));
    assert_eq!(cfg.telephony.request_timeout_secs, 10);
    assert_eq!(cfg.readiness.probe_attempts, 2);
    assert_eq!(cfg.readiness.probe_interval_ms, 3000);
}

#[test]
fn api_config_clones_share_until_mutated() {
    let base = ApiConfig::default();
    let mut tweaked = base.clone();
    tweaked.server.port = 9000;

    assert_eq!(base.server.port, 4583);
    assert_eq!(tweaked.server.port, 9000);
}
