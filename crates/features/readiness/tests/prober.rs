use callkit_domain::config::ReadinessConfig;
use callkit_readiness::{ProbeOutcome, Prober};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn prober(attempts: u32) -> Prober {
    let config = ReadinessConfig { probe_attempts: attempts, probe_interval_ms: 10, ..ReadinessConfig::default() };
    Prober::new(&config, Duration::from_secs(2)).expect("prober")
}

#[tokio::test]
async fn reaches_after_four_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public-url"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public-url"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = prober(5).probe(&server.uri()).await;

    assert_eq!(outcome, ProbeOutcome::Reached { attempts: 5 });
}

#[tokio::test]
async fn gives_up_after_the_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public-url"))
        .respond_with(ResponseTemplate::new(404))
        .expect(5)
        .mount(&server)
        .await;

    let outcome = prober(5).probe(&format!("{}/", server.uri())).await;

    assert_eq!(outcome, ProbeOutcome::Unreached { attempts: 5 });
    assert!(!outcome.is_reached());
}

#[tokio::test]
async fn unreachable_host_counts_as_failure() {
    let outcome = prober(2).probe("http://127.0.0.1:9").await;

    assert_eq!(outcome, ProbeOutcome::Unreached { attempts: 2 });
}
