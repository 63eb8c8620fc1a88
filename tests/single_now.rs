//! Scenario: a single `now()` call gets back exactly the virtual instant the
//! broker reports, with no timer hint involved.

mod support;

#[tokio::test]
async fn now_returns_the_brokers_reported_instant() {
    let endpoint = "tcp://127.0.0.1:27201";
    support::use_endpoint(endpoint);
    support::spawn(endpoint, vec![7_000_000_000]);

    let instant = simclock::now().await;
    assert_eq!(instant.as_nanos(), 7_000_000_000);
}
