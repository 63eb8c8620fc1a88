//! Scenario: a `new_timer` fires on the first tick where the broker's `now`
//! reaches the timer's computed `when`, delivering a value equal to the
//! broker's reported instant, not merely `>= when`.

mod support;

use std::time::Duration;

#[tokio::test]
async fn timer_delivers_exactly_the_brokers_now_when_it_lands_on_when() {
    let endpoint = "tcp://127.0.0.1:27203";
    support::use_endpoint(endpoint);
    // First tick resolves `when` (10s + 5s = 15s); the next tick reports
    // 15s exactly, so the delivered value must equal it precisely, not just
    // be greater than or equal to it.
    support::spawn(endpoint, vec![10_000_000_000, 15_000_000_000]);

    let mut timer = simclock::new_timer(5_000_000_000).await;
    let mut channel = timer.channel.take().expect("new_timer sets a channel");

    let delivered = tokio::time::timeout(Duration::from_secs(5), channel.recv())
        .await
        .expect("timer fires before the test timeout")
        .expect("delivery channel is not closed");
    assert_eq!(delivered.as_nanos(), 15_000_000_000);
}

#[tokio::test]
async fn timer_delivers_the_overshot_now_when_the_broker_skips_past_when() {
    let endpoint = "tcp://127.0.0.1:27204";
    support::use_endpoint(endpoint);
    // The broker is free to skip past `when` without landing on it exactly;
    // the timer must still fire, delivering the overshot value it actually
    // observed, never firing early.
    support::spawn(endpoint, vec![10_000_000_000, 20_000_000_000]);

    let mut timer = simclock::new_timer(5_000_000_000).await;
    let mut channel = timer.channel.take().expect("new_timer sets a channel");

    let delivered = tokio::time::timeout(Duration::from_secs(5), channel.recv())
        .await
        .expect("timer fires before the test timeout")
        .expect("delivery channel is not closed");
    assert_eq!(delivered.as_nanos(), 20_000_000_000);
    assert!(delivered.as_nanos() >= 15_000_000_000, "must never fire before `when`");
}
