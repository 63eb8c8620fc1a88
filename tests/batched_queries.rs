//! Scenario: two callers asking for time concurrently land in the same
//! broker tick, and the broker sees both of their positive durations as
//! timer hints in a single batch.

mod support;

use std::time::Duration;

#[tokio::test]
async fn concurrent_requests_are_batched_into_one_tick() {
    let endpoint = "tcp://127.0.0.1:27202";
    support::use_endpoint(endpoint);

    let first = tokio::spawn(simclock::new_timer(2_000_000_000));
    let second = tokio::spawn(simclock::new_timer(5_000_000_000));

    // Give both calls time to enqueue their `PendingQuery` before the broker
    // ever says "ready" — the dispatcher is already parked in `recv_ready`.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let hints_rx = support::spawn_with_hint_reporting(endpoint, vec![10_000_000_000]);

    let mut hints = hints_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("broker receives a tick within the timeout");
    hints.sort_unstable();
    assert_eq!(hints, vec![2_000_000_000, 5_000_000_000]);

    let first = first.await.expect("task join");
    let second = second.await.expect("task join");
    drop(first);
    drop(second);
}

#[tokio::test]
async fn concurrent_now_calls_in_the_same_tick_observe_the_same_instant() {
    // If n workers concurrently call `request_time` and the dispatcher
    // completes exactly one tick between call and return, all n must get
    // back the same instant.
    let endpoint = "tcp://127.0.0.1:27205";
    support::use_endpoint(endpoint);

    let callers: Vec<_> = (0..8).map(|_| tokio::spawn(simclock::now())).collect();

    // Give every caller's `now()` time to enqueue its `PendingQuery` before
    // the broker ever says "ready".
    tokio::time::sleep(Duration::from_millis(20)).await;

    support::spawn(endpoint, vec![30_000_000_000]);

    let mut instants = Vec::with_capacity(callers.len());
    for caller in callers {
        instants.push(caller.await.expect("task join").as_nanos());
    }

    assert!(
        instants.iter().all(|&n| n == 30_000_000_000),
        "every concurrent caller in the same tick must see the same instant, got {instants:?}"
    );
}
