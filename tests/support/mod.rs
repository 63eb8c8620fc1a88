//! A tiny in-process mock broker, shared by the end-to-end scenario tests.
//! Plays the broker side of the wire protocol on a background thread: each
//! tick it hands back whatever `now` the test configured, regardless of the
//! timer hints it receives (the scenarios under test drive virtual time
//! directly; they aren't testing the broker's own scheduling policy).

use std::sync::mpsc as std_mpsc;

/// Binds a REQ socket at `endpoint` and answers every tick with the next
/// value pulled from `schedule`. Once `schedule` is exhausted, repeats the
/// last value forever, so a test can keep driving ticks past its own
/// assertions without the broker thread hanging up.
pub fn spawn(endpoint: &'static str, schedule: Vec<i64>) {
    std::thread::spawn(move || {
        let ctx = zmq::Context::new();
        let socket = ctx.socket(zmq::REQ).expect("create REQ socket");
        socket.connect(endpoint).expect("connect to dispatcher");

        let mut schedule = schedule;
        if schedule.is_empty() {
            schedule.push(0);
        }
        let mut index = 0;

        loop {
            if socket.send(b"ready".as_ref(), 0).is_err() {
                return;
            }
            let Ok(_hints) = socket.recv_bytes(0) else {
                return;
            };
            let now = schedule[index.min(schedule.len() - 1)];
            index += 1;
            if socket.send(&(now as u64).to_le_bytes(), 0).is_err() {
                return;
            }
            if socket.recv_bytes(0).is_err() {
                return;
            }
        }
    });
}

/// Sets `SIMCLOCK_BROKER_ENDPOINT` for the current process before the first
/// call to [`simclock::Requester::global`] (which reads it exactly once).
/// Every test binary under `tests/` gets its own process, so this is safe to
/// call once near the top of each scenario's `#[tokio::test]`.
pub fn use_endpoint(endpoint: &str) {
    std::env::set_var("SIMCLOCK_BROKER_ENDPOINT", endpoint);
}

/// Like [`spawn`], but also reports each tick's timer hints back to the
/// caller, for scenarios that assert on what the broker was told rather than
/// just on what it answered.
pub fn spawn_with_hint_reporting(
    endpoint: &'static str,
    schedule: Vec<i64>,
) -> std_mpsc::Receiver<Vec<i64>> {
    let (tx, rx) = std_mpsc::channel();
    std::thread::spawn(move || {
        let ctx = zmq::Context::new();
        let socket = ctx.socket(zmq::REQ).expect("create REQ socket");
        socket.connect(endpoint).expect("connect to dispatcher");

        let mut schedule = schedule;
        if schedule.is_empty() {
            schedule.push(0);
        }
        let mut index = 0;

        loop {
            if socket.send(b"ready".as_ref(), 0).is_err() {
                return;
            }
            let Ok(hints_payload) = socket.recv_bytes(0) else {
                return;
            };
            let hints: Vec<i64> = serde_json::from_slice(&hints_payload).unwrap_or_default();
            if tx.send(hints).is_err() {
                return;
            }
            let now = schedule[index.min(schedule.len() - 1)];
            index += 1;
            if socket.send(&(now as u64).to_le_bytes(), 0).is_err() {
                return;
            }
            if socket.recv_bytes(0).is_err() {
                return;
            }
        }
    });
    rx
}
