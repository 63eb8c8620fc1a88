/*
 *   Copyright (c) 2024 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! A minimal standalone broker, for exercising a `simclock`-based scheduler
//! by hand. Run it alongside a program that calls into `simclock`:
//!
//! ```text
//! cargo run --example broker_echo
//! ```
//!
//! Each tick it prints whatever timer hints it received, advances its
//! virtual clock by the smallest hint (or one second if there were none),
//! and reports the new `now` back. This is deliberately not part of the
//! library — it plays the broker's role, which in production is an external
//! process `simclock` only ever talks to over the wire.

use std::time::Duration;

const ENDPOINT: &str = "tcp://127.0.0.1:27000";
const DEFAULT_STEP_NANOS: i64 = 1_000_000_000;

fn main() {
    let ctx = zmq::Context::new();
    let socket = ctx.socket(zmq::REP).expect("create REP socket");
    socket.bind(ENDPOINT).expect("bind broker socket");
    println!("broker_echo listening on {ENDPOINT}");

    let mut now: i64 = 0;
    loop {
        socket.send(b"ready".as_ref(), 0).expect("send ready");

        let hints_payload = socket.recv_bytes(0).expect("recv timer hints");
        let hints: Vec<i64> =
            serde_json::from_slice(&hints_payload).expect("decode timer hints");

        let step = hints.iter().copied().min().unwrap_or(DEFAULT_STEP_NANOS).max(1);
        now = now.saturating_add(step);
        println!("tick: hints={hints:?} -> advancing to now={now}");

        socket.send(&(now as u64).to_le_bytes(), 0).expect("send now");

        let _done = socket.recv_bytes(0).expect("recv done");

        std::thread::sleep(Duration::from_millis(200));
    }
}
