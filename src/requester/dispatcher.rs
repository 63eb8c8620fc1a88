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

//! The dispatcher task: the only thing that ever touches the broker socket.
//! One iteration of `run`'s loop is one broker tick: receive `ready`, drain
//! pending queries, forward their hints, learn `now`, advance due timers,
//! reply, send `done`. Every zmq call is blocking, so a whole tick runs
//! inside a single [`tokio::task::spawn_blocking`] — including the engine's
//! `advance`, which is plain `Mutex` work, not I/O.
//!
//! Every fatal condition here — a bind failure, a protocol violation, a
//! socket I/O error, a panicked tick — aborts the whole process via
//! [`abort`]. None of it is downgraded into a `Result::Err` for a caller to
//! catch: a scheduler under test whose time source has desynced from the
//! broker must not silently continue.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::engine::Engine;
use crate::error::Result;
use crate::wire;

use super::PendingQuery;

/// Logs `reason` and terminates the process immediately.
///
/// This is the "abort" outcome, not a panic: a panicked tokio task
/// by itself would only take down the dispatcher, leaving every other task
/// in the process (including whatever scheduler code is under test) running
/// against a clock that has silently stopped advancing. `process::exit`
/// guarantees the whole process goes down instead.
fn abort(reason: &str) -> ! {
    error!(%reason, "simclock dispatcher aborting the process");
    std::process::exit(1)
}

pub(super) async fn run(
    endpoint: String,
    mut rx: mpsc::UnboundedReceiver<PendingQuery>,
    engine: Arc<Engine>,
) {
    let bind_result = tokio::task::spawn_blocking({
        let endpoint = endpoint.clone();
        move || wire::bind(&endpoint)
    })
    .await;

    let mut socket = match bind_result {
        Ok(Ok(socket)) => socket,
        Ok(Err(err)) => abort(&format!("failed to bind broker socket at {endpoint}: {err}")),
        Err(join_err) => abort(&format!("broker bind task panicked: {join_err}")),
    };

    debug!(endpoint = %endpoint, "dispatcher bound to broker socket");

    loop {
        let engine_for_tick = Arc::clone(&engine);
        let tick_result = tokio::task::spawn_blocking(move || {
            let result = run_tick(&socket, &mut rx, &engine_for_tick);
            (socket, rx, result)
        })
        .await;

        let (returned_socket, returned_rx, result) = match tick_result {
            Ok(triple) => triple,
            Err(join_err) => abort(&format!("dispatcher tick task panicked: {join_err}")),
        };

        socket = returned_socket;
        rx = returned_rx;

        if let Err(err) = result {
            abort(&format!("dispatcher tick failed: {err}"));
        }
    }
}

/// One full request/reply exchange with the broker: drain whatever queries
/// are pending, forward their positive durations as hints, learn `now`,
/// advance every due timer, and answer every drained query with `now`.
fn run_tick(
    socket: &zmq::Socket,
    rx: &mut mpsc::UnboundedReceiver<PendingQuery>,
    engine: &Engine,
) -> Result<()> {
    wire::recv_ready(socket)?;

    let mut batch = Vec::new();
    while let Ok(query) = rx.try_recv() {
        batch.push(query);
    }

    let hints: Vec<i64> = batch.iter().map(|q| q.duration).filter(|&d| d > 0).collect();
    wire::send_timer_hints(socket, &hints)?;

    let now = wire::recv_now(socket)?;

    engine.advance(now);

    for query in batch {
        // A dropped receiver (caller gave up) just means the send is wasted.
        let _ = query.reply.send(now);
    }

    wire::send_done(socket)?;

    Ok(())
}
