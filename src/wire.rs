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

//! The broker wire protocol: a zmq REP socket, four messages per tick, in
//! order:
//!
//! 1. broker → core: ASCII literal `ready`
//! 2. core → broker: JSON array of the batch's positive timer-hint durations
//! 3. broker → core: 8 bytes, little-endian, reinterpreted as signed i64 ns
//! 4. core → broker: ASCII literal `done`
//!
//! Every function here is a blocking zmq call. Callers run them inside
//! [`tokio::task::spawn_blocking`] — see `requester::dispatcher`.

use crate::error::{Result, SimclockError};

const READY: &[u8] = b"ready";
const DONE: &[u8] = b"done";

/// Binds a new zmq REP socket at `endpoint`. One of these exists for the
/// lifetime of the process.
pub fn bind(endpoint: &str) -> Result<zmq::Socket> {
    let ctx = zmq::Context::new();
    let socket = ctx.socket(zmq::REP)?;
    socket.bind(endpoint)?;
    Ok(socket)
}

/// Blocks until the broker sends the `ready` handshake literal. Any other
/// payload is a fatal protocol violation.
pub fn recv_ready(socket: &zmq::Socket) -> Result<()> {
    let bytes = socket.recv_bytes(0)?;
    if bytes != READY {
        return Err(SimclockError::Protocol(format!(
            "expected handshake literal {READY:?}, got {bytes:?}"
        )));
    }
    Ok(())
}

/// Serializes the batch's positive timer-hint durations as a JSON array of
/// integers (an empty batch still sends `[]`) and sends it to the broker.
pub fn send_timer_hints(socket: &zmq::Socket, hints: &[i64]) -> Result<()> {
    let payload = serde_json::to_vec(hints)
        .map_err(|e| SimclockError::Protocol(format!("failed to encode timer hints: {e}")))?;
    socket.send(payload, 0)?;
    Ok(())
}

/// Receives the broker's 8-byte little-endian virtual-now frame and
/// reinterprets it as a signed nanosecond instant, saturating at
/// `i64::MAX` if the reinterpretation would be negative.
pub fn recv_now(socket: &zmq::Socket) -> Result<i64> {
    let bytes = socket.recv_bytes(0)?;
    let frame: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
        SimclockError::Protocol(format!(
            "expected an 8-byte time frame, got {} bytes",
            bytes.len()
        ))
    })?;
    let unsigned = u64::from_le_bytes(frame);
    let now = unsigned as i64;
    Ok(if now < 0 { i64::MAX } else { now })
}

/// Sends the `done` literal, closing this tick's exchange.
pub fn send_done(socket: &zmq::Socket) -> Result<()> {
    socket.send(DONE, 0)?;
    Ok(())
}
