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

//! The Virtual Clock API: the user-facing surface for reading and waiting
//! on broker-driven time. Every function here either performs exactly one
//! round trip to the broker (via [`Requester::request_time`]) or, for
//! non-positive durations, short-circuits without touching it at all.
//!
//! None of these return a `Result`: a desynced broker is fatal and the
//! dispatcher aborts the whole process (see `requester::dispatcher`) rather
//! than handing callers a recoverable error to catch and ignore.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::engine::Continuation;
use crate::requester::Requester;
use crate::timer::Timer;

/// A point in virtual time, expressed as nanoseconds on the broker's clock.
/// Arithmetic on the underlying value saturates rather than wraps, matching
/// the wire protocol's own overflow handling (see `wire::recv_now`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualInstant(i64);

impl VirtualInstant {
    pub(crate) fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// The raw nanosecond value.
    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    /// A best-effort [`std::time::SystemTime`] view, treating virtual nanos
    /// as an offset from the Unix epoch. Virtual time carries no calendar or
    /// timezone meaning of its own (see Non-goals); this is purely for
    /// interop with APIs that insist on a `SystemTime`.
    pub fn to_system_time(&self) -> std::time::SystemTime {
        if self.0 >= 0 {
            std::time::UNIX_EPOCH + std::time::Duration::from_nanos(self.0 as u64)
        } else {
            std::time::UNIX_EPOCH - std::time::Duration::from_nanos((-self.0) as u64)
        }
    }
}

/// Resolves the absolute virtual instant `d` nanoseconds from now.
///
/// For `d > 0`, this forwards `d` to the broker as a scheduling hint and
/// returns `now + d` (saturating). For `d <= 0`, it still performs the round
/// trip — unlike the Go source's `when()`, which falls back to the real host
/// clock for non-positive durations, a fallback that would let a
/// non-positive `new_timer`/`after` call observe real wall-clock time instead
/// of the broker's virtual time. No hint is forwarded in that case, so the
/// broker never sees a duration it has to reason about.
pub(crate) async fn when(d: i64) -> i64 {
    let requester = Requester::global();
    if d > 0 {
        let now = requester.request_time(d).await;
        now.saturating_add(d)
    } else {
        requester.request_time(0).await
    }
}

/// Returns the broker's current virtual time.
pub async fn now() -> VirtualInstant {
    let requester = Requester::global();
    let nanos = requester.request_time(0).await;
    VirtualInstant::from_nanos(nanos)
}

/// Waits until `d` virtual nanoseconds have passed. Returns immediately,
/// without registering a timer or touching the broker, when `d <= 0`.
pub async fn sleep(d: i64) {
    if d <= 0 {
        return;
    }
    let mut timer = new_timer(d).await;
    let mut channel = timer
        .channel
        .take()
        .expect("new_timer always creates a delivery channel");
    let _ = channel.recv().await;
}

/// Creates a [`Timer`] that delivers the firing instant on its `channel`
/// after `d` virtual nanoseconds.
pub async fn new_timer(d: i64) -> Timer {
    let requester = Requester::global();
    let when_ns = when(d).await;
    let (tx, rx) = mpsc::channel(1);
    let continuation = Continuation::Deliver(tx);
    let id = requester.engine().register(when_ns, 0, continuation.clone());
    Timer::new(id, Arc::clone(requester.engine()), continuation, Some(rx))
}

/// Shorthand for `new_timer(d)` when the [`Timer`] handle itself (and the
/// ability to stop or reset it) isn't needed.
pub async fn after(d: i64) -> mpsc::Receiver<VirtualInstant> {
    let mut timer = new_timer(d).await;
    timer
        .channel
        .take()
        .expect("new_timer always creates a delivery channel")
}

/// Schedules `f` to run on a freshly spawned task after `d` virtual
/// nanoseconds, returning a [`Timer`] handle that can still `stop`/`reset`
/// the call before it fires.
pub async fn after_func<F>(d: i64, f: F) -> Timer
where
    F: Fn() + Send + Sync + 'static,
{
    let requester = Requester::global();
    let when_ns = when(d).await;
    let continuation = Continuation::Spawn(Arc::new(f));
    let id = requester.engine().register(when_ns, 0, continuation.clone());
    Timer::new(id, Arc::clone(requester.engine()), continuation, None)
}
