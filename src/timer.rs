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

//! The public [`Timer`] handle, the thin proxy callers hold onto a
//! registration that actually lives in the [`Engine`].

use std::sync::Arc;

use tokio::sync::mpsc::Receiver;

use crate::clock::{self, VirtualInstant};
use crate::engine::{Continuation, Engine, TimerId};

/// A handle to a single registered timer.
///
/// Dropping a `Timer` does not cancel it — the engine's record, not this
/// handle, is what keeps a pending timer alive, exactly as a discarded
/// `*time.Timer` in the source stays armed until it fires or `Stop` is
/// called explicitly.
pub struct Timer {
    id: TimerId,
    engine: Arc<Engine>,
    continuation: Continuation,
    period: i64,
    /// Receives the firing instant for timers created via `new_timer`/
    /// `after`. `None` for `after_func` timers, which have nothing to
    /// deliver a value on — their continuation runs for its side effects.
    pub channel: Option<Receiver<VirtualInstant>>,
}

impl Timer {
    pub(crate) fn new(
        id: TimerId,
        engine: Arc<Engine>,
        continuation: Continuation,
        channel: Option<Receiver<VirtualInstant>>,
    ) -> Self {
        Self { id, engine, continuation, period: 0, channel }
    }

    /// Cancels the timer. Returns whether it was still pending beforehand.
    pub fn stop(&self) -> bool {
        self.engine.stop(self.id)
    }

    /// Re-arms the timer to fire `d` virtual nanoseconds from now, reusing
    /// the timer's original continuation. Always re-arms — even if the timer
    /// had already fired or been stopped — matching the source's
    /// unconditional `modTimer` restart. Returns whether the timer was
    /// pending before the call.
    pub async fn reset(&self, d: i64) -> bool {
        let when = clock::when(d).await;
        self.engine
            .reset(self.id, when, self.period, self.continuation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use tokio::sync::mpsc;

    #[test]
    fn stop_reports_whether_the_timer_was_pending() {
        let engine = Arc::new(Engine::new());
        let (tx, _rx) = mpsc::channel(1);
        let continuation = Continuation::Deliver(tx);
        let id = engine.register(1_000, 0, continuation.clone());
        let timer = Timer::new(id, Arc::clone(&engine), continuation, None);

        assert!(timer.stop());
        assert!(!timer.stop());
    }
}
