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

//! The Timer Engine, redesigned around a shared tick rather than one
//! polling task per timer: a single [`Engine`] holds a min-heap of
//! `(when, id)` pairs behind a `Mutex`, advanced once per broker tick by
//! [`crate::requester::dispatcher`] with the `now` it already received.
//!
//! A timer's presence in `records` *is* its `Waiting` status; removal *is*
//! `Deleted`. Because every mutation happens under the same lock — register,
//! stop, reset, and the dispatcher's fire-due-timers pass are all critical
//! sections of the same `Mutex` — the source's `Running`/`Modifying`
//! transient states and their busy-wait loops have nothing to race against
//! and are correctly omitted; see DESIGN.md.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::Sender;

use crate::clock::VirtualInstant;

pub type TimerId = u64;

/// What happens when a timer fires. Kept cheaply cloneable so that
/// [`crate::timer::Timer::reset`] can re-arm a timer that has already fired
/// (or been stopped) with the exact same continuation, matching the source's
/// `modTimer`, which always restarts the timer regardless of its prior
/// status.
#[derive(Clone)]
pub(crate) enum Continuation {
    /// `new_timer`/`after`: a non-blocking send of the firing instant on a
    /// single-slot channel. A full channel means the send is dropped —
    /// deliberate, harmless for one-shots, and what makes a periodic ticker
    /// safe if one is ever built on top of this engine.
    Deliver(Sender<VirtualInstant>),
    /// `after_func`: spawn `f` on a fresh task.
    Spawn(Arc<dyn Fn() + Send + Sync + 'static>),
}

impl Continuation {
    fn fire(&self, now: i64) {
        match self {
            Continuation::Deliver(tx) => {
                let _ = tx.try_send(VirtualInstant::from_nanos(now));
            }
            Continuation::Spawn(f) => {
                let f = Arc::clone(f);
                tokio::spawn(async move { f() });
            }
        }
    }
}

struct TimerRecord {
    when: i64,
    period: i64,
    continuation: Continuation,
}

#[derive(PartialEq, Eq)]
struct HeapKey {
    when: i64,
    seq: u64,
    id: TimerId,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.when.cmp(&other.when).then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct EngineState {
    next_id: TimerId,
    next_seq: u64,
    heap: BinaryHeap<Reverse<HeapKey>>,
    records: HashMap<TimerId, TimerRecord>,
}

/// Owns every live timer. One instance per process, reached through
/// [`crate::requester::Requester::engine`].
#[derive(Default)]
pub struct Engine {
    state: Mutex<EngineState>,
}

impl Engine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a new timer and returns its id. Status starts at `Waiting`
    /// (presence in `records`) — there is no observable `NoStatus` state in
    /// this design, since a [`crate::timer::Timer`] can't be constructed
    /// without going through this method first.
    pub(crate) fn register(&self, when: i64, period: i64, continuation: Continuation) -> TimerId {
        let mut state = self.state.lock().expect("engine mutex poisoned");
        let id = state.next_id;
        state.next_id += 1;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.heap.push(Reverse(HeapKey { when, seq, id }));
        state.records.insert(id, TimerRecord { when, period, continuation });
        id
    }

    /// `Waiting -> Deleted`. Returns whether the timer was pending (present)
    /// before the call.
    pub(crate) fn stop(&self, id: TimerId) -> bool {
        let mut state = self.state.lock().expect("engine mutex poisoned");
        state.records.remove(&id).is_some()
    }

    /// Re-arms a timer at `when` with `continuation`, regardless of whether
    /// it was previously pending, firing, or already removed — matching the
    /// source's `modTimer`, which restarts unconditionally. Returns whether
    /// the timer was pending before the call.
    pub(crate) fn reset(
        &self,
        id: TimerId,
        when: i64,
        period: i64,
        continuation: Continuation,
    ) -> bool {
        let mut state = self.state.lock().expect("engine mutex poisoned");
        let was_pending = state.records.remove(&id).is_some();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.heap.push(Reverse(HeapKey { when, seq, id }));
        state.records.insert(id, TimerRecord { when, period, continuation });
        was_pending
    }

    /// Called once per broker tick, after the dispatcher learns `now`. Pops
    /// every timer due at or before `now` and fires it; periodic timers
    /// (`period > 0`) are reinserted at `now + period`. Not reachable from
    /// the public surface today (no ticker constructor is exposed) but kept
    /// since `TimerRecord` already carries `period`.
    pub(crate) fn advance(&self, now: i64) {
        let mut state = self.state.lock().expect("engine mutex poisoned");
        loop {
            let Some(Reverse(top)) = state.heap.peek() else {
                break;
            };
            if top.when > now {
                break;
            }
            let Reverse(key) = state.heap.pop().expect("just peeked");

            let Some(record) = state.records.get(&key.id) else {
                // Already stopped (and removed) since this entry was pushed.
                continue;
            };
            if record.when != key.when {
                // Superseded by a later `reset` — this entry is a stale
                // duplicate left behind by lazy deletion.
                continue;
            }

            record.continuation.fire(now);

            if record.period > 0 {
                let next_when = now.saturating_add(record.period);
                let seq = state.next_seq;
                state.next_seq += 1;
                let continuation = record.continuation.clone();
                let period = record.period;
                state.heap.push(Reverse(HeapKey { when: next_when, seq, id: key.id }));
                state.records.insert(
                    key.id,
                    TimerRecord { when: next_when, period, continuation },
                );
            } else {
                state.records.remove(&key.id);
            }
        }
    }
}
