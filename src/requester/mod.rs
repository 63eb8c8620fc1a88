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

//! The Requester: the process-wide link to the broker. Owns the
//! pending-query queue and the dispatcher task that drains it once per
//! broker tick.

mod dispatcher;

use std::sync::{Arc, OnceLock};

use tokio::sync::{mpsc, oneshot};

use crate::config::Config;
use crate::engine::Engine;

/// A caller's request for the broker's current virtual time, optionally
/// carrying a positive duration hint the broker can use when scheduling its
/// next tick. The reply travels back on a dedicated oneshot channel, so —
/// unlike the source's `sync.Map` of pending requests keyed by UUID — there
/// is no correlation key to generate, store, or look up.
pub(crate) struct PendingQuery {
    pub duration: i64,
    pub reply: oneshot::Sender<i64>,
}

static REQUESTER: OnceLock<Arc<Requester>> = OnceLock::new();

/// The process-wide requester: one pending-query queue, one dispatcher
/// task, one [`Engine`]. Reached through [`Requester::global`], which starts
/// the dispatcher the first time it's called instead of the source's racy
/// `if !running { go run() }` check.
pub struct Requester {
    tx: mpsc::UnboundedSender<PendingQuery>,
    engine: Arc<Engine>,
}

impl Requester {
    /// Returns the process-wide requester, starting its dispatcher task on
    /// first call.
    pub fn global() -> Arc<Requester> {
        Arc::clone(REQUESTER.get_or_init(|| Self::start(Config::from_env())))
    }

    fn start(config: Config) -> Arc<Requester> {
        // Unbounded: a caller enqueuing a query never waits on backpressure,
        // no matter how many other callers are doing the same within one
        // tick.
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Engine::new());
        tokio::spawn(dispatcher::run(config.broker_endpoint, rx, Arc::clone(&engine)));
        Arc::new(Requester { tx, engine })
    }

    pub(crate) fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Sends a time query to the dispatcher and awaits the broker's answer.
    /// `duration` is forwarded as a scheduling hint only when positive; zero
    /// or negative asks for the current virtual-now without influencing the
    /// broker's next tick.
    ///
    /// Never returns an error: a broker desync is fatal and the dispatcher
    /// aborts the whole process (`requester::dispatcher::abort`) rather than
    /// closing its channels for callers to observe as an ordinary, catchable
    /// failure. The `expect`s below only race a process exit that is already
    /// underway; they are not a recoverable path.
    pub async fn request_time(&self, duration: i64) -> i64 {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(PendingQuery { duration, reply })
            .expect("dispatcher outlives every Requester handle or the process has aborted");
        reply_rx
            .await
            .expect("dispatcher outlives every Requester handle or the process has aborted")
    }
}
