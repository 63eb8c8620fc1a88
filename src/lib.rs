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

//! Virtual-time facility for schedulers driven by an external discrete-event
//! broker over ZeroMQ.
//!
//! The public surface reads like a conventional timer API — [`now`],
//! [`sleep`], [`new_timer`], [`after`], [`after_func`], [`Timer`] — but every
//! one of them is backed by a request/reply round trip to a broker process
//! (or, for non-positive durations, nothing at all) rather than the host's
//! real clock. A [`Requester`] singleton owns the broker connection and a
//! [`crate::engine::Engine`] that tracks every outstanding timer; see
//! DESIGN.md for how the pieces fit together.
//!
//! None of these functions return a `Result`. A broker desync is fatal, and
//! the dispatcher aborts the whole process rather than handing back an
//! error a caller might catch and ignore — see `requester::dispatcher`.
//!
//! ```no_run
//! # async fn example() {
//! let instant = simclock::now().await;
//! simclock::sleep(1_000_000_000).await; // one virtual second
//! # }
//! ```

pub mod clock;
pub mod config;
mod engine;
mod error;
pub mod logging;
pub mod requester;
pub mod timer;
mod wire;

pub use clock::{after, after_func, new_timer, now, sleep, VirtualInstant};
pub use config::Config;
pub use requester::Requester;
pub use timer::Timer;
