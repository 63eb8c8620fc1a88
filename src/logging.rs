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

//! Ambient tracing setup — simplified relative to a terminal-facing crate
//! because `simclock` has no concurrent terminal output to coordinate with,
//! so there is no `SharedWriter` layer to plug in, just a `fmt` layer over
//! stdout plus an env filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes a global `tracing` subscriber for the process.
///
/// Reads `RUST_LOG` for the filter directive (e.g. `simclock=debug`),
/// defaulting to `info` when unset. Safe to call once per process; a second
/// call returns an error rather than panicking, mirroring
/// `tracing_subscriber::registry().try_init()`'s own idempotence guard.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
