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

/// Default broker endpoint, matching the wire protocol's authoritative
/// `tcp://127.0.0.1:27000`. Exposed as a constant (like the source's
/// `sockEndpoint` literal) but overridable — see [`Config::from_env`].
pub const DEFAULT_BROKER_ENDPOINT: &str = "tcp://127.0.0.1:27000";

/// Runtime configuration for a [`crate::requester::Requester`].
///
/// This is deliberately a plain struct, not a layered configuration system:
/// the crate has exactly one knob, and it can be set from the environment
/// without pulling in a configuration-file crate. There is no
/// channel-capacity knob: the pending-query queue is unbounded, so
/// `request_time` never awaits backpressure no matter how many callers pile
/// up within a single tick.
#[derive(Debug, Clone)]
pub struct Config {
    /// The zmq REP endpoint the dispatcher binds to.
    pub broker_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self { broker_endpoint: DEFAULT_BROKER_ENDPOINT.to_string() }
    }
}

impl Config {
    /// Reads `SIMCLOCK_BROKER_ENDPOINT`, falling back to the default for
    /// anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("SIMCLOCK_BROKER_ENDPOINT") {
            config.broker_endpoint = endpoint;
        }

        config
    }
}
