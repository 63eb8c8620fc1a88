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

use thiserror::Error;

/// Errors internal to a single broker tick, used only inside
/// `wire`/`requester::dispatcher` while a tick is being assembled.
///
/// None of these ever cross the public API: every condition here is fatal,
/// and the dispatcher's response to a fatal condition is to abort the whole
/// process (see `requester::dispatcher::abort`), not to hand callers a
/// `Result::Err` they might catch and ignore. This type exists purely so the
/// wire-protocol helpers can use `?` internally before that abort happens.
#[derive(Debug, Error)]
pub enum SimclockError {
    /// The broker sent something other than the expected handshake literal,
    /// a short time frame, or malformed JSON.
    #[error("broker protocol violation: {0}")]
    Protocol(String),

    /// The zmq socket failed to bind, send, or receive.
    #[error("broker socket I/O failed: {0}")]
    Io(#[from] zmq::Error),
}

pub(crate) type Result<T> = std::result::Result<T, SimclockError>;
