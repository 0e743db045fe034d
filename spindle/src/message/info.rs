/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use crate::common::{MonitorRef, Pid};
use crate::process::ExitReason;

/// An out-of-band message delivered to `handle_info`.
///
/// User info messages arrive as [`Info::Message`]. The runtime itself sends
/// [`Info::Exit`] to a process that traps exits when a linked process terminates, and
/// [`Info::Down`] to every observer of a monitored process that terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Info<T> {
    /// A message sent with `send_info`.
    Message(T),
    /// A linked process terminated and this process traps exits.
    Exit {
        /// The linked process.
        from: Pid,
        /// Why it terminated.
        reason: ExitReason,
    },
    /// A monitored process terminated.
    Down {
        /// The monitor that fired.
        monitor: MonitorRef,
        /// The monitored process.
        pid: Pid,
        /// Why it terminated.
        reason: ExitReason,
    },
}
