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

/// Control messages travelling on a process's signal channel.
///
/// Signals bypass the mailbox so a full mailbox never delays a stop, and the process loop
/// polls them before its next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SystemSignal {
    /// Terminate with `reason` after the in-flight message.
    Stop { reason: ExitReason },
    /// Terminate with [`ExitReason::Killed`]. Cannot be trapped.
    Kill,
    /// A linked process terminated.
    Exit { from: Pid, reason: ExitReason },
    /// A monitored process terminated.
    Down {
        monitor: MonitorRef,
        pid: Pid,
        reason: ExitReason,
    },
}
