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

use std::time::Duration;

use thiserror::Error;

use crate::common::{Pid, Target};
use crate::process::ExitReason;

/// Every failure the runtime reports.
///
/// Behavior callbacks return `anyhow::Result`; their errors are folded into
/// [`ProcessError::BehaviorInit`] (from `init`) or [`ProcessError::ActorCrashed`] (from a
/// handler) before they reach a caller. Variants are cheap to clone so one failure can be
/// handed to every call a terminating process still owes a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// `init` returned an error or panicked. The process never became visible.
    #[error("behavior init failed: {0}")]
    BehaviorInit(String),

    /// The target is unknown, already stopping or terminated.
    #[error("no live process for {0}")]
    ProcessNotFound(Target),

    /// No reply arrived within the caller's timeout. The target keeps running.
    #[error("call to {pid} timed out after {timeout:?}")]
    CallTimeout {
        /// The process that did not answer.
        pid: Pid,
        /// The timeout the caller waited.
        timeout: Duration,
    },

    /// The target crashed while this call was queued or awaiting a reply.
    #[error("process {pid} crashed: {reason}")]
    ActorCrashed {
        /// The crashed process.
        pid: Pid,
        /// The rendered handler error or panic message.
        reason: String,
    },

    /// A pool dispatch found no members.
    #[error("pool has no members")]
    PoolEmpty,

    /// The pool was shut down and cannot take new members.
    #[error("pool has been shut down")]
    PoolClosed,

    /// The name is already bound to another process and the registration was strict.
    #[error("name {key:?} is already registered to {existing}")]
    DuplicateRegistration {
        /// The contested name.
        key: String,
        /// The process currently holding it.
        existing: Pid,
    },

    /// The target stopped without crashing before it replied.
    #[error("process {pid} stopped ({reason}) before replying")]
    Stopped {
        /// The stopped process.
        pid: Pid,
        /// Why it stopped.
        reason: ExitReason,
    },

    /// The pid runs a different behavior than the one the message was typed for.
    #[error("process {pid} does not run behavior {expected}")]
    BehaviorMismatch {
        /// The addressed process.
        pid: Pid,
        /// The behavior type the caller expected.
        expected: &'static str,
    },

    /// Every copy of the reply slot was dropped without an answer.
    #[error("process {pid} dropped the reply slot without answering")]
    ReplyDropped {
        /// The process that held the slot.
        pid: Pid,
    },

    /// The process did not finish terminating within `process_stop_timeout_ms`.
    #[error("process {pid} did not stop in time")]
    StopTimeout {
        /// The slow process.
        pid: Pid,
    },

    /// Processes were still running when `system_shutdown_timeout_ms` elapsed.
    #[error("{remaining} process(es) still running after the shutdown timeout")]
    ShutdownTimeout {
        /// How many processes were left.
        remaining: usize,
    },
}

impl ProcessError {
    /// Returns `true` for [`ProcessError::CallTimeout`].
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::CallTimeout { .. })
    }

    /// Returns `true` for [`ProcessError::ActorCrashed`].
    #[must_use]
    pub const fn is_crash(&self) -> bool {
        matches!(self, Self::ActorCrashed { .. })
    }

    /// Returns `true` for [`ProcessError::ProcessNotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ProcessNotFound(_))
    }

    /// The error a terminating process hands to every reply it still owes.
    pub(crate) fn for_exit(pid: Pid, reason: &ExitReason) -> Self {
        match reason {
            ExitReason::Crashed(error) => Self::ActorCrashed {
                pid,
                reason: error.clone(),
            },
            other => Self::Stopped {
                pid,
                reason: other.clone(),
            },
        }
    }

    /// The error owed by a process that a linked peer took down. It did not crash itself, so
    /// its callers see [`ProcessError::Stopped`] carrying the peer's reason.
    pub(crate) fn for_linked_exit(pid: Pid, reason: &ExitReason) -> Self {
        Self::Stopped {
            pid,
            reason: reason.clone(),
        }
    }
}
