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

use crate::process::ExitReason;

/// What a call handler decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<R> {
    /// Answer the caller now.
    Reply(R),
    /// Leave the caller waiting. A clone of the [`ReplyTo`](crate::message::ReplyTo) must be
    /// kept to answer later, otherwise the caller times out.
    NoReply,
    /// Terminate the process, optionally answering the caller first.
    Stop {
        /// Why the process stops.
        reason: ExitReason,
        /// An answer for the caller; without one the caller receives
        /// [`ProcessError::Stopped`](crate::message::ProcessError::Stopped).
        reply: Option<R>,
    },
}

impl<R> CallOutcome<R> {
    /// Stops with `reason` after answering with `reply`.
    pub fn stop_with_reply(reason: impl Into<ExitReason>, reply: R) -> Self {
        Self::Stop {
            reason: reason.into(),
            reply: Some(reply),
        }
    }

    /// Stops with `reason` without answering.
    pub fn stop(reason: impl Into<ExitReason>) -> Self {
        Self::Stop {
            reason: reason.into(),
            reply: None,
        }
    }
}

/// What a cast or info handler decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Keep running.
    #[default]
    NoReply,
    /// Terminate the process.
    Stop(ExitReason),
}

impl HandleOutcome {
    /// Stops with `reason`.
    pub fn stop(reason: impl Into<ExitReason>) -> Self {
        Self::Stop(reason.into())
    }
}
