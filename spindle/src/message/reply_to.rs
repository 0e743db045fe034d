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

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::trace;

use crate::common::{CorrelationId, Pid};
use crate::message::ProcessError;

type ReplySlot<R> = Arc<Mutex<Option<oneshot::Sender<Result<R, ProcessError>>>>>;

/// The single-use reply slot of a call.
///
/// A handler receives one with every call. Returning
/// [`CallOutcome::Reply`](crate::message::CallOutcome::Reply) resolves it for you; returning
/// [`CallOutcome::NoReply`](crate::message::CallOutcome::NoReply) leaves it open so a clone
/// kept in the process state can answer later with [`ReplyTo::reply`].
///
/// The slot resolves at most once. Later attempts, and attempts after the caller timed out,
/// are no-ops that return `false`. Slots still open when their process terminates are failed
/// on the caller's behalf.
pub struct ReplyTo<R> {
    caller: Option<Pid>,
    target: Pid,
    correlation_id: CorrelationId,
    slot: ReplySlot<R>,
}

impl<R> Clone for ReplyTo<R> {
    fn clone(&self) -> Self {
        Self {
            caller: self.caller,
            target: self.target,
            correlation_id: self.correlation_id,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<R> fmt::Debug for ReplyTo<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyTo")
            .field("caller", &self.caller)
            .field("target", &self.target)
            .field("correlation_id", &self.correlation_id)
            .field("resolved", &self.slot.lock().is_none())
            .finish()
    }
}

impl<R: Send> ReplyTo<R> {
    pub(crate) fn channel(
        caller: Option<Pid>,
        target: Pid,
        correlation_id: CorrelationId,
    ) -> (Self, oneshot::Receiver<Result<R, ProcessError>>) {
        let (sender, receiver) = oneshot::channel();
        let reply_to = Self {
            caller,
            target,
            correlation_id,
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (reply_to, receiver)
    }

    /// Answers the call. Returns `false` if the slot was already consumed or the caller is
    /// no longer waiting.
    pub fn reply(&self, value: R) -> bool {
        self.resolve(Ok(value))
    }

    /// Whether the slot has been consumed by a reply or a failure, or the caller stopped
    /// waiting.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .map_or(true, oneshot::Sender::is_closed)
    }

    /// The process that issued the call, when it was made from inside a process.
    #[must_use]
    pub const fn caller(&self) -> Option<Pid> {
        self.caller
    }

    /// The correlation id of the call.
    #[must_use]
    pub const fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub(crate) fn fail(&self, error: ProcessError) -> bool {
        self.resolve(Err(error))
    }

    fn resolve(&self, result: Result<R, ProcessError>) -> bool {
        let Some(sender) = self.slot.lock().take() else {
            trace!(
                correlation_id = %self.correlation_id,
                "reply slot already consumed, dropping outcome"
            );
            return false;
        };
        sender.send(result).is_ok()
    }
}
