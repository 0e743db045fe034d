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

use async_trait::async_trait;

use crate::message::{CallOutcome, HandleOutcome, Info, ReplyTo};
use crate::process::{ExitReason, ProcessContext};

/// The logic a process runs.
///
/// A behavior is shared, immutable configuration (`&self`); everything that changes lives in
/// [`Behavior::State`], which `init` produces and the process loop owns exclusively. Handlers
/// run one at a time per process, so the state needs no locking.
///
/// Only [`Behavior::init`] is required. The defaults are no-ops: a call answers with
/// `Reply::default()`, casts and infos are ignored, and `terminate` does nothing.
///
/// Returning `Err` (or panicking) from any handler crashes the process with
/// [`ExitReason::Crashed`]; `terminate` still runs and callers waiting on the process receive
/// [`ProcessError::ActorCrashed`](crate::message::ProcessError::ActorCrashed).
///
/// # Example
///
/// ```rust,ignore
/// use spindle::prelude::*;
///
/// struct Counter;
///
/// #[spindle_message]
/// enum CounterCall { Add(i64), Get }
///
/// #[async_trait]
/// impl Behavior for Counter {
///     type Args = i64;
///     type State = i64;
///     type Call = CounterCall;
///     type Cast = ();
///     type Info = ();
///     type Reply = i64;
///
///     async fn init(&self, start: i64, _ctx: &ProcessContext) -> anyhow::Result<i64> {
///         Ok(start)
///     }
///
///     async fn handle_call(
///         &self,
///         request: CounterCall,
///         _from: ReplyTo<i64>,
///         count: &mut i64,
///         _ctx: &ProcessContext,
///     ) -> anyhow::Result<CallOutcome<i64>> {
///         if let CounterCall::Add(n) = request {
///             *count += n;
///         }
///         Ok(CallOutcome::Reply(*count))
///     }
/// }
/// ```
#[async_trait]
pub trait Behavior: Send + Sync + 'static {
    /// Passed to `init`.
    type Args: Send + 'static;
    /// Owned by the process loop between messages.
    type State: Send + 'static;
    /// Requests handled by `handle_call`.
    type Call: Send + 'static;
    /// Messages handled by `handle_cast`.
    type Cast: Send + 'static;
    /// User payload of [`Info::Message`].
    type Info: Send + 'static;
    /// Answers to calls.
    type Reply: Default + Send + 'static;

    /// Builds the initial state. The process accepts no messages until this returns `Ok`.
    async fn init(&self, args: Self::Args, ctx: &ProcessContext) -> anyhow::Result<Self::State>;

    /// Handles one call.
    async fn handle_call(
        &self,
        _request: Self::Call,
        _from: ReplyTo<Self::Reply>,
        _state: &mut Self::State,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<Self::Reply>> {
        Ok(CallOutcome::Reply(Self::Reply::default()))
    }

    /// Handles one cast.
    async fn handle_cast(
        &self,
        _message: Self::Cast,
        _state: &mut Self::State,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        Ok(HandleOutcome::NoReply)
    }

    /// Handles one info message, including exit and down notifications.
    async fn handle_info(
        &self,
        _info: Info<Self::Info>,
        _state: &mut Self::State,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        Ok(HandleOutcome::NoReply)
    }

    /// Runs once when the process terminates, for any reason, with the final state.
    async fn terminate(&self, _reason: &ExitReason, _state: Self::State, _ctx: &ProcessContext) {}
}
