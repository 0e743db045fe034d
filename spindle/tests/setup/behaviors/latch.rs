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

use spindle::prelude::*;

use crate::setup::messages::{LatchCall, LatchCast};

/// Parks callers and answers them all at once on release.
#[derive(Debug, Default, Clone, Copy)]
pub struct Latch;

#[async_trait]
impl Behavior for Latch {
    type Args = ();
    type State = Vec<ReplyTo<String>>;
    type Call = LatchCall;
    type Cast = LatchCast;
    type Info = ();
    type Reply = String;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<Self::State> {
        Ok(Vec::new())
    }

    async fn handle_call(
        &self,
        request: LatchCall,
        from: ReplyTo<String>,
        parked: &mut Self::State,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<String>> {
        match request {
            LatchCall::Wait => {
                parked.push(from);
                Ok(CallOutcome::NoReply)
            }
            LatchCall::Waiting => Ok(CallOutcome::Reply(parked.len().to_string())),
        }
    }

    async fn handle_cast(
        &self,
        message: LatchCast,
        parked: &mut Self::State,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        match message {
            LatchCast::Release(value) => {
                for slot in parked.drain(..) {
                    slot.reply(value.clone());
                }
                Ok(HandleOutcome::NoReply)
            }
            LatchCast::Stop(reason) => Ok(HandleOutcome::stop(reason)),
        }
    }
}
