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

use crate::setup::messages::{EchoCall, EchoReply};

/// Answers with its own pid. Casts are notes it counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Echo;

#[async_trait]
impl Behavior for Echo {
    type Args = ();
    type State = usize;
    type Call = EchoCall;
    type Cast = String;
    type Info = ();
    type Reply = EchoReply;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<usize> {
        Ok(0)
    }

    async fn handle_call(
        &self,
        request: EchoCall,
        from: ReplyTo<EchoReply>,
        notes: &mut usize,
        ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<EchoReply>> {
        let mut reply = EchoReply {
            pid: Some(ctx.pid()),
            caller: from.caller(),
            notes: *notes,
            ..EchoReply::default()
        };
        if let EchoCall::Echo(text) = request {
            reply.text = text;
        }
        Ok(CallOutcome::Reply(reply))
    }

    async fn handle_cast(
        &self,
        _note: String,
        notes: &mut usize,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        *notes += 1;
        Ok(HandleOutcome::NoReply)
    }
}
