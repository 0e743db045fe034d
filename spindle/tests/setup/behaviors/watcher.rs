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

use crate::setup::behaviors::Echo;
use crate::setup::messages::{EchoCall, WatcherCall};

/// Records what `handle_info` receives as readable lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct Watcher;

#[async_trait]
impl Behavior for Watcher {
    type Args = ();
    type State = Vec<String>;
    type Call = WatcherCall;
    type Cast = ();
    type Info = String;
    type Reply = Vec<String>;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn handle_call(
        &self,
        request: WatcherCall,
        _from: ReplyTo<Vec<String>>,
        events: &mut Vec<String>,
        ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<Vec<String>>> {
        match request {
            WatcherCall::Events => Ok(CallOutcome::Reply(events.clone())),
            WatcherCall::Monitor(pid) => {
                let monitor = ctx.monitor(pid)?;
                Ok(CallOutcome::Reply(vec![monitor.to_string()]))
            }
            WatcherCall::Relay(pid) => {
                let reply = ctx.call::<Echo>(pid, EchoCall::WhoAreYou).await?;
                let caller = reply.caller.map(|pid| pid.to_string()).unwrap_or_default();
                Ok(CallOutcome::Reply(vec![caller]))
            }
        }
    }

    async fn handle_info(
        &self,
        info: Info<String>,
        events: &mut Vec<String>,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        let line = match info {
            Info::Message(text) => format!("info {text}"),
            Info::Exit { from, reason } => format!("exit {from} {reason}"),
            Info::Down { pid, reason, .. } => format!("down {pid} {reason}"),
        };
        events.push(line);
        Ok(HandleOutcome::NoReply)
    }
}
