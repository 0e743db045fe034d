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

use std::collections::HashMap;

use spindle::prelude::*;

use crate::setup::messages::{KvCall, KvCast, KvReply};

/// A string key-value store.
#[derive(Debug, Default, Clone, Copy)]
pub struct KvStore;

#[spindle_state(default)]
pub struct KvState {
    pub entries: HashMap<String, String>,
}

#[async_trait]
impl Behavior for KvStore {
    type Args = ();
    type State = KvState;
    type Call = KvCall;
    type Cast = KvCast;
    type Info = ();
    type Reply = KvReply;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<KvState> {
        Ok(KvState::default())
    }

    async fn handle_call(
        &self,
        request: KvCall,
        _from: ReplyTo<KvReply>,
        state: &mut KvState,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<KvReply>> {
        let reply = match request {
            KvCall::Set(key, value) => {
                state.entries.insert(key, value);
                KvReply::Ok
            }
            KvCall::Get(key) => KvReply::Value(state.entries.get(&key).cloned()),
            KvCall::Delete(key) => KvReply::Value(state.entries.remove(&key)),
        };
        Ok(CallOutcome::Reply(reply))
    }

    async fn handle_cast(
        &self,
        message: KvCast,
        state: &mut KvState,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        let KvCast::Set(key, value) = message;
        state.entries.insert(key, value);
        Ok(HandleOutcome::NoReply)
    }
}
