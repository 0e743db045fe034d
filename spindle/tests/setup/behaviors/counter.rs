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

use std::sync::Arc;

use anyhow::anyhow;
use parking_lot::Mutex;
use spindle::prelude::*;

use crate::setup::messages::{CounterCall, CounterCast};

/// Adds numbers. Records every exit reason `terminate` sees.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    pub exits: Arc<Mutex<Vec<ExitReason>>>,
}

#[spindle_state]
pub struct CounterState {
    pub value: i64,
}

#[async_trait]
impl Behavior for Counter {
    type Args = i64;
    type State = CounterState;
    type Call = CounterCall;
    type Cast = CounterCast;
    type Info = ();
    type Reply = i64;

    async fn init(&self, start: i64, _ctx: &ProcessContext) -> anyhow::Result<CounterState> {
        Ok(CounterState { value: start })
    }

    async fn handle_call(
        &self,
        request: CounterCall,
        _from: ReplyTo<i64>,
        state: &mut CounterState,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<i64>> {
        match request {
            CounterCall::Add(n) => {
                state.value += n;
                Ok(CallOutcome::Reply(state.value))
            }
            CounterCall::Get => Ok(CallOutcome::Reply(state.value)),
            CounterCall::Fail => Err(anyhow!("counter refused at {}", state.value)),
            CounterCall::Finish => Ok(CallOutcome::stop_with_reply(ExitReason::Normal, state.value)),
        }
    }

    async fn handle_cast(
        &self,
        message: CounterCast,
        state: &mut CounterState,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        match message {
            CounterCast::Add(n) => state.value += n,
            CounterCast::Fail => return Err(anyhow!("cast failure")),
        }
        Ok(HandleOutcome::NoReply)
    }

    async fn terminate(&self, reason: &ExitReason, _state: CounterState, _ctx: &ProcessContext) {
        self.exits.lock().push(reason.clone());
    }
}
