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

use anyhow::bail;
use spindle::prelude::*;

use crate::setup::messages::{CrasherCall, CrasherMode};

/// Fails on request, in `init` or in a handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct Crasher;

#[async_trait]
impl Behavior for Crasher {
    type Args = CrasherMode;
    type State = ();
    type Call = CrasherCall;
    type Cast = CrasherCall;
    type Info = ();
    type Reply = String;

    async fn init(&self, mode: CrasherMode, _ctx: &ProcessContext) -> anyhow::Result<()> {
        match mode {
            CrasherMode::Healthy => Ok(()),
            CrasherMode::FailInit => bail!("missing upstream"),
            CrasherMode::PanicInit => panic!("init exploded"),
        }
    }

    async fn handle_call(
        &self,
        request: CrasherCall,
        _from: ReplyTo<String>,
        _state: &mut (),
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<String>> {
        match request {
            CrasherCall::Ping => Ok(CallOutcome::Reply("pong".to_string())),
            CrasherCall::Fail => bail!("call failed"),
            CrasherCall::Panic => panic!("call exploded"),
            CrasherCall::FailAfter(delay) => {
                tokio::time::sleep(delay).await;
                bail!("call failed late")
            }
        }
    }

    async fn handle_cast(
        &self,
        message: CrasherCall,
        _state: &mut (),
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        match message {
            CrasherCall::Ping => Ok(HandleOutcome::NoReply),
            CrasherCall::Fail => bail!("cast failed"),
            CrasherCall::Panic => panic!("cast exploded"),
            CrasherCall::FailAfter(delay) => {
                tokio::time::sleep(delay).await;
                bail!("cast failed late")
            }
        }
    }
}
