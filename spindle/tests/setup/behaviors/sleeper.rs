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

use crate::setup::messages::Nap;

/// Sleeps before answering each call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sleeper;

#[async_trait]
impl Behavior for Sleeper {
    type Args = ();
    type State = u32;
    type Call = Nap;
    type Cast = ();
    type Info = ();
    type Reply = u32;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<u32> {
        Ok(0)
    }

    /// Replies with how many naps have finished, this one included.
    async fn handle_call(
        &self,
        Nap(duration): Nap,
        _from: ReplyTo<u32>,
        finished: &mut u32,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<u32>> {
        tokio::time::sleep(duration).await;
        *finished += 1;
        Ok(CallOutcome::Reply(*finished))
    }
}
