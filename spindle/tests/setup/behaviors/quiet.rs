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

/// Implements only `init`; every handler is the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quiet;

#[async_trait]
impl Behavior for Quiet {
    type Args = ();
    type State = ();
    type Call = ();
    type Cast = ();
    type Info = ();
    type Reply = u64;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<()> {
        Ok(())
    }
}
