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

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use spindle::prelude::*;

use crate::setup::messages::TallyCall;

/// Counts messages and records any handler that starts while another is still running.
#[derive(Debug, Default, Clone)]
pub struct Tally {
    pub overlaps: Arc<AtomicUsize>,
    busy: Arc<AtomicBool>,
}

impl Tally {
    /// Holds the busy flag across an await point so an overlapping handler would see it.
    async fn bump(&self, total: &mut u64) {
        if self.busy.swap(true, Ordering::AcqRel) {
            self.overlaps.fetch_add(1, Ordering::Relaxed);
        }
        tokio::task::yield_now().await;
        *total += 1;
        self.busy.store(false, Ordering::Release);
    }
}

#[async_trait]
impl Behavior for Tally {
    type Args = ();
    type State = u64;
    type Call = TallyCall;
    type Cast = ();
    type Info = ();
    type Reply = u64;

    async fn init(&self, _args: (), _ctx: &ProcessContext) -> anyhow::Result<u64> {
        Ok(0)
    }

    async fn handle_call(
        &self,
        request: TallyCall,
        _from: ReplyTo<u64>,
        total: &mut u64,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<CallOutcome<u64>> {
        if let TallyCall::Bump = request {
            self.bump(total).await;
        }
        Ok(CallOutcome::Reply(*total))
    }

    async fn handle_cast(
        &self,
        _message: (),
        total: &mut u64,
        _ctx: &ProcessContext,
    ) -> anyhow::Result<HandleOutcome> {
        self.bump(total).await;
        Ok(HandleOutcome::NoReply)
    }
}
