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

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::common::process_table::ProcessTable;
use crate::common::types::IdCounters;
use crate::common::SpindleConfig;

/// The state behind a [`ProcessSystem`](crate::common::ProcessSystem) handle.
#[derive(Debug)]
pub(crate) struct SystemInner {
    /// Processes, registry, pools and the link/monitor graph.
    pub(crate) table: RwLock<ProcessTable>,
    /// Pid, monitor, correlation and pool counters.
    pub(crate) ids: IdCounters,
    /// Configuration for this system instance.
    pub(crate) config: SpindleConfig,
    /// Cancelled when a shutdown times out; every process loop exits on it.
    pub(crate) cancellation_token: CancellationToken,
    /// Tracks every process task.
    pub(crate) tracker: TaskTracker,
}

impl SystemInner {
    pub(crate) fn new(config: SpindleConfig) -> Self {
        Self {
            table: RwLock::new(ProcessTable::default()),
            ids: IdCounters::default(),
            config,
            cancellation_token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }
}
