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

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The lifecycle stage of a process.
///
/// Stages only move forward: `Starting -> Running -> Stopping -> Terminated`.
/// `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ProcessStatus {
    /// `init` has not finished yet.
    Starting = 0,
    /// The process is draining its mailbox.
    Running = 1,
    /// The process is running its `terminate` hook; new messages are refused.
    Stopping = 2,
    /// The process is gone from the system.
    Terminated = 3,
}

impl ProcessStatus {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Terminated,
        }
    }

    /// Whether a process in this stage still accepts messages.
    #[must_use]
    pub const fn is_accepting(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Terminated => "terminated",
        };
        f.write_str(label)
    }
}

/// A status cell that can only advance.
#[derive(Debug)]
pub(crate) struct AtomicStatus(AtomicU8);

impl AtomicStatus {
    pub(crate) const fn new(status: ProcessStatus) -> Self {
        Self(AtomicU8::new(status as u8))
    }

    pub(crate) fn load(&self) -> ProcessStatus {
        ProcessStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves to `next` if it is later than the current stage. Returns whether it moved.
    pub(crate) fn advance(&self, next: ProcessStatus) -> bool {
        self.0.fetch_max(next as u8, Ordering::AcqRel) < next as u8
    }
}
