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

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::trace;

use crate::common::Pid;
use crate::message::{Envelope, ProcessError, SystemSignal};
use crate::process::status::AtomicStatus;
use crate::process::{ExitReason, ProcessStatus};
use crate::traits::Behavior;

/// The shared, type-erased face of one process.
///
/// The process table, handles and contexts hold an `Arc<ProcessCell>`; the process loop
/// owns the receiving ends. The mailbox sender is stored as `dyn Any` so the table can hold
/// processes of every behavior, and is downcast back when a typed message is sent.
pub(crate) struct ProcessCell {
    pid: Pid,
    behavior: &'static str,
    status: AtomicStatus,
    trap_exit: AtomicBool,
    control: mpsc::UnboundedSender<SystemSignal>,
    mailbox: Box<dyn Any + Send + Sync>,
    exit_reason: Mutex<Option<ExitReason>>,
    tracker: TaskTracker,
}

impl fmt::Debug for ProcessCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessCell")
            .field("pid", &self.pid)
            .field("behavior", &self.behavior)
            .field("status", &self.status.load())
            .field("trap_exit", &self.traps_exits())
            .finish_non_exhaustive()
    }
}

impl ProcessCell {
    pub(crate) fn new<B: Behavior>(
        pid: Pid,
        mailbox: mpsc::Sender<Envelope<B>>,
        control: mpsc::UnboundedSender<SystemSignal>,
        trap_exit: bool,
    ) -> Self {
        Self::from_parts(
            pid,
            std::any::type_name::<B>(),
            Box::new(mailbox),
            control,
            trap_exit,
        )
    }

    pub(crate) fn from_parts(
        pid: Pid,
        behavior: &'static str,
        mailbox: Box<dyn Any + Send + Sync>,
        control: mpsc::UnboundedSender<SystemSignal>,
        trap_exit: bool,
    ) -> Self {
        Self {
            pid,
            behavior,
            status: AtomicStatus::new(ProcessStatus::Starting),
            trap_exit: AtomicBool::new(trap_exit),
            control,
            mailbox,
            exit_reason: Mutex::new(None),
            tracker: TaskTracker::new(),
        }
    }

    pub(crate) const fn pid(&self) -> Pid {
        self.pid
    }

    pub(crate) fn status(&self) -> ProcessStatus {
        self.status.load()
    }

    pub(crate) fn advance(&self, next: ProcessStatus) -> bool {
        let moved = self.status.advance(next);
        if moved {
            trace!(pid = %self.pid, status = %next, "process status changed");
        }
        moved
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.status().is_accepting()
    }

    pub(crate) fn traps_exits(&self) -> bool {
        self.trap_exit.load(Ordering::Acquire)
    }

    pub(crate) fn set_trap_exit(&self, trap: bool) {
        self.trap_exit.store(trap, Ordering::Release);
    }

    pub(crate) fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub(crate) fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason.lock().clone()
    }

    pub(crate) fn record_exit(&self, reason: &ExitReason) {
        *self.exit_reason.lock() = Some(reason.clone());
    }

    /// Delivers a control signal. Returns `false` once the process loop is gone.
    pub(crate) fn signal(&self, signal: SystemSignal) -> bool {
        self.control.send(signal).is_ok()
    }

    /// The typed mailbox, or [`ProcessError::BehaviorMismatch`] if this process runs another
    /// behavior.
    pub(crate) fn mailbox<B: Behavior>(&self) -> Result<&mpsc::Sender<Envelope<B>>, ProcessError> {
        self.mailbox
            .downcast_ref::<mpsc::Sender<Envelope<B>>>()
            .ok_or(ProcessError::BehaviorMismatch {
                pid: self.pid,
                expected: std::any::type_name::<B>(),
            })
    }
}
