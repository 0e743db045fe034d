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
use std::sync::Arc;
use std::time::Duration;

use crate::common::{MonitorRef, Pid, ProcessSystem, Target};
use crate::message::ProcessError;
use crate::process::cell::ProcessCell;
use crate::traits::Behavior;

/// A process's view of itself and of the system it runs in.
///
/// Every behavior callback receives one. Messages sent through the context carry this
/// process as their sender, so a callee's [`ReplyTo::caller`](crate::message::ReplyTo::caller)
/// can tell who is asking.
///
/// A handler must not `stop` or `call` its own pid through the system: the process is busy
/// running that handler, so both would wait out their timeout. Return
/// [`HandleOutcome::Stop`](crate::message::HandleOutcome::Stop) or
/// [`CallOutcome::Stop`](crate::message::CallOutcome::Stop) instead.
#[derive(Clone)]
pub struct ProcessContext {
    cell: Arc<ProcessCell>,
    system: ProcessSystem,
}

impl fmt::Debug for ProcessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessContext")
            .field("pid", &self.cell.pid())
            .finish_non_exhaustive()
    }
}

impl ProcessContext {
    pub(crate) const fn new(cell: Arc<ProcessCell>, system: ProcessSystem) -> Self {
        Self { cell, system }
    }

    pub(crate) fn cell(&self) -> &Arc<ProcessCell> {
        &self.cell
    }

    /// This process's pid.
    #[must_use]
    pub fn pid(&self) -> Pid {
        self.cell.pid()
    }

    /// The system this process belongs to.
    #[must_use]
    pub const fn system(&self) -> &ProcessSystem {
        &self.system
    }

    /// Turns exit trapping on or off. While on, exit signals from linked processes arrive as
    /// [`Info::Exit`](crate::message::Info::Exit) instead of terminating this process.
    pub fn set_trap_exit(&self, trap: bool) {
        self.cell.set_trap_exit(trap);
    }

    /// Whether exit trapping is on.
    #[must_use]
    pub fn traps_exits(&self) -> bool {
        self.cell.traps_exits()
    }

    /// Links this process with `other`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] if `other` is not alive.
    pub fn link(&self, other: Pid) -> Result<(), ProcessError> {
        self.system.link(self.pid(), other)
    }

    /// Removes the link with `other`. Returns whether there was one.
    pub fn unlink(&self, other: Pid) -> bool {
        self.system.unlink(self.pid(), other)
    }

    /// Monitors `target` from this process.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] if `target` is not alive.
    pub fn monitor(&self, target: impl Into<Target>) -> Result<MonitorRef, ProcessError> {
        self.system.monitor(self.pid(), target)
    }

    /// Cancels a monitor this process holds. Returns `false` if it already fired or was
    /// removed.
    pub fn demonitor(&self, monitor: MonitorRef) -> bool {
        self.system.demonitor(monitor)
    }

    /// Calls `target` with the configured default timeout.
    ///
    /// # Errors
    ///
    /// Any call failure, see [`ProcessSystem::call`].
    pub async fn call<B: Behavior>(
        &self,
        target: impl Into<Target>,
        request: B::Call,
    ) -> Result<B::Reply, ProcessError> {
        let timeout = self.system.config().call_timeout();
        self.call_timeout::<B>(target, request, timeout).await
    }

    /// Calls `target`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Any call failure, see [`ProcessSystem::call_timeout`].
    pub async fn call_timeout<B: Behavior>(
        &self,
        target: impl Into<Target>,
        request: B::Call,
        timeout: Duration,
    ) -> Result<B::Reply, ProcessError> {
        self.system
            .call_from::<B>(Some(self.pid()), target.into(), request, timeout)
            .await
    }

    /// Casts to `target`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] or [`ProcessError::BehaviorMismatch`].
    pub async fn cast<B: Behavior>(
        &self,
        target: impl Into<Target>,
        message: B::Cast,
    ) -> Result<(), ProcessError> {
        self.system
            .cast_from::<B>(Some(self.pid()), target.into(), message)
            .await
    }

    /// Sends an info message to `target`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] or [`ProcessError::BehaviorMismatch`].
    pub async fn send_info<B: Behavior>(
        &self,
        target: impl Into<Target>,
        message: B::Info,
    ) -> Result<(), ProcessError> {
        self.system
            .send_info_from::<B>(Some(self.pid()), target.into(), message)
            .await
    }
}
