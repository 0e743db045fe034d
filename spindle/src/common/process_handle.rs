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
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{Pid, ProcessSystem, Target};
use crate::message::ProcessError;
use crate::process::{ExitReason, ProcessCell, ProcessStatus};
use crate::traits::Behavior;

/// A typed reference to a spawned process.
///
/// The handle knows which behavior the process runs, so its methods take the behavior's
/// message types directly. It stays valid after the process terminates: [`status`] then
/// reports [`ProcessStatus::Terminated`] and messaging methods fail with
/// [`ProcessError::ProcessNotFound`].
///
/// [`status`]: ProcessHandle::status
pub struct ProcessHandle<B: Behavior> {
    cell: Arc<ProcessCell>,
    system: ProcessSystem,
    _behavior: PhantomData<fn() -> B>,
}

impl<B: Behavior> Clone for ProcessHandle<B> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            system: self.system.clone(),
            _behavior: PhantomData,
        }
    }
}

impl<B: Behavior> fmt::Debug for ProcessHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.cell.pid())
            .field("status", &self.cell.status())
            .finish()
    }
}

impl<B: Behavior> From<&ProcessHandle<B>> for Target {
    fn from(handle: &ProcessHandle<B>) -> Self {
        Self::Pid(handle.pid())
    }
}

impl<B: Behavior> ProcessHandle<B> {
    pub(crate) fn new(cell: Arc<ProcessCell>, system: ProcessSystem) -> Self {
        Self {
            cell,
            system,
            _behavior: PhantomData,
        }
    }

    /// The process's pid.
    #[must_use]
    pub fn pid(&self) -> Pid {
        self.cell.pid()
    }

    /// The process's current status.
    #[must_use]
    pub fn status(&self) -> ProcessStatus {
        self.cell.status()
    }

    /// Whether the process still accepts messages.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.cell.is_alive()
    }

    /// Why the process terminated, once it has.
    #[must_use]
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.cell.exit_reason()
    }

    /// The system the process belongs to.
    #[must_use]
    pub const fn system(&self) -> &ProcessSystem {
        &self.system
    }

    /// Waits until the process has terminated and returns its exit reason.
    pub async fn wait(&self) -> ExitReason {
        self.cell.tracker().wait().await;
        self.cell.exit_reason().unwrap_or_default()
    }

    /// Calls the process with the configured default timeout.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::call_timeout`].
    pub async fn call(&self, request: B::Call) -> Result<B::Reply, ProcessError> {
        self.system.call::<B>(self.pid(), request).await
    }

    /// Calls the process, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::call_timeout`].
    pub async fn call_timeout(
        &self,
        request: B::Call,
        timeout: Duration,
    ) -> Result<B::Reply, ProcessError> {
        self.system
            .call_timeout::<B>(self.pid(), request, timeout)
            .await
    }

    /// Casts to the process.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] once the process is stopping.
    pub async fn cast(&self, message: B::Cast) -> Result<(), ProcessError> {
        self.system.cast::<B>(self.pid(), message).await
    }

    /// Sends the process an info message.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] once the process is stopping.
    pub async fn send_info(&self, message: B::Info) -> Result<(), ProcessError> {
        self.system.send_info::<B>(self.pid(), message).await
    }

    /// Stops the process with `reason` and waits for it to terminate.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::stop`].
    pub async fn stop(&self, reason: impl Into<ExitReason>) -> Result<(), ProcessError> {
        self.system.stop(self.pid(), reason).await
    }

    /// Kills the process and waits for it to terminate.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::kill`].
    pub async fn kill(&self) -> Result<(), ProcessError> {
        self.system.kill(self.pid()).await
    }
}
