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

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, instrument, trace, warn};

use crate::common::system_inner::SystemInner;
use crate::common::{
    MonitorRef, Pid, Pool, PoolOptions, ProcessHandle, Registration, RegistryEntry,
    SpindleConfig, Target,
};
use crate::message::{Envelope, Payload, ProcessError, ReplyTo, SystemSignal};
use crate::process::{
    self, Channels, ExitReason, ProcessCell, ProcessContext, ProcessStatus, SpawnOptions,
    Startup,
};
use crate::traits::Behavior;

/// A running process system.
///
/// This is the explicit, cloneable handle through which processes are spawned, addressed,
/// linked, registered and stopped. Clones share one system; separate systems created with
/// [`SpindleApp`](crate::common::SpindleApp) are fully isolated from each other, including
/// their pid counters and registries.
///
/// Processes run as Tokio tasks, so every async method must be awaited inside a Tokio
/// runtime.
#[derive(Clone)]
pub struct ProcessSystem(pub(crate) Arc<SystemInner>);

impl fmt::Debug for ProcessSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSystem")
            .field("processes", &self.process_count())
            .finish_non_exhaustive()
    }
}

impl ProcessSystem {
    pub(crate) fn new(config: SpindleConfig) -> Self {
        Self(Arc::new(SystemInner::new(config)))
    }

    pub(crate) fn inner(&self) -> &SystemInner {
        &self.0
    }

    /// The configuration this system was launched with.
    #[must_use]
    pub fn config(&self) -> &SpindleConfig {
        &self.0.config
    }

    /// Spawns a process running `behavior`, initialised with `args`.
    ///
    /// Resolves once `init` has finished and the process accepts messages.
    ///
    /// # Errors
    ///
    /// [`ProcessError::BehaviorInit`] when `init` fails or panics.
    pub async fn spawn<B: Behavior>(
        &self,
        behavior: B,
        args: B::Args,
    ) -> Result<ProcessHandle<B>, ProcessError> {
        self.spawn_with(behavior, args, SpawnOptions::default()).await
    }

    /// Spawns a process with explicit [`SpawnOptions`].
    ///
    /// The name, link and pool membership from `options` are applied atomically with the
    /// process entering the table.
    ///
    /// # Errors
    ///
    /// * [`ProcessError::BehaviorInit`] when `init` fails or panics.
    /// * [`ProcessError::DuplicateRegistration`] when the name is taken and the registration
    ///   is strict.
    /// * [`ProcessError::ProcessNotFound`] when the link target is not alive.
    pub async fn spawn_with<B: Behavior>(
        &self,
        behavior: B,
        args: B::Args,
        options: SpawnOptions,
    ) -> Result<ProcessHandle<B>, ProcessError> {
        self.spawn_shared(Arc::new(behavior), args, options).await
    }

    /// Spawns a process from a behavior shared with other processes.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::spawn_with`].
    #[instrument(skip_all, fields(behavior = std::any::type_name::<B>()))]
    pub async fn spawn_shared<B: Behavior>(
        &self,
        behavior: Arc<B>,
        args: B::Args,
        options: SpawnOptions,
    ) -> Result<ProcessHandle<B>, ProcessError> {
        let pid = self.0.ids.next_pid();
        let policy = self.0.config.defaults.registry_conflict;

        // Fail fast before running init; the check is repeated under the write lock.
        if let Some(name) = &options.name {
            let name_policy = options.registration.policy.unwrap_or(policy);
            self.0.table.read().registry().check(name, pid, name_policy)?;
        }

        let capacity = options
            .mailbox_capacity
            .unwrap_or(self.0.config.limits.mailbox_capacity)
            .max(1);
        let (mailbox_tx, mailbox_rx) = mpsc::channel::<Envelope<B>>(capacity);
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let cell = Arc::new(ProcessCell::new::<B>(
            pid,
            mailbox_tx,
            control_tx,
            options.trap_exit,
        ));

        let (report_tx, report_rx) = oneshot::channel();
        let (gate_tx, gate_rx) = oneshot::channel();
        let task = process::run(
            behavior,
            args,
            ProcessContext::new(Arc::clone(&cell), self.clone()),
            Channels {
                mailbox: mailbox_rx,
                control: control_rx,
            },
            Startup {
                report: report_tx,
                gate: gate_rx,
            },
            self.0.cancellation_token.clone(),
        );
        self.0.tracker.spawn(cell.tracker().track_future(task));
        cell.tracker().close();

        match report_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(ProcessError::BehaviorInit(error)),
            Err(_) => {
                return Err(ProcessError::BehaviorInit(
                    "process task ended before init completed".to_string(),
                ))
            }
        }

        // No await between admission and opening the gate.
        let admitted = self
            .0
            .table
            .write()
            .admit(Arc::clone(&cell), &options, policy);
        match admitted {
            Ok(()) => {
                cell.advance(ProcessStatus::Running);
                let _ = gate_tx.send(true);
                trace!(%pid, name = ?options.name, "process spawned");
                Ok(ProcessHandle::new(cell, self.clone()))
            }
            Err(error) => {
                let _ = gate_tx.send(false);
                debug!(%pid, %error, "process rejected at admission");
                Err(error)
            }
        }
    }

    fn mailbox_for<B: Behavior>(
        &self,
        target: &Target,
    ) -> Result<(Pid, mpsc::Sender<Envelope<B>>), ProcessError> {
        let table = self.0.table.read();
        let cell = table.resolve(target)?;
        Ok((cell.pid(), cell.mailbox::<B>()?.clone()))
    }

    /// Calls `target` with the configured `timeouts.call_timeout_ms`.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::call_timeout`].
    pub async fn call<B: Behavior>(
        &self,
        target: impl Into<Target>,
        request: B::Call,
    ) -> Result<B::Reply, ProcessError> {
        let timeout = self.0.config.call_timeout();
        self.call_timeout::<B>(target, request, timeout).await
    }

    /// Sends a call and waits up to `timeout` for its reply.
    ///
    /// The timeout covers waiting for mailbox space as well as for the reply. A call that
    /// times out stays in the target's mailbox; the handler still runs, but its reply is
    /// dropped.
    ///
    /// # Errors
    ///
    /// * [`ProcessError::ProcessNotFound`] when the target is unknown or not alive.
    /// * [`ProcessError::BehaviorMismatch`] when the target runs another behavior.
    /// * [`ProcessError::CallTimeout`] when no reply arrived in time.
    /// * [`ProcessError::ActorCrashed`] when the target crashed before replying.
    /// * [`ProcessError::Stopped`] when the target stopped before replying.
    pub async fn call_timeout<B: Behavior>(
        &self,
        target: impl Into<Target>,
        request: B::Call,
        timeout: Duration,
    ) -> Result<B::Reply, ProcessError> {
        self.call_from::<B>(None, target.into(), request, timeout)
            .await
    }

    pub(crate) async fn call_from<B: Behavior>(
        &self,
        sender: Option<Pid>,
        target: Target,
        request: B::Call,
        timeout: Duration,
    ) -> Result<B::Reply, ProcessError> {
        let deadline = Instant::now() + timeout;
        let (pid, mailbox) = self.mailbox_for::<B>(&target)?;
        let correlation_id = self.0.ids.next_correlation();
        // The process holds the only reply slot; dropping `reply` on timeout closes it.
        let (reply_to, reply) = ReplyTo::channel(sender, pid, correlation_id);
        let envelope = Envelope::new(sender, Payload::Call { request, reply_to });

        match tokio::time::timeout_at(deadline, mailbox.send(envelope)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(ProcessError::ProcessNotFound(target)),
            Err(_) => {
                warn!(%pid, ?timeout, "call timed out waiting for mailbox space");
                return Err(ProcessError::CallTimeout { pid, timeout });
            }
        }
        trace!(%pid, %correlation_id, "call enqueued");

        match tokio::time::timeout_at(deadline, reply).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ProcessError::ReplyDropped { pid }),
            Err(_) => {
                warn!(%pid, %correlation_id, ?timeout, "call timed out");
                Err(ProcessError::CallTimeout { pid, timeout })
            }
        }
    }

    /// Enqueues a cast for `target`. Resolves once the message is in the mailbox.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] or [`ProcessError::BehaviorMismatch`].
    pub async fn cast<B: Behavior>(
        &self,
        target: impl Into<Target>,
        message: B::Cast,
    ) -> Result<(), ProcessError> {
        self.cast_from::<B>(None, target.into(), message).await
    }

    pub(crate) async fn cast_from<B: Behavior>(
        &self,
        sender: Option<Pid>,
        target: Target,
        message: B::Cast,
    ) -> Result<(), ProcessError> {
        self.enqueue::<B>(target, Envelope::new(sender, Payload::Cast(message)))
            .await
    }

    /// Enqueues a user info message for `target`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] or [`ProcessError::BehaviorMismatch`].
    pub async fn send_info<B: Behavior>(
        &self,
        target: impl Into<Target>,
        message: B::Info,
    ) -> Result<(), ProcessError> {
        self.send_info_from::<B>(None, target.into(), message).await
    }

    pub(crate) async fn send_info_from<B: Behavior>(
        &self,
        sender: Option<Pid>,
        target: Target,
        message: B::Info,
    ) -> Result<(), ProcessError> {
        self.enqueue::<B>(target, Envelope::new(sender, Payload::Info(message)))
            .await
    }

    async fn enqueue<B: Behavior>(
        &self,
        target: Target,
        envelope: Envelope<B>,
    ) -> Result<(), ProcessError> {
        let (pid, mailbox) = self.mailbox_for::<B>(&target)?;
        let kind = envelope.kind();
        mailbox
            .send(envelope)
            .await
            .map_err(|_| ProcessError::ProcessNotFound(target))?;
        trace!(%pid, %kind, "message enqueued");
        Ok(())
    }

    /// Stops `target` with `reason` and waits for it to terminate.
    ///
    /// The target is marked Stopping at once, so new calls, casts, links and stops addressed
    /// to it fail with [`ProcessError::ProcessNotFound`]. The process then finishes its in-flight message, runs `terminate`, fails the calls still
    /// queued for it and then leaves the table, the registry and its pools. Links and
    /// monitors are notified with `reason`.
    ///
    /// # Errors
    ///
    /// * [`ProcessError::ProcessNotFound`] when the target is unknown or already stopping.
    /// * [`ProcessError::StopTimeout`] when it did not terminate within
    ///   `timeouts.process_stop_timeout_ms`.
    pub async fn stop(
        &self,
        target: impl Into<Target>,
        reason: impl Into<ExitReason>,
    ) -> Result<(), ProcessError> {
        let reason = reason.into();
        let cell = self.begin_stop(&target.into())?;
        debug!(pid = %cell.pid(), %reason, "stopping process");
        cell.signal(SystemSignal::Stop { reason });
        self.await_exit(&cell).await
    }

    /// Kills `target`: it terminates with [`ExitReason::Killed`] after its in-flight message,
    /// whether or not it traps exits.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::stop`].
    pub async fn kill(&self, target: impl Into<Target>) -> Result<(), ProcessError> {
        let cell = self.begin_stop(&target.into())?;
        debug!(pid = %cell.pid(), "killing process");
        cell.signal(SystemSignal::Kill);
        self.await_exit(&cell).await
    }

    /// Marks the target Stopping under the write lock; a second stop finds it gone.
    fn begin_stop(&self, target: &Target) -> Result<Arc<ProcessCell>, ProcessError> {
        let table = self.0.table.write();
        let cell = table.resolve(target)?;
        if !cell.advance(ProcessStatus::Stopping) {
            return Err(ProcessError::ProcessNotFound(target.clone()));
        }
        Ok(Arc::clone(cell))
    }

    async fn await_exit(&self, cell: &ProcessCell) -> Result<(), ProcessError> {
        let timeout = self.0.config.process_stop_timeout();
        tokio::time::timeout(timeout, cell.tracker().wait())
            .await
            .map_err(|_| {
                warn!(pid = %cell.pid(), ?timeout, "process did not stop in time");
                ProcessError::StopTimeout { pid: cell.pid() }
            })
    }

    /// Removes a terminated process from the table and notifies its links and monitors.
    pub(crate) fn finalize(&self, cell: &Arc<ProcessCell>, reason: &ExitReason) {
        cell.record_exit(reason);
        let notices = self.0.table.write().remove(cell.pid(), reason);
        cell.advance(ProcessStatus::Terminated);
        for notice in notices {
            notice.deliver();
        }
    }

    /// Links `a` and `b`. When either terminates abnormally the other terminates with the
    /// same reason, unless it traps exits. Linking a process to itself does nothing.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] when either process is not alive.
    pub fn link(&self, a: Pid, b: Pid) -> Result<(), ProcessError> {
        self.0.table.write().link(a, b)
    }

    /// Removes the link between `a` and `b`. Returns whether there was one.
    pub fn unlink(&self, a: Pid, b: Pid) -> bool {
        self.0.table.write().unlink(a, b)
    }

    /// Makes `observer` monitor `target`. When `target` terminates, `observer` receives
    /// [`Info::Down`](crate::message::Info::Down) and keeps running.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] when either process is not alive.
    pub fn monitor(
        &self,
        observer: Pid,
        target: impl Into<Target>,
    ) -> Result<MonitorRef, ProcessError> {
        let monitor = self.0.ids.next_monitor();
        let target = self
            .0
            .table
            .write()
            .monitor(monitor, observer, &target.into())?;
        trace!(%observer, %target, %monitor, "monitor installed");
        Ok(monitor)
    }

    /// Removes a monitor before it fires. Returns `false` if it already fired or never
    /// existed.
    pub fn demonitor(&self, monitor: MonitorRef) -> bool {
        self.0.table.write().demonitor(monitor)
    }

    /// Binds `key` to `pid` following `defaults.registry_conflict`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ProcessNotFound`] when `pid` is not alive, or
    /// [`ProcessError::DuplicateRegistration`] when the name is taken under a strict policy.
    pub fn register(&self, key: impl Into<String>, pid: Pid) -> Result<(), ProcessError> {
        self.register_with(key, pid, Registration::default())
    }

    /// Binds `key` to `pid` with the properties, tags and policy of `registration`.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::register`].
    pub fn register_with(
        &self,
        key: impl Into<String>,
        pid: Pid,
        registration: Registration,
    ) -> Result<(), ProcessError> {
        let key = key.into();
        let policy = self.0.config.defaults.registry_conflict;
        self.0
            .table
            .write()
            .register(&key, pid, &registration, policy)?;
        trace!(key = %key, %pid, "name registered");
        Ok(())
    }

    /// Removes the binding for `key` and returns it.
    pub fn unregister(&self, key: &str) -> Option<RegistryEntry> {
        self.0.table.write().unregister(key)
    }

    /// The pid bound to `key`.
    #[must_use]
    pub fn whereis(&self, key: &str) -> Option<Pid> {
        self.0.table.read().registry().whereis(key)
    }

    /// The full entry bound to `key`.
    #[must_use]
    pub fn registry_entry(&self, key: &str) -> Option<RegistryEntry> {
        self.0.table.read().registry().entry(key).cloned()
    }

    /// Every name bound to `pid`, sorted.
    #[must_use]
    pub fn registered_names(&self, pid: Pid) -> Vec<String> {
        self.0.table.read().registry().names_of(pid)
    }

    /// Every entry matching `predicate`, sorted by key.
    ///
    /// ```rust,ignore
    /// let caches = system.query(|entry| entry.has_tag("cache"));
    /// ```
    pub fn query(&self, predicate: impl Fn(&RegistryEntry) -> bool) -> Vec<RegistryEntry> {
        self.0.table.read().registry().query(predicate)
    }

    /// Spawns a pool of `size` processes running `behavior`.
    ///
    /// # Errors
    ///
    /// The first member spawn failure; members spawned so far are stopped.
    pub async fn spawn_pool<B>(
        &self,
        behavior: B,
        args: B::Args,
        size: usize,
    ) -> Result<Pool<B>, ProcessError>
    where
        B: Behavior,
        B::Args: Clone,
    {
        self.spawn_pool_with(behavior, args, PoolOptions::new().size(size))
            .await
    }

    /// Spawns a pool configured by `options`.
    ///
    /// # Errors
    ///
    /// As [`ProcessSystem::spawn_pool`].
    pub async fn spawn_pool_with<B>(
        &self,
        behavior: B,
        args: B::Args,
        options: PoolOptions,
    ) -> Result<Pool<B>, ProcessError>
    where
        B: Behavior,
        B::Args: Clone,
    {
        Pool::start(self.clone(), Arc::new(behavior), args, options).await
    }

    /// How many processes are in the table.
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.0.table.read().len()
    }

    /// The pids in the table, ascending.
    #[must_use]
    pub fn pids(&self) -> Vec<Pid> {
        self.0.table.read().pids()
    }

    /// The status of `pid`, or `None` once it has left the table.
    #[must_use]
    pub fn status(&self, pid: Pid) -> Option<ProcessStatus> {
        self.0.table.read().cell(pid).map(|cell| cell.status())
    }

    /// Whether `pid` still accepts messages.
    #[must_use]
    pub fn is_alive(&self, pid: Pid) -> bool {
        self.0.table.read().live(pid).is_ok()
    }

    /// Stops every process with [`ExitReason::Shutdown`].
    ///
    /// Waits up to `timeouts.system_shutdown_timeout_ms`. If processes are still running
    /// after that, the system's cancellation token is cancelled so their loops exit after
    /// the in-flight message; the system is spent afterwards.
    ///
    /// # Errors
    ///
    /// [`ProcessError::ShutdownTimeout`] when the timeout elapsed.
    #[instrument(skip(self))]
    pub async fn shutdown_all(&self) -> Result<(), ProcessError> {
        let cells = self.0.table.read().cells();
        debug!(processes = cells.len(), "shutting down");
        for cell in &cells {
            cell.advance(ProcessStatus::Stopping);
            cell.signal(SystemSignal::Stop {
                reason: ExitReason::Shutdown,
            });
        }

        self.0.tracker.close();
        let timeout = self.0.config.system_shutdown_timeout();
        let result = if tokio::time::timeout(timeout, self.0.tracker.wait())
            .await
            .is_ok()
        {
            Ok(())
        } else {
            let remaining = self.process_count();
            warn!(remaining, "shutdown timed out, cancelling remaining processes");
            self.0.cancellation_token.cancel();
            Err(ProcessError::ShutdownTimeout { remaining })
        };
        self.0.tracker.reopen();
        result
    }
}
