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
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace, warn};

use crate::message::{
    CallOutcome, Envelope, HandleOutcome, Info, Payload, ProcessError, ReplyTo, SystemSignal,
};
use crate::process::{ExitReason, ProcessContext, ProcessStatus};
use crate::traits::Behavior;

/// The receiving ends a process loop owns.
pub(crate) struct Channels<B: Behavior> {
    pub(crate) mailbox: mpsc::Receiver<Envelope<B>>,
    pub(crate) control: mpsc::UnboundedReceiver<SystemSignal>,
}

/// The handshake between a process and the `spawn` call that created it.
///
/// The process reports the outcome of `init` on `report`; the spawner answers on `gate` with
/// `true` once the process is in the table, or `false` if registration failed.
pub(crate) struct Startup {
    pub(crate) report: oneshot::Sender<Result<(), String>>,
    pub(crate) gate: oneshot::Receiver<bool>,
}

enum Step {
    Continue,
    Exit(ExitReason),
    /// Taken down by a linked process; the reason is the peer's.
    Linked(ExitReason),
}

/// How the loop ended.
struct Termination {
    reason: ExitReason,
    linked: bool,
}

enum Event<B: Behavior> {
    Signal(SystemSignal),
    Cancelled,
    Message(Option<Envelope<B>>),
}

/// Runs one process from `init` to its final cleanup.
#[instrument(skip_all, fields(pid = %ctx.pid()))]
pub(crate) async fn run<B: Behavior>(
    behavior: Arc<B>,
    args: B::Args,
    ctx: ProcessContext,
    channels: Channels<B>,
    startup: Startup,
    shutdown: CancellationToken,
) {
    let mut state = match guarded(behavior.init(args, &ctx)).await {
        Ok(state) => state,
        Err(error) => {
            warn!(%error, "init failed");
            ctx.cell().advance(ProcessStatus::Terminated);
            let _ = startup.report.send(Err(error));
            return;
        }
    };

    if startup.report.send(Ok(())).is_err() || !matches!(startup.gate.await, Ok(true)) {
        trace!("spawn abandoned before the process became visible");
        let hook = behavior.terminate(&ExitReason::Shutdown, state, &ctx);
        if AssertUnwindSafe(hook).catch_unwind().await.is_err() {
            error!("terminate panicked");
        }
        ctx.cell().advance(ProcessStatus::Terminated);
        return;
    }

    let Channels {
        mailbox,
        mut control,
    } = channels;
    let mut process = ProcessLoop {
        behavior,
        ctx,
        mailbox,
        deferred: Vec::new(),
    };

    let termination = process.serve(&mut state, &mut control, &shutdown).await;
    process.shut_down(state, termination).await;
}

struct ProcessLoop<B: Behavior> {
    behavior: Arc<B>,
    ctx: ProcessContext,
    mailbox: mpsc::Receiver<Envelope<B>>,
    /// Reply slots left open by `NoReply`; failed if the process terminates first.
    deferred: Vec<ReplyTo<B::Reply>>,
}

impl<B: Behavior> ProcessLoop<B> {
    async fn serve(
        &mut self,
        state: &mut B::State,
        control: &mut mpsc::UnboundedReceiver<SystemSignal>,
        shutdown: &CancellationToken,
    ) -> Termination {
        trace!("process running");
        loop {
            let event = tokio::select! {
                biased;
                Some(signal) = control.recv() => Event::Signal(signal),
                () = shutdown.cancelled() => Event::Cancelled,
                incoming = self.mailbox.recv() => Event::Message(incoming),
            };

            let step = match event {
                Event::Signal(signal) => self.on_signal(signal, state).await,
                Event::Cancelled => Step::Exit(ExitReason::Shutdown),
                Event::Message(Some(envelope)) => self.dispatch(envelope, state).await,
                Event::Message(None) => Step::Exit(ExitReason::Normal),
            };

            match step {
                Step::Continue => {}
                Step::Exit(reason) => {
                    return Termination {
                        reason,
                        linked: false,
                    }
                }
                Step::Linked(reason) => {
                    return Termination {
                        reason,
                        linked: true,
                    }
                }
            }
            self.deferred.retain(|slot| !slot.is_resolved());
        }
    }

    async fn on_signal(&mut self, signal: SystemSignal, state: &mut B::State) -> Step {
        match signal {
            SystemSignal::Stop { reason } => Step::Exit(reason),
            SystemSignal::Kill => Step::Exit(ExitReason::Killed),
            SystemSignal::Exit { from, reason } => {
                if self.ctx.traps_exits() {
                    self.handle_info(Info::Exit { from, reason }, state).await
                } else if reason.is_normal() {
                    trace!(%from, "ignoring normal exit of linked process");
                    Step::Continue
                } else {
                    debug!(%from, %reason, "linked process exited, terminating");
                    Step::Linked(reason)
                }
            }
            SystemSignal::Down {
                monitor,
                pid,
                reason,
            } => {
                self.handle_info(Info::Down { monitor, pid, reason }, state)
                    .await
            }
        }
    }

    async fn dispatch(&mut self, envelope: Envelope<B>, state: &mut B::State) -> Step {
        trace!(
            kind = %envelope.kind(),
            sender = ?envelope.sender,
            queued = ?envelope.enqueued_at.elapsed(),
            "dispatching message"
        );
        match envelope.payload {
            Payload::Call { request, reply_to } => self.handle_call(request, reply_to, state).await,
            Payload::Cast(message) => {
                let outcome = guarded(self.behavior.handle_cast(message, state, &self.ctx)).await;
                settle(outcome)
            }
            Payload::Info(message) => self.handle_info(Info::Message(message), state).await,
        }
    }

    async fn handle_call(
        &mut self,
        request: B::Call,
        reply_to: ReplyTo<B::Reply>,
        state: &mut B::State,
    ) -> Step {
        let outcome = guarded(
            self.behavior
                .handle_call(request, reply_to.clone(), state, &self.ctx),
        )
        .await;

        match outcome {
            Ok(CallOutcome::Reply(value)) => {
                reply_to.reply(value);
                Step::Continue
            }
            Ok(CallOutcome::NoReply) => {
                if !reply_to.is_resolved() {
                    self.deferred.push(reply_to);
                }
                Step::Continue
            }
            Ok(CallOutcome::Stop { reason, reply }) => {
                if let Some(value) = reply {
                    reply_to.reply(value);
                }
                self.deferred.push(reply_to);
                Step::Exit(reason)
            }
            Err(error) => {
                self.deferred.push(reply_to);
                crashed(error)
            }
        }
    }

    async fn handle_info(&mut self, info: Info<B::Info>, state: &mut B::State) -> Step {
        let outcome = guarded(self.behavior.handle_info(info, state, &self.ctx)).await;
        settle(outcome)
    }

    /// Runs `terminate`, fails every reply still owed, and removes the process from the
    /// system.
    async fn shut_down(mut self, state: B::State, termination: Termination) {
        let Termination { reason, linked } = termination;
        let pid = self.ctx.pid();
        self.ctx.cell().advance(ProcessStatus::Stopping);
        self.mailbox.close();

        let hook = self.behavior.terminate(&reason, state, &self.ctx);
        if AssertUnwindSafe(hook).catch_unwind().await.is_err() {
            error!(%reason, "terminate panicked");
        }

        let failure = if linked {
            ProcessError::for_linked_exit(pid, &reason)
        } else {
            ProcessError::for_exit(pid, &reason)
        };
        let mut discarded = 0_usize;
        while let Some(envelope) = self.mailbox.recv().await {
            if let Payload::Call { reply_to, .. } = envelope.payload {
                reply_to.fail(failure.clone());
            }
            discarded += 1;
        }
        for slot in self.deferred.drain(..) {
            slot.fail(failure.clone());
        }
        if discarded > 0 {
            debug!(discarded, "discarded queued messages");
        }

        self.ctx.system().finalize(self.ctx.cell(), &reason);
        debug!(%reason, "process terminated");
    }
}

fn settle(outcome: Result<HandleOutcome, String>) -> Step {
    match outcome {
        Ok(HandleOutcome::NoReply) => Step::Continue,
        Ok(HandleOutcome::Stop(reason)) => Step::Exit(reason),
        Err(error) => crashed(error),
    }
}

fn crashed(error: String) -> Step {
    error!(%error, "handler crashed");
    Step::Exit(ExitReason::Crashed(error))
}

/// Awaits a callback, turning both returned errors and panics into a rendered message.
async fn guarded<T>(future: impl Future<Output = anyhow::Result<T>>) -> Result<T, String> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(format!("{error:#}")),
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked with a non-string payload".to_string())
}
