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

#![forbid(unsafe_code)]
#![forbid(missing_docs)] // Keep this to enforce coverage

//! # Spindle
//!
//! An actor-style process runtime on top of Tokio. Processes are isolated units of state
//! and behavior that talk only through their mailboxes, are supervised through links and
//! monitors, and can be found by name or addressed as a pool.
//!
//! ## Key Concepts
//!
//! - **Processes**: each one is a Tokio task that owns its state and drains a bounded
//!   mailbox one message at a time.
//! - **Behaviors (`Behavior`)**: the logic a process runs: `init`, `handle_call`,
//!   `handle_cast`, `handle_info` and `terminate`.
//! - **Messaging**: `call` waits for a reply (with a timeout), `cast` is fire-and-forget,
//!   and info messages carry out-of-band notifications.
//! - **System (`ProcessSystem`)**: the explicit handle that spawns, addresses and stops
//!   processes. Systems are independent of each other.
//! - **Supervision**: links propagate abnormal exits both ways unless a process traps exits;
//!   monitors deliver a one-way down notification.
//! - **Registry and pools**: names with properties and tags, and round-robin or random
//!   dispatch over a resizable group of processes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spindle::prelude::*;
//!
//! let system = SpindleApp::launch_async().await;
//! let counter = system.spawn(Counter, 10).await?;
//! assert_eq!(counter.call(CounterCall::Add(5)).await?, 15);
//! system.shutdown_all().await?;
//! ```

/// The process system, registry, pools and configuration.
pub(crate) mod common;

/// Process lifecycle, the per-process loop and the handler context.
pub(crate) mod process;

/// Message types, handler outcomes and errors.
pub(crate) mod message;

/// Defines the `Behavior` trait.
pub(crate) mod traits;

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// ## Macros (from `spindle-macro`)
/// *   [`spindle_macro::spindle_message`]: Attribute macro for message types.
/// *   [`spindle_macro::spindle_state`]: Attribute macro for process state types.
///
/// ## External Crates
/// *   [`async_trait::async_trait`](https://docs.rs/async-trait/latest/async_trait/attr.async_trait.html): Needed to implement [`Behavior`](crate::prelude::Behavior).
///
/// ## Core Types
/// *   [`crate::common::SpindleApp`]: Launches a process system.
/// *   [`crate::common::ProcessSystem`]: The explicit system handle.
/// *   [`crate::common::ProcessHandle`]: A typed reference to one process.
/// *   [`crate::common::Pool`], [`crate::common::PoolOptions`], [`crate::common::PoolStrategy`]: Process pools.
/// *   [`crate::common::Registration`], [`crate::common::RegistryEntry`], [`crate::common::ConflictPolicy`]: The name registry.
/// *   [`crate::common::SpindleConfig`]: Configuration.
/// *   [`crate::common::Pid`], [`crate::common::MonitorRef`], [`crate::common::Target`]: Identifiers.
/// *   [`crate::traits::Behavior`]: The trait every process runs.
/// *   [`crate::process::ProcessContext`]: The handler context.
/// *   [`crate::process::ExitReason`], [`crate::process::ProcessStatus`], [`crate::process::SpawnOptions`]: Lifecycle vocabulary.
/// *   [`crate::message::CallOutcome`], [`crate::message::HandleOutcome`]: Handler results.
/// *   [`crate::message::Info`], [`crate::message::ReplyTo`], [`crate::message::MessageKind`]: Message types.
/// *   [`crate::message::ProcessError`]: Every runtime failure.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use spindle_macro::{spindle_message, spindle_state};

    pub use crate::common::config::{DefaultsConfig, LimitsConfig, SpindleConfig, TimeoutConfig};
    pub use crate::common::{
        ConflictPolicy, CorrelationId, MonitorRef, Pid, Pool, PoolOptions, PoolStrategy,
        ProcessHandle, ProcessSystem, Registration, RegistryEntry, SpindleApp, Target,
    };
    pub use crate::message::{
        CallOutcome, HandleOutcome, Info, MessageKind, ProcessError, ReplyTo,
    };
    pub use crate::process::{ExitReason, ProcessContext, ProcessStatus, SpawnOptions};
    pub use crate::traits::Behavior;
}
