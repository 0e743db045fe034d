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

//! The process system and the services it owns.
//!
//! # Key Re-exported Components:
//!
//! *   [`SpindleApp`]: launches a [`ProcessSystem`].
//! *   [`ProcessSystem`]: spawns, addresses, links, registers and stops processes.
//! *   [`ProcessHandle`]: a typed reference to one process.
//! *   [`Pool`]: a group of processes sharing one behavior.
//! *   [`SpindleConfig`]: timeouts, limits and default policies.

pub use config::{DefaultsConfig, LimitsConfig, SpindleConfig, TimeoutConfig};
pub use pool::{Pool, PoolOptions, PoolStrategy};
pub use process_handle::ProcessHandle;
pub use process_system::ProcessSystem;
pub use registry::{ConflictPolicy, Registration, RegistryEntry};
pub use spindle_app::SpindleApp;
pub use types::{CorrelationId, MonitorRef, Pid, Target};

pub(crate) use types::PoolId;

/// Defines the configuration system.
pub mod config;

mod pool;
mod process_handle;
/// Defines the `ProcessSystem` handle.
mod process_system;
mod process_table;
mod registry;
/// Defines the `SpindleApp` entry point.
mod spindle_app;
mod system_inner;
mod types;
