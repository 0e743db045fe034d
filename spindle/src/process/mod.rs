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

//! Processes: the per-process loop, its lifecycle vocabulary and the context handed to
//! behavior callbacks.

pub use context::ProcessContext;
pub use exit_reason::ExitReason;
pub use spawn_options::SpawnOptions;
pub use status::ProcessStatus;

pub(crate) use cell::ProcessCell;
pub(crate) use process_loop::{run, Channels, Startup};

mod cell;
mod context;
mod exit_reason;
mod process_loop;
mod spawn_options;
mod status;
