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

use crate::common::{Pid, PoolId, Registration};

/// Options applied when a process is spawned.
///
/// Everything here takes effect atomically with the process becoming visible: a name that
/// is already taken, or a link target that is gone, fails the spawn and the process never
/// shows up in the system.
///
/// ```rust,ignore
/// let options = SpawnOptions::new()
///     .name("cache")
///     .trap_exit(true)
///     .mailbox_capacity(1024);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    pub(crate) name: Option<String>,
    pub(crate) registration: Registration,
    pub(crate) trap_exit: bool,
    pub(crate) link: Option<Pid>,
    pub(crate) mailbox_capacity: Option<usize>,
    pub(crate) pool: Option<PoolId>,
}

impl SpawnOptions {
    /// Options with every default: no name, no link, exits not trapped and the configured
    /// mailbox capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the process under `name`.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Properties, tags and conflict policy for the name registration.
    #[must_use]
    pub fn registration(mut self, registration: Registration) -> Self {
        self.registration = registration;
        self
    }

    /// Starts the process with exit trapping on or off.
    #[must_use]
    pub const fn trap_exit(mut self, trap: bool) -> Self {
        self.trap_exit = trap;
        self
    }

    /// Links the new process to `pid`.
    #[must_use]
    pub const fn link(mut self, pid: Pid) -> Self {
        self.link = Some(pid);
        self
    }

    /// Overrides `limits.mailbox_capacity` for this process. Zero is treated as one.
    #[must_use]
    pub const fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub(crate) const fn pool(mut self, pool: PoolId) -> Self {
        self.pool = Some(pool);
        self
    }
}
