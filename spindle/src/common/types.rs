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

//! Identifier types shared across the runtime.
//!
//! Every identifier is a thin wrapper over a `u64` drawn from a per-system counter that starts
//! at 1 and only grows, so an identifier is never handed out twice by the same
//! [`ProcessSystem`](crate::common::ProcessSystem).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The identity of a process.
///
/// Displayed in the familiar `<0.N.0>` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(u64);

impl Pid {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The numeric value behind this pid.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<0.{}.0>", self.0)
    }
}

/// A handle on one monitor, returned by `monitor` and accepted by `demonitor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorRef(u64);

impl MonitorRef {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MonitorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#Ref<{}>", self.0)
    }
}

/// Correlates a call with its single reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(u64);

impl CorrelationId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one pool inside the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PoolId(u64);

impl PoolId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Where a message is addressed: a pid or a registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A process addressed by identity.
    Pid(Pid),
    /// A process addressed through the registry.
    Name(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pid(pid) => write!(f, "{pid}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl From<Pid> for Target {
    fn from(pid: Pid) -> Self {
        Self::Pid(pid)
    }
}

impl From<&Pid> for Target {
    fn from(pid: &Pid) -> Self {
        Self::Pid(*pid)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Target {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

/// Monotonic counters handing out the identifiers above.
#[derive(Debug)]
pub(crate) struct IdCounters {
    pids: AtomicU64,
    monitors: AtomicU64,
    correlations: AtomicU64,
    pools: AtomicU64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            pids: AtomicU64::new(1),
            monitors: AtomicU64::new(1),
            correlations: AtomicU64::new(1),
            pools: AtomicU64::new(1),
        }
    }
}

impl IdCounters {
    pub(crate) fn next_pid(&self) -> Pid {
        Pid::new(self.pids.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn next_monitor(&self) -> MonitorRef {
        MonitorRef::new(self.monitors.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn next_correlation(&self) -> CorrelationId {
        CorrelationId::new(self.correlations.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn next_pool(&self) -> PoolId {
        PoolId::new(self.pools.fetch_add(1, Ordering::Relaxed))
    }
}
