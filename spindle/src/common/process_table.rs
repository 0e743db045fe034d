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

//! The process table: live processes, the registry, pool memberships and the link/monitor
//! graph, all behind one lock so a terminating process disappears from every one of them at
//! once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::common::pool::{PoolMembership, PoolStrategy};
use crate::common::registry::{ConflictPolicy, Registry};
use crate::common::{MonitorRef, Pid, PoolId, Target};
use crate::message::{ProcessError, SystemSignal};
use crate::process::{ExitReason, ProcessCell, ProcessStatus, SpawnOptions};

#[derive(Debug)]
struct ProcessEntry {
    cell: Arc<ProcessCell>,
    links: HashSet<Pid>,
    /// Monitors watching this process.
    monitored_by: HashSet<MonitorRef>,
    /// Monitors this process holds on others.
    monitoring: HashSet<MonitorRef>,
    pools: HashSet<PoolId>,
}

impl ProcessEntry {
    fn new(cell: Arc<ProcessCell>) -> Self {
        Self {
            cell,
            links: HashSet::new(),
            monitored_by: HashSet::new(),
            monitoring: HashSet::new(),
            pools: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MonitorRecord {
    observer: Pid,
    target: Pid,
}

/// A signal to deliver once the table lock is released.
#[derive(Debug)]
pub(crate) struct Notice {
    pub(crate) to: Arc<ProcessCell>,
    pub(crate) signal: SystemSignal,
}

impl Notice {
    pub(crate) fn deliver(self) {
        if !self.to.signal(self.signal) {
            trace!(to = %self.to.pid(), "recipient already gone, dropping signal");
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ProcessTable {
    processes: HashMap<Pid, ProcessEntry>,
    registry: Registry,
    pools: HashMap<PoolId, PoolMembership>,
    monitors: HashMap<MonitorRef, MonitorRecord>,
}

impl ProcessTable {
    pub(crate) fn len(&self) -> usize {
        self.processes.len()
    }

    pub(crate) fn pids(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.processes.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    pub(crate) fn cells(&self) -> Vec<Arc<ProcessCell>> {
        self.processes
            .values()
            .map(|entry| Arc::clone(&entry.cell))
            .collect()
    }

    /// The cell for `pid` whatever its status, while it is still in the table.
    pub(crate) fn cell(&self, pid: Pid) -> Option<&Arc<ProcessCell>> {
        self.processes.get(&pid).map(|entry| &entry.cell)
    }

    /// The cell for `pid` if the process still accepts messages.
    pub(crate) fn live(&self, pid: Pid) -> Result<&Arc<ProcessCell>, ProcessError> {
        self.cell(pid)
            .filter(|cell| cell.is_alive())
            .ok_or(ProcessError::ProcessNotFound(Target::Pid(pid)))
    }

    pub(crate) fn resolve(&self, target: &Target) -> Result<&Arc<ProcessCell>, ProcessError> {
        let pid = match target {
            Target::Pid(pid) => Some(*pid),
            Target::Name(name) => self.registry.whereis(name),
        };
        pid.and_then(|pid| self.live(pid).ok())
            .ok_or_else(|| ProcessError::ProcessNotFound(target.clone()))
    }

    pub(crate) const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Makes a freshly initialised process visible, applying its name, link and pool
    /// membership. Nothing changes if any of them fails, including a pool that has been
    /// dissolved.
    pub(crate) fn admit(
        &mut self,
        cell: Arc<ProcessCell>,
        options: &SpawnOptions,
        default_policy: ConflictPolicy,
    ) -> Result<(), ProcessError> {
        let pid = cell.pid();
        if let Some(name) = &options.name {
            let policy = options.registration.policy.unwrap_or(default_policy);
            self.registry.check(name, pid, policy)?;
        }
        if let Some(peer) = options.link {
            self.live(peer)?;
        }
        if options.pool.is_some_and(|pool| !self.pools.contains_key(&pool)) {
            return Err(ProcessError::PoolClosed);
        }

        self.processes.insert(pid, ProcessEntry::new(cell));
        if let Some(name) = &options.name {
            self.registry
                .insert(name, pid, &options.registration, default_policy)?;
        }
        if let Some(peer) = options.link {
            self.add_link(pid, peer);
        }
        if let Some(pool) = options.pool {
            self.join_pool(pool, pid);
        }
        Ok(())
    }

    pub(crate) fn register(
        &mut self,
        key: &str,
        pid: Pid,
        registration: &crate::common::Registration,
        default_policy: ConflictPolicy,
    ) -> Result<(), ProcessError> {
        self.live(pid)?;
        self.registry.insert(key, pid, registration, default_policy)
    }

    pub(crate) fn unregister(&mut self, key: &str) -> Option<crate::common::RegistryEntry> {
        self.registry.remove(key)
    }

    pub(crate) fn link(&mut self, a: Pid, b: Pid) -> Result<(), ProcessError> {
        self.live(a)?;
        self.live(b)?;
        if a != b {
            self.add_link(a, b);
        }
        Ok(())
    }

    fn add_link(&mut self, a: Pid, b: Pid) {
        if let Some(entry) = self.processes.get_mut(&a) {
            entry.links.insert(b);
        }
        if let Some(entry) = self.processes.get_mut(&b) {
            entry.links.insert(a);
        }
        trace!(%a, %b, "linked");
    }

    pub(crate) fn unlink(&mut self, a: Pid, b: Pid) -> bool {
        let mut removed = false;
        if let Some(entry) = self.processes.get_mut(&a) {
            removed |= entry.links.remove(&b);
        }
        if let Some(entry) = self.processes.get_mut(&b) {
            removed |= entry.links.remove(&a);
        }
        removed
    }

    pub(crate) fn links_of(&self, pid: Pid) -> Vec<Pid> {
        self.processes
            .get(&pid)
            .map(|entry| entry.links.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Records that `observer` monitors `target`; returns the monitored pid.
    pub(crate) fn monitor(
        &mut self,
        monitor: MonitorRef,
        observer: Pid,
        target: &Target,
    ) -> Result<Pid, ProcessError> {
        self.live(observer)?;
        let target = self.resolve(target)?.pid();

        self.monitors.insert(monitor, MonitorRecord { observer, target });
        if let Some(entry) = self.processes.get_mut(&observer) {
            entry.monitoring.insert(monitor);
        }
        if let Some(entry) = self.processes.get_mut(&target) {
            entry.monitored_by.insert(monitor);
        }
        Ok(target)
    }

    pub(crate) fn demonitor(&mut self, monitor: MonitorRef) -> bool {
        let Some(record) = self.monitors.remove(&monitor) else {
            return false;
        };
        if let Some(entry) = self.processes.get_mut(&record.observer) {
            entry.monitoring.remove(&monitor);
        }
        if let Some(entry) = self.processes.get_mut(&record.target) {
            entry.monitored_by.remove(&monitor);
        }
        true
    }

    pub(crate) fn create_pool(&mut self, pool: PoolId, strategy: PoolStrategy) {
        self.pools.insert(pool, PoolMembership::new(strategy));
    }

    #[cfg(test)]
    pub(crate) fn pool_count(&self) -> usize {
        self.pools.len()
    }

    fn join_pool(&mut self, pool: PoolId, pid: Pid) {
        let Some(membership) = self.pools.get_mut(&pool) else {
            return;
        };
        membership.push(pid);
        if let Some(entry) = self.processes.get_mut(&pid) {
            entry.pools.insert(pool);
        }
    }

    pub(crate) fn pool_mut(&mut self, pool: PoolId) -> Option<&mut PoolMembership> {
        self.pools.get_mut(&pool)
    }

    pub(crate) fn pool(&self, pool: PoolId) -> Option<&PoolMembership> {
        self.pools.get(&pool)
    }

    /// Removes members beyond `len` from the pool and returns them, last first.
    pub(crate) fn shrink_pool(&mut self, pool: PoolId, len: usize) -> Vec<Pid> {
        let Some(membership) = self.pools.get_mut(&pool) else {
            return Vec::new();
        };
        let removed = membership.truncate(len);
        for pid in &removed {
            if let Some(entry) = self.processes.get_mut(pid) {
                entry.pools.remove(&pool);
            }
        }
        removed
    }

    /// Deletes the pool record and returns its members.
    pub(crate) fn drop_pool(&mut self, pool: PoolId) -> Vec<Pid> {
        let Some(membership) = self.pools.remove(&pool) else {
            return Vec::new();
        };
        let members = membership.members().to_vec();
        for pid in &members {
            if let Some(entry) = self.processes.get_mut(pid) {
                entry.pools.remove(&pool);
            }
        }
        members
    }

    /// Removes a terminated process from every structure and returns the exit and down
    /// signals its links and monitors are owed.
    pub(crate) fn remove(&mut self, pid: Pid, reason: &ExitReason) -> Vec<Notice> {
        let Some(entry) = self.processes.remove(&pid) else {
            return Vec::new();
        };
        entry.cell.advance(ProcessStatus::Terminated);

        let names = self.registry.remove_pid(pid);
        for pool in &entry.pools {
            if let Some(membership) = self.pools.get_mut(pool) {
                membership.remove(pid);
            }
        }

        let mut notices = Vec::new();
        for peer in &entry.links {
            if let Some(peer_entry) = self.processes.get_mut(peer) {
                peer_entry.links.remove(&pid);
                notices.push(Notice {
                    to: Arc::clone(&peer_entry.cell),
                    signal: SystemSignal::Exit {
                        from: pid,
                        reason: reason.clone(),
                    },
                });
            }
        }

        for monitor in &entry.monitored_by {
            let Some(record) = self.monitors.remove(monitor) else {
                continue;
            };
            if let Some(observer) = self.processes.get_mut(&record.observer) {
                observer.monitoring.remove(monitor);
                notices.push(Notice {
                    to: Arc::clone(&observer.cell),
                    signal: SystemSignal::Down {
                        monitor: *monitor,
                        pid,
                        reason: reason.clone(),
                    },
                });
            }
        }

        for monitor in &entry.monitoring {
            if let Some(record) = self.monitors.remove(monitor) {
                if let Some(target) = self.processes.get_mut(&record.target) {
                    target.monitored_by.remove(monitor);
                }
            }
        }

        trace!(
            %pid,
            names,
            notices = notices.len(),
            "removed process from the table"
        );
        notices
    }
}
