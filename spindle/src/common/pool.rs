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

//! Process pools: several processes running one behavior, addressed as a unit.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::common::{Pid, PoolId, ProcessSystem, Target};
use crate::message::ProcessError;
use crate::process::{ExitReason, SpawnOptions};
use crate::traits::Behavior;

/// How a pool picks the member for the next call or cast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStrategy {
    /// Members in order, wrapping around.
    #[default]
    RoundRobin,
    /// A uniformly random member.
    Random,
}

/// Options for [`ProcessSystem::spawn_pool_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolOptions {
    pub(crate) size: Option<usize>,
    pub(crate) strategy: Option<PoolStrategy>,
}

impl PoolOptions {
    /// `limits.default_pool_size` members picked with `defaults.pool_strategy`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the pool with `size` members.
    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Picks members with `strategy`.
    #[must_use]
    pub const fn strategy(mut self, strategy: PoolStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

/// Membership and cursor of one pool, stored in the process table.
#[derive(Debug)]
pub(crate) struct PoolMembership {
    members: Vec<Pid>,
    cursor: usize,
    strategy: PoolStrategy,
}

impl PoolMembership {
    pub(crate) const fn new(strategy: PoolStrategy) -> Self {
        Self {
            members: Vec::new(),
            cursor: 0,
            strategy,
        }
    }

    pub(crate) fn members(&self) -> &[Pid] {
        &self.members
    }

    pub(crate) fn push(&mut self, pid: Pid) {
        self.members.push(pid);
    }

    /// The member for the next dispatch; advances the cursor.
    pub(crate) fn select(&mut self) -> Option<Pid> {
        if self.members.is_empty() {
            return None;
        }
        let index = match self.strategy {
            PoolStrategy::RoundRobin => {
                let index = self.cursor % self.members.len();
                self.cursor = (index + 1) % self.members.len();
                index
            }
            PoolStrategy::Random => rand::rng().random_range(0..self.members.len()),
        };
        Some(self.members[index])
    }

    pub(crate) fn remove(&mut self, pid: Pid) -> bool {
        let Some(position) = self.members.iter().position(|member| *member == pid) else {
            return false;
        };
        self.members.remove(position);
        if position < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.members.len() {
            self.cursor = 0;
        }
        true
    }

    /// Keeps the first `len` members and returns the rest, last first.
    pub(crate) fn truncate(&mut self, len: usize) -> Vec<Pid> {
        if len >= self.members.len() {
            return Vec::new();
        }
        let mut removed = self.members.split_off(len);
        removed.reverse();
        if self.cursor >= self.members.len() {
            self.cursor = 0;
        }
        removed
    }
}

struct PoolShared<B: Behavior> {
    id: PoolId,
    system: ProcessSystem,
    behavior: Arc<B>,
    args: Mutex<B::Args>,
    resize_lock: tokio::sync::Mutex<()>,
}

/// A group of processes running one behavior, dispatched to by round robin or at random.
///
/// Clones share the pool. Members that terminate, for any reason, leave the membership
/// automatically; [`Pool::resize`] tops it back up. Dropping the last clone without
/// [`Pool::shutdown`] dissolves the membership but leaves the members running as ordinary
/// processes.
///
/// ```rust,ignore
/// let pool = system.spawn_pool(Echo, (), 3).await?;
/// let reply = pool.call(EchoCall::WhoAreYou).await?;
/// pool.resize(5).await?;
/// ```
pub struct Pool<B: Behavior> {
    shared: Arc<PoolShared<B>>,
}

impl<B: Behavior> Drop for PoolShared<B> {
    fn drop(&mut self) {
        let members = self.system.inner().table.write().drop_pool(self.id);
        if !members.is_empty() {
            debug!(members = members.len(), "pool dropped without shutdown");
        }
    }
}

impl<B: Behavior> Clone for Pool<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: Behavior> fmt::Debug for Pool<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("behavior", &std::any::type_name::<B>())
            .field("members", &self.members())
            .finish()
    }
}

impl<B> Pool<B>
where
    B: Behavior,
    B::Args: Clone,
{
    pub(crate) async fn start(
        system: ProcessSystem,
        behavior: Arc<B>,
        args: B::Args,
        options: PoolOptions,
    ) -> Result<Self, ProcessError> {
        let config = system.config();
        let size = options.size.unwrap_or(config.limits.default_pool_size);
        let strategy = options.strategy.unwrap_or(config.defaults.pool_strategy);
        let id = system.inner().ids.next_pool();
        system.inner().table.write().create_pool(id, strategy);

        let pool = Self {
            shared: Arc::new(PoolShared {
                id,
                system,
                behavior,
                args: Mutex::new(args),
                resize_lock: tokio::sync::Mutex::new(()),
            }),
        };
        if let Err(error) = pool.grow(size).await {
            pool.shutdown().await;
            return Err(error);
        }
        debug!(size, ?strategy, "pool started");
        Ok(pool)
    }

    async fn grow(&self, count: usize) -> Result<(), ProcessError> {
        for _ in 0..count {
            let args = self.shared.args.lock().clone();
            self.shared
                .system
                .spawn_shared(
                    Arc::clone(&self.shared.behavior),
                    args,
                    SpawnOptions::new().pool(self.shared.id),
                )
                .await?;
        }
        Ok(())
    }

    /// Grows or shrinks the pool to `size` members.
    ///
    /// Growing spawns new members from the pool's behavior and arguments. Shrinking takes
    /// the trailing members out of rotation first, then stops them with
    /// [`ExitReason::Shutdown`]. Concurrent resizes are serialised.
    ///
    /// # Errors
    ///
    /// [`ProcessError::PoolClosed`] after [`Pool::shutdown`], otherwise the first spawn
    /// failure while growing.
    #[instrument(skip(self))]
    pub async fn resize(&self, size: usize) -> Result<(), ProcessError> {
        let _guard = self.shared.resize_lock.lock().await;
        let current = self
            .shared
            .system
            .inner()
            .table
            .read()
            .pool(self.shared.id)
            .map(|membership| membership.members().len())
            .ok_or(ProcessError::PoolClosed)?;
        if size > current {
            self.grow(size - current).await?;
        } else if size < current {
            let removed = self
                .shared
                .system
                .inner()
                .table
                .write()
                .shrink_pool(self.shared.id, size);
            for pid in removed {
                self.stop_member(pid).await;
            }
        }
        trace!(from = current, to = size, "pool resized");
        Ok(())
    }

    async fn stop_member(&self, pid: Pid) {
        match self.shared.system.stop(pid, ExitReason::Shutdown).await {
            Ok(()) | Err(ProcessError::ProcessNotFound(_)) => {}
            Err(error) => warn!(%pid, %error, "failed to stop pool member"),
        }
    }
}

impl<B: Behavior> Pool<B> {
    /// The current members, in dispatch order.
    #[must_use]
    pub fn members(&self) -> Vec<Pid> {
        self.shared
            .system
            .inner()
            .table
            .read()
            .pool(self.shared.id)
            .map(|membership| membership.members().to_vec())
            .unwrap_or_default()
    }

    /// How many members the pool has.
    #[must_use]
    pub fn size(&self) -> usize {
        self.shared
            .system
            .inner()
            .table
            .read()
            .pool(self.shared.id)
            .map_or(0, |membership| membership.members().len())
    }

    fn next_member(&self) -> Result<Pid, ProcessError> {
        self.shared
            .system
            .inner()
            .table
            .write()
            .pool_mut(self.shared.id)
            .and_then(PoolMembership::select)
            .ok_or(ProcessError::PoolEmpty)
    }

    /// Calls the next member with the configured default timeout.
    ///
    /// # Errors
    ///
    /// [`ProcessError::PoolEmpty`], or any failure of the underlying call.
    pub async fn call(&self, request: B::Call) -> Result<B::Reply, ProcessError> {
        let timeout = self.shared.system.config().call_timeout();
        self.call_timeout(request, timeout).await
    }

    /// Calls the next member, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::PoolEmpty`], or any failure of the underlying call.
    pub async fn call_timeout(
        &self,
        request: B::Call,
        timeout: Duration,
    ) -> Result<B::Reply, ProcessError> {
        let pid = self.next_member()?;
        self.shared
            .system
            .call_timeout::<B>(pid, request, timeout)
            .await
    }

    /// Casts to the next member.
    ///
    /// # Errors
    ///
    /// [`ProcessError::PoolEmpty`], or any failure of the underlying cast.
    pub async fn cast(&self, message: B::Cast) -> Result<(), ProcessError> {
        let pid = self.next_member()?;
        self.shared.system.cast::<B>(pid, message).await
    }

    /// Casts `message` to every member, ignoring the cursor. Returns how many members
    /// accepted it.
    pub async fn broadcast(&self, message: B::Cast) -> usize
    where
        B::Cast: Clone,
    {
        let mut delivered = 0;
        for pid in self.members() {
            match self
                .shared
                .system
                .cast::<B>(Target::Pid(pid), message.clone())
                .await
            {
                Ok(()) => delivered += 1,
                Err(error) => trace!(%pid, %error, "broadcast skipped member"),
            }
        }
        delivered
    }

    /// Stops every member with [`ExitReason::Shutdown`] and dissolves the pool. Later
    /// dispatches fail with [`ProcessError::PoolEmpty`] and resizes with
    /// [`ProcessError::PoolClosed`].
    pub async fn shutdown(&self) {
        let _guard = self.shared.resize_lock.lock().await;
        let members = self
            .shared
            .system
            .inner()
            .table
            .write()
            .drop_pool(self.shared.id);
        for pid in members {
            match self.shared.system.stop(pid, ExitReason::Shutdown).await {
                Ok(()) | Err(ProcessError::ProcessNotFound(_)) => {}
                Err(error) => warn!(%pid, %error, "failed to stop pool member"),
            }
        }
        debug!("pool shut down");
    }
}
