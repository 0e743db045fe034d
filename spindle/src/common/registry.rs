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

//! The name registry: a directory from names to pids with properties and tags.
//!
//! The registry lives inside the process table, so registering a name, spawning under a name
//! and removing a terminated process's names all happen under the same lock as the table
//! itself.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::common::Pid;
use crate::message::ProcessError;

/// What happens when a name is already bound to another process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Refuse with [`ProcessError::DuplicateRegistration`].
    #[default]
    Strict,
    /// Rebind the name to the new process.
    Force,
}

/// One name binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The registered name.
    pub key: String,
    /// The process it points to.
    pub pid: Pid,
    /// Free-form string properties.
    pub properties: BTreeMap<String, String>,
    /// Free-form tags.
    pub tags: BTreeSet<String>,
    /// When the binding was made.
    pub registered_at: SystemTime,
}

impl RegistryEntry {
    /// Whether the entry carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// The value of property `key`, if set.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Describes a registration: properties, tags and how to treat a name that is taken.
///
/// ```rust,ignore
/// let registration = Registration::new()
///     .property("region", "eu")
///     .tag("cache")
///     .force();
/// system.register_with("cache", pid, registration)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub(crate) properties: BTreeMap<String, String>,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) policy: Option<ConflictPolicy>,
}

impl Registration {
    /// A registration with no properties or tags that follows the configured conflict policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Overwrites an existing binding held by another process.
    #[must_use]
    pub const fn force(mut self) -> Self {
        self.policy = Some(ConflictPolicy::Force);
        self
    }

    /// Fails if another process holds the name, whatever the configuration says.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.policy = Some(ConflictPolicy::Strict);
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: HashMap<String, RegistryEntry>,
    by_pid: HashMap<Pid, BTreeSet<String>>,
}

impl Registry {
    /// Fails if `key` is bound to a process other than `pid` and `policy` is strict.
    pub(crate) fn check(
        &self,
        key: &str,
        pid: Pid,
        policy: ConflictPolicy,
    ) -> Result<(), ProcessError> {
        match self.entries.get(key) {
            Some(existing) if existing.pid != pid && policy == ConflictPolicy::Strict => {
                Err(ProcessError::DuplicateRegistration {
                    key: key.to_string(),
                    existing: existing.pid,
                })
            }
            _ => Ok(()),
        }
    }

    /// Binds `key` to `pid`. Re-registering a name to the process that already holds it
    /// replaces its properties and tags.
    pub(crate) fn insert(
        &mut self,
        key: &str,
        pid: Pid,
        registration: &Registration,
        default_policy: ConflictPolicy,
    ) -> Result<(), ProcessError> {
        let policy = registration.policy.unwrap_or(default_policy);
        self.check(key, pid, policy)?;

        if let Some(previous) = self.remove(key) {
            if previous.pid != pid {
                trace!(key, from = %previous.pid, to = %pid, "rebinding name");
            }
        }

        let entry = RegistryEntry {
            key: key.to_string(),
            pid,
            properties: registration.properties.clone(),
            tags: registration.tags.clone(),
            registered_at: SystemTime::now(),
        };
        self.entries.insert(key.to_string(), entry);
        self.by_pid.entry(pid).or_default().insert(key.to_string());
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<RegistryEntry> {
        let entry = self.entries.remove(key)?;
        if let Some(names) = self.by_pid.get_mut(&entry.pid) {
            names.remove(key);
            if names.is_empty() {
                self.by_pid.remove(&entry.pid);
            }
        }
        Some(entry)
    }

    /// Drops every name bound to `pid`.
    pub(crate) fn remove_pid(&mut self, pid: Pid) -> usize {
        let Some(names) = self.by_pid.remove(&pid) else {
            return 0;
        };
        for name in &names {
            self.entries.remove(name);
        }
        names.len()
    }

    pub(crate) fn whereis(&self, key: &str) -> Option<Pid> {
        self.entries.get(key).map(|entry| entry.pid)
    }

    pub(crate) fn entry(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    pub(crate) fn names_of(&self, pid: Pid) -> Vec<String> {
        self.by_pid
            .get(&pid)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn query(&self, predicate: impl Fn(&RegistryEntry) -> bool) -> Vec<RegistryEntry> {
        let mut matches: Vec<RegistryEntry> = self
            .entries
            .values()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.key.cmp(&b.key));
        matches
    }
}
