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

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::common::{ConflictPolicy, PoolStrategy};

/// Configuration for a Spindle process system.
///
/// Loaded from TOML in XDG-compliant directories by [`SpindleConfig::load`], or parsed from
/// an explicit document with [`SpindleConfig::from_toml_str`]. Every field has a default, so
/// a file only needs the values it changes:
///
/// ```toml
/// [timeouts]
/// call_timeout_ms = 2000
///
/// [defaults]
/// registry_conflict = "force"
/// ```
///
/// Each [`ProcessSystem`](crate::common::ProcessSystem) owns its own copy; there is no
/// global configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpindleConfig {
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Limits and capacity configuration
    pub limits: LimitsConfig,
    /// Default policies
    pub defaults: DefaultsConfig,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for `call` when the caller gives none, in milliseconds
    pub call_timeout_ms: u64,
    /// How long `stop` and `kill` wait for a process to terminate, in milliseconds
    pub process_stop_timeout_ms: u64,
    /// How long `shutdown_all` waits for every process, in milliseconds
    pub system_shutdown_timeout_ms: u64,
}

/// Limits and capacity configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Bounded mailbox size for new processes
    pub mailbox_capacity: usize,
    /// Pool size when none is given
    pub default_pool_size: usize,
}

/// Default policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// What registering a taken name does unless the registration says otherwise
    pub registry_conflict: ConflictPolicy,
    /// How pools pick members unless the pool says otherwise
    pub pool_strategy: PoolStrategy,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 5_000,
            process_stop_timeout_ms: 10_000,
            system_shutdown_timeout_ms: 30_000,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 255,
            default_pool_size: 4,
        }
    }
}

impl SpindleConfig {
    /// The default call timeout as a [`Duration`].
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.call_timeout_ms)
    }

    /// The per-process stop timeout as a [`Duration`].
    pub const fn process_stop_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.process_stop_timeout_ms)
    }

    /// The system shutdown timeout as a [`Duration`].
    pub const fn system_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.system_shutdown_timeout_ms)
    }

    /// Parses a TOML document. Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// The TOML parse error when the document is malformed or a value has the wrong type.
    pub fn from_toml_str(document: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(document)
    }

    /// Loads configuration from XDG-compliant locations.
    ///
    /// Looks for `spindle/config.toml` under `$XDG_CONFIG_HOME` (usually `~/.config`) and
    /// the XDG config dirs. A missing file yields the defaults; an unreadable or malformed
    /// file is logged and also yields the defaults.
    pub fn load() -> Self {
        let xdg_dirs = match xdg::BaseDirectories::with_prefix("spindle") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(document) => match Self::from_toml_str(&document) {
                Ok(config) => {
                    info!("Successfully loaded configuration");
                    config
                }
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
