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

use tracing::{error, trace};

use crate::common::{ProcessSystem, SpindleConfig};

/// The entry point for launching a [`ProcessSystem`].
///
/// Every launch creates a new, isolated system:
/// - [`SpindleApp::launch_async()`] loads configuration on Tokio's blocking pool; preferred
///   inside async code.
/// - [`SpindleApp::launch()`] loads configuration on the calling thread.
/// - [`SpindleApp::launch_with_config()`] skips loading and uses the given configuration.
#[derive(Default, Debug, Clone)]
pub struct SpindleApp;

impl SpindleApp {
    /// Launches a system with configuration loaded from XDG locations, reading the file on
    /// Tokio's blocking pool.
    ///
    /// ```rust,ignore
    /// use spindle::prelude::*;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let system = SpindleApp::launch_async().await;
    ///     // spawn processes...
    ///     system.shutdown_all().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn launch_async() -> ProcessSystem {
        let config = match tokio::task::spawn_blocking(SpindleConfig::load).await {
            Ok(config) => config,
            Err(e) => {
                error!("Configuration loading task failed: {}", e);
                SpindleConfig::default()
            }
        };
        Self::launch_with_config(config)
    }

    /// Launches a system with configuration loaded from XDG locations.
    ///
    /// Does blocking file IO, so prefer [`SpindleApp::launch_async`] inside async code.
    #[must_use]
    pub fn launch() -> ProcessSystem {
        Self::launch_with_config(SpindleConfig::load())
    }

    /// Launches a system with `config`.
    #[must_use]
    pub fn launch_with_config(config: SpindleConfig) -> ProcessSystem {
        trace!("Launching process system: {:?}", config);
        ProcessSystem::new(config)
    }
}
