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

use std::fmt;

/// Why a process terminated.
///
/// Only [`ExitReason::Normal`] counts as a normal exit. Every other reason is abnormal and
/// propagates across links to processes that do not trap exits.
///
/// String reasons convert with [`From`]: `"normal"`, `"shutdown"` and `"kill"`/`"killed"`
/// map to their variants and anything else becomes [`ExitReason::Custom`].
///
/// ```rust,ignore
/// assert_eq!(ExitReason::from("normal"), ExitReason::Normal);
/// assert_eq!(ExitReason::from("crash"), ExitReason::Custom("crash".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// The process finished its work.
    #[default]
    Normal,
    /// The process was stopped as part of a system or pool shutdown.
    Shutdown,
    /// The process was killed. A kill cannot be trapped by its target.
    Killed,
    /// A callback returned an error or panicked. Holds the rendered error.
    Crashed(String),
    /// An application-defined reason.
    Custom(String),
}

impl ExitReason {
    /// Returns `true` for [`ExitReason::Normal`].
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Returns `true` for every reason except [`ExitReason::Normal`].
    #[must_use]
    pub const fn is_abnormal(&self) -> bool {
        !self.is_normal()
    }

    /// Returns `true` when the process crashed.
    #[must_use]
    pub const fn is_crash(&self) -> bool {
        matches!(self, Self::Crashed(_))
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Shutdown => f.write_str("shutdown"),
            Self::Killed => f.write_str("killed"),
            Self::Crashed(error) => write!(f, "crashed: {error}"),
            Self::Custom(reason) => f.write_str(reason),
        }
    }
}

impl From<&str> for ExitReason {
    fn from(reason: &str) -> Self {
        match reason {
            "normal" => Self::Normal,
            "shutdown" => Self::Shutdown,
            "kill" | "killed" => Self::Killed,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ExitReason {
    fn from(reason: String) -> Self {
        Self::from(reason.as_str())
    }
}
