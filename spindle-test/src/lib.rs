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

//! Test support for Spindle processes.
//!
//! The [`spindle_test`](prelude::spindle_test) attribute turns an `async fn` returning a
//! `Result` into a `#[test]` that runs on a multi-threaded Tokio runtime. Any panic raised
//! while the test runs, including panics inside spawned process tasks, fails the test with
//! the panic location, so tests that *intend* to crash a process should use `#[tokio::test]`.
//!
//! The crate using the attribute must depend on `tokio`, `tracing` and `parking_lot`.

/// Re-exports the test attribute.
pub mod prelude {
    pub use spindle_test_macro::spindle_test;
}
