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

//! Message types: what travels through mailboxes and signal channels, what handlers return,
//! and the errors callers see.

pub(crate) use envelope::{Envelope, Payload};
pub use envelope::MessageKind;
pub use info::Info;
pub use outcome::{CallOutcome, HandleOutcome};
pub use process_error::ProcessError;
pub use reply_to::ReplyTo;
pub(crate) use signal::SystemSignal;

mod envelope;
mod info;
mod outcome;
mod process_error;
mod reply_to;
mod signal;
