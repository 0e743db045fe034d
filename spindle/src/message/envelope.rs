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
use std::time::Instant;

use crate::common::Pid;
use crate::message::ReplyTo;
use crate::traits::Behavior;

/// The three kinds of mailbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A request whose caller waits for a reply.
    Call,
    /// A fire-and-forget request.
    Cast,
    /// An out-of-band notification.
    Info,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => f.write_str("call"),
            Self::Cast => f.write_str("cast"),
            Self::Info => f.write_str("info"),
        }
    }
}

/// A message sitting in a process mailbox, typed by the behavior that will handle it.
pub(crate) struct Envelope<B: Behavior> {
    pub(crate) sender: Option<Pid>,
    pub(crate) enqueued_at: Instant,
    pub(crate) payload: Payload<B>,
}

pub(crate) enum Payload<B: Behavior> {
    Call {
        request: B::Call,
        reply_to: ReplyTo<B::Reply>,
    },
    Cast(B::Cast),
    Info(B::Info),
}

impl<B: Behavior> Envelope<B> {
    pub(crate) fn new(sender: Option<Pid>, payload: Payload<B>) -> Self {
        Self {
            sender,
            enqueued_at: Instant::now(),
            payload,
        }
    }

    pub(crate) fn kind(&self) -> MessageKind {
        match self.payload {
            Payload::Call { .. } => MessageKind::Call,
            Payload::Cast(_) => MessageKind::Cast,
            Payload::Info(_) => MessageKind::Info,
        }
    }
}
