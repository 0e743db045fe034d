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
#![allow(unused)]

use std::time::Duration;

use spindle::prelude::*;

#[spindle_message]
pub enum CounterCall {
    Add(i64),
    Get,
    /// Handler returns an error.
    Fail,
    /// Replies with the current value, then stops normally.
    Finish,
}

#[spindle_message]
pub enum CounterCast {
    Add(i64),
    Fail,
}

#[spindle_message]
pub enum KvCall {
    Set(String, String),
    Get(String),
    Delete(String),
}

#[spindle_message]
#[derive(Default, PartialEq, Eq)]
pub enum KvReply {
    #[default]
    Ok,
    Value(Option<String>),
}

#[spindle_message]
pub enum KvCast {
    Set(String, String),
}

#[spindle_message]
pub enum EchoCall {
    WhoAreYou,
    Echo(String),
    Notes,
}

#[spindle_message]
#[derive(Default, PartialEq, Eq)]
pub struct EchoReply {
    /// The pid of the process that answered.
    pub pid: Option<Pid>,
    /// The pid stamped on the request, if the caller was a process.
    pub caller: Option<Pid>,
    pub text: String,
    pub notes: usize,
}

/// Sleep for the given duration before replying.
#[spindle_message]
pub struct Nap(pub Duration);

#[spindle_message]
pub enum CrasherMode {
    Healthy,
    FailInit,
    PanicInit,
}

#[spindle_message]
pub enum CrasherCall {
    Ping,
    Fail,
    Panic,
    /// Sleep, then fail.
    FailAfter(Duration),
}

#[spindle_message]
pub enum WatcherCall {
    /// Everything `handle_info` has seen so far.
    Events,
    /// Monitor the pid from inside the process.
    Monitor(Pid),
    /// Call an echo process and record who it saw as the caller.
    Relay(Pid),
}

#[spindle_message]
pub enum LatchCall {
    /// Parked until a `Release`.
    Wait,
    /// How many callers are parked.
    Waiting,
}

#[spindle_message]
pub enum LatchCast {
    Release(String),
    /// Stop with the given reason, leaving parked callers unanswered.
    Stop(String),
}

#[spindle_message]
pub enum TallyCall {
    Bump,
    Total,
}
