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

use std::time::{Duration, Instant};

use spindle::prelude::*;
use spindle_test::prelude::*;

use crate::setup::behaviors::{Echo, Sleeper, Watcher};
use crate::setup::messages::{EchoCall, EchoReply, Nap, WatcherCall};
use crate::setup::{initialize_tracing, test_system};

mod setup;

#[spindle_test]
async fn slow_handlers_time_out_the_caller() -> anyhow::Result<()> {
    initialize_tracing();
    let system = test_system();
    let sleeper = system.spawn(Sleeper, ()).await?;

    let started = Instant::now();
    let error = sleeper
        .call_timeout(Nap(Duration::from_millis(100)), Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(
        error,
        ProcessError::CallTimeout {
            pid: sleeper.pid(),
            timeout: Duration::from_millis(10),
        }
    );
    assert!(error.is_timeout());

    // The target keeps running and its late reply is discarded.
    assert!(sleeper.is_alive());
    assert_eq!(sleeper.call(Nap(Duration::ZERO)).await?, 2);

    system.shutdown_all().await?;
    Ok(())
}

#[spindle_test]
async fn the_configured_call_timeout_applies_by_default() -> anyhow::Result<()> {
    initialize_tracing();
    let mut config = SpindleConfig::default();
    config.timeouts.call_timeout_ms = 30;
    let system = SpindleApp::launch_with_config(config);
    let sleeper = system.spawn(Sleeper, ()).await?;

    let error = sleeper
        .call(Nap(Duration::from_millis(300)))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        ProcessError::CallTimeout {
            pid: sleeper.pid(),
            timeout: Duration::from_millis(30),
        }
    );

    system.shutdown_all().await?;
    Ok(())
}

#[spindle_test]
async fn unknown_targets_are_not_found() -> anyhow::Result<()> {
    initialize_tracing();
    let system = test_system();

    let error = system
        .call::<Echo>("ghost", EchoCall::WhoAreYou)
        .await
        .unwrap_err();
    assert_eq!(error, ProcessError::ProcessNotFound(Target::from("ghost")));

    let error = system
        .cast::<Echo>("ghost", "hello".to_string())
        .await
        .unwrap_err();
    assert!(error.is_not_found());
    Ok(())
}

#[spindle_test]
async fn calls_resolve_names_through_the_registry() -> anyhow::Result<()> {
    initialize_tracing();
    let system = test_system();
    let echo = system.spawn(Echo, ()).await?;
    system.register("echo", echo.pid())?;

    let reply = system
        .call::<Echo>("echo", EchoCall::Echo("hi".to_string()))
        .await?;
    assert_eq!(
        reply,
        EchoReply {
            pid: Some(echo.pid()),
            caller: None,
            text: "hi".to_string(),
            notes: 0,
        }
    );

    system.shutdown_all().await?;
    Ok(())
}

#[spindle_test]
async fn calls_from_a_process_carry_its_pid() -> anyhow::Result<()> {
    initialize_tracing();
    let system = test_system();
    let echo = system.spawn(Echo, ()).await?;
    let watcher = system.spawn(Watcher, ()).await?;

    let seen = watcher.call(WatcherCall::Relay(echo.pid())).await?;
    assert_eq!(seen, vec![watcher.pid().to_string()]);

    system.shutdown_all().await?;
    Ok(())
}

#[spindle_test]
async fn info_messages_reach_handle_info() -> anyhow::Result<()> {
    initialize_tracing();
    let system = test_system();
    let watcher = system.spawn(Watcher, ()).await?;

    watcher.send_info("first".to_string()).await?;
    system
        .send_info::<Watcher>(watcher.pid(), "second".to_string())
        .await?;

    let events = watcher.call(WatcherCall::Events).await?;
    assert_eq!(events, vec!["info first", "info second"]);

    system.shutdown_all().await?;
    Ok(())
}
