//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

use crate::error::RetrierError;
use crate::wait_group::WaitGroup;
use crate::work::Retryable;
use retrier_config::{RetryConfig, RetryConfigBuilder};
use retrier_retry::retry_async::retry_async;
use retrier_retry::retry_result::RetryError;
use retrier_retry::retry_sync::retry_sync;
use std::any::Any;
use std::future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, info_span, Instrument};

static EXECUTOR_ID_GENERATOR: AtomicU64 = AtomicU64::new(0);

/// Invoked once with the finished executor after a background run.
pub type Callback<W> = Box<dyn FnOnce(&RetryExecutor<W>) + Send + 'static>;

/// Boxes a closure into a [`Callback`].
pub fn callback<W, F>(f: F) -> Callback<W>
where
    W: Retryable,
    F: FnOnce(&RetryExecutor<W>) + Send + 'static,
{
    Box::new(f)
}

/// Lifecycle of an executor. `Succeeded` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    Exhausted,
}

/// RetryExecutor wraps a unit of work and drives it through a bounded retry loop.
///
/// The work is invoked at most `max_attempts` times, sequentially, sleeping
/// `wait_duration` after every failed attempt except the last one. The loop stops
/// at the first success. Failures of the work are not errors of the executor:
/// the failure of the most recent attempt is kept and exposed by `last_error`.
///
/// ```
/// # use retrier::executor::{RetryExecutor, RunState};
/// let mut calls = 0;
/// let mut executor = RetryExecutor::create(
///     Some(move || {
///         calls += 1;
///         if calls < 3 { Err("not yet") } else { Ok(()) }
///     }),
///     5,
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(executor.run(), Ok(RunState::Succeeded));
/// assert_eq!(executor.attempts(), 3);
/// assert!(executor.last_error().is_none());
/// ```
pub struct RetryExecutor<W: Retryable> {
    id: u64,
    config: RetryConfig,
    attempts: u32,
    done: bool,
    last_error: Option<W::Error>,
    state: RunState,
    work: W,
}

impl<W: Retryable> RetryExecutor<W> {
    /// Creates an executor that tries `work` at most `max_attempts` times, waiting
    /// `wait_duration_ms` milliseconds after a failed attempt.
    ///
    /// Fails with `InvalidConfiguration` if `max_attempts` or `wait_duration_ms`
    /// is zero, or if no work is given.
    pub fn create(work: Option<W>, max_attempts: u32, wait_duration_ms: u64) -> Result<Self, RetrierError> {
        let config = RetryConfigBuilder::default()
            .max_attempts(max_attempts)
            .wait_duration_ms(wait_duration_ms)
            .build()
            .map_err(|e| RetrierError::InvalidConfiguration { msg: e.to_string() })?;
        let work = work.ok_or_else(|| RetrierError::InvalidConfiguration {
            msg: "work unit must not be empty".to_owned(),
        })?;
        Ok(RetryExecutor::with_config(work, config))
    }

    /// Creates an executor from a config built by `RetryConfigBuilder`, which is
    /// always valid.
    pub fn with_config(work: W, config: RetryConfig) -> Self {
        RetryExecutor {
            id: EXECUTOR_ID_GENERATOR.fetch_add(1, Ordering::SeqCst) + 1,
            config,
            attempts: 0,
            done: false,
            last_error: None,
            state: RunState::Idle,
            work,
        }
    }

    /// Runs the retry loop on the current thread, blocking through the waits.
    /// Returns the terminal state.
    pub fn run(&mut self) -> Result<RunState, RetrierError> {
        self.ensure_idle()?;
        Ok(self.run_loop())
    }

    /// Runs the retry loop on the current tokio runtime. The waits between attempts
    /// do not block the runtime, the work itself is still invoked synchronously.
    pub async fn run_async(&mut self) -> Result<RunState, RetrierError> {
        self.ensure_idle()?;
        self.state = RunState::Running;
        let span = info_span!("retry_executor", id = self.id, max_attempts = self.config.max_attempts());
        let policy = self.config.retry_policy();
        let attempts = &mut self.attempts;
        let work = &mut self.work;
        let result = retry_async(policy, |attempt| {
            *attempts = attempt;
            debug!("starting attempt {}", attempt);
            future::ready(work.exec())
        })
        .instrument(span.clone())
        .await;
        Ok(span.in_scope(|| self.finish(result)))
    }

    fn run_loop(&mut self) -> RunState {
        self.state = RunState::Running;
        let span = info_span!("retry_executor", id = self.id, max_attempts = self.config.max_attempts());
        let _enter = span.enter();
        let policy = self.config.retry_policy();
        let attempts = &mut self.attempts;
        let work = &mut self.work;
        let result = retry_sync(policy, |attempt| {
            *attempts = attempt;
            debug!("starting attempt {}", attempt);
            work.exec()
        });
        self.finish(result)
    }

    fn finish(&mut self, result: Result<(), RetryError<W::Error>>) -> RunState {
        match result {
            Ok(()) => {
                info!("work succeeded after {} attempts", self.attempts);
                self.done = true;
                self.last_error = None;
                self.state = RunState::Succeeded;
            }
            Err(RetryError::Operation {
                error,
                total_delay,
                tries,
            }) => {
                error!(
                    "work failed after {} attempts, waited {:?} in total",
                    tries, total_delay
                );
                self.last_error = Some(error);
                self.state = RunState::Exhausted;
            }
            Err(RetryError::Internal(msg)) => {
                error!("work was not run: {}", msg);
                self.state = RunState::Exhausted;
            }
        }
        self.state
    }

    fn ensure_idle(&self) -> Result<(), RetrierError> {
        if self.state == RunState::Idle {
            Ok(())
        } else {
            Err(RetrierError::AlreadyStarted { state: self.state })
        }
    }

    /// The error of the most recent attempt, `None` if it succeeded or nothing ran yet.
    pub fn last_error(&self) -> Option<&W::Error> {
        self.last_error.as_ref()
    }

    /// Number of times the work has been invoked.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether an attempt has succeeded.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Where the executor is in its lifecycle.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Total number of invocations allowed, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts()
    }

    /// Delay inserted after a failed attempt.
    pub fn wait_duration(&self) -> Duration {
        self.config.wait_duration()
    }

    /// The validated config the executor was built from.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl<W> RetryExecutor<W>
where
    W: Retryable + Send + 'static,
    W::Error: Send + 'static,
{
    /// Runs the retry loop on a new thread and returns without waiting for it.
    ///
    /// If a wait group is given, one pending unit is added to it before the thread is
    /// spawned and released after the loop and the callback have finished. The callback,
    /// if any, is invoked exactly once after the loop terminates.
    pub fn start(
        mut self,
        wait_group: Option<&WaitGroup>,
        callback: Option<Callback<W>>,
    ) -> Result<RetryHandle<W>, RetrierError> {
        self.ensure_idle()?;
        let guard = wait_group.map(WaitGroup::enter);
        let handle = thread::Builder::new()
            .name(format!("retrier-{}", self.id))
            .spawn(move || {
                // released last, after the callback returned
                let _guard = guard;
                self.run_loop();
                if let Some(callback) = callback {
                    callback(&self);
                }
                self
            })
            .map_err(|e| RetrierError::SpawnFailure { msg: e.to_string() })?;
        debug!("started retry executor in the background");
        Ok(RetryHandle { handle })
    }
}

/// Handle to an executor running in the background.
pub struct RetryHandle<W: Retryable> {
    handle: JoinHandle<RetryExecutor<W>>,
}

impl<W: Retryable> RetryHandle<W> {
    /// Waits for the run and its callback to finish and hands the executor back.
    pub fn join(self) -> Result<RetryExecutor<W>, RetrierError> {
        self.handle
            .join()
            .map_err(|e| RetrierError::JoinFailure { msg: panic_message(e) })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
