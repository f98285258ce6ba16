/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use retrier::executor::{callback, RetryExecutor};
use retrier::wait_group::WaitGroup;
use retrier::work::Retryable;
use retrier::{trace, RetrierError};
use snafu::Snafu;
use structopt::StructOpt;
use tracing::{info, Level};

#[derive(StructOpt, Debug)]
#[structopt(name = "retrier", about = "Runs two titled tasks through retry executors.")]
struct Opt {
    /// Title of the first task.
    #[structopt(long, default_value = "BBB")]
    title: String,
    /// Maximum attempts of the first task.
    #[structopt(long, default_value = "3")]
    max_attempts: u32,
    /// Milliseconds to wait after a failed attempt of the first task.
    #[structopt(long, default_value = "1000")]
    wait_ms: u64,
    /// Title of the second task.
    #[structopt(long, default_value = "AAA")]
    second_title: String,
    /// Maximum attempts of the second task.
    #[structopt(long, default_value = "5")]
    second_max_attempts: u32,
    /// Milliseconds to wait after a failed attempt of the second task.
    #[structopt(long, default_value = "500")]
    second_wait_ms: u64,
    /// A task with this title always fails.
    #[structopt(long, default_value = "AAA")]
    bad_title: String,
    /// Log at debug level.
    #[structopt(short, long)]
    verbose: bool,
}

#[derive(Debug, Snafu)]
enum TaskError {
    #[snafu(display("Unknown error: title should not be {}", title))]
    BadTitle { title: String },
}

struct TitledTask {
    title: String,
    bad_title: String,
}

impl Retryable for TitledTask {
    type Error = TaskError;

    fn exec(&mut self) -> Result<(), TaskError> {
        if self.title == self.bad_title {
            return Err(TaskError::BadTitle {
                title: self.title.clone(),
            });
        }
        info!("my title: {}", self.title);
        Ok(())
    }
}

fn report(name: &'static str) -> retrier::executor::Callback<TitledTask> {
    callback(move |r: &RetryExecutor<TitledTask>| match r.last_error() {
        Some(e) => println!("{} failed after {} attempts: {}", name, r.attempts(), e),
        None => println!("{} done successfully after {} attempts", name, r.attempts()),
    })
}

fn main() -> Result<(), RetrierError> {
    let opt = Opt::from_args();
    trace::init(if opt.verbose { Level::DEBUG } else { Level::INFO });

    let first = RetryExecutor::create(
        Some(TitledTask {
            title: opt.title,
            bad_title: opt.bad_title.clone(),
        }),
        opt.max_attempts,
        opt.wait_ms,
    )?;
    let second = RetryExecutor::create(
        Some(TitledTask {
            title: opt.second_title,
            bad_title: opt.bad_title,
        }),
        opt.second_max_attempts,
        opt.second_wait_ms,
    )?;

    let wg = WaitGroup::new();
    let first = first.start(Some(&wg), Some(report("first task")))?;
    let second = second.start(Some(&wg), Some(report("second task")))?;
    wg.wait();
    first.join()?;
    second.join()?;
    Ok(())
}
