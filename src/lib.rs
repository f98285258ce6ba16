//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

#![deny(
    clippy::all,
    clippy::else_if_without_else,
    clippy::empty_line_after_outer_attr,
    clippy::multiple_inherent_impl,
    clippy::mut_mut,
    clippy::path_buf_push_overwrite
)]
#![warn(
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::similar_names
)]
#![allow(clippy::multiple_crate_versions)]

//! A bounded retry executor.
//!
//! A [`RetryExecutor`] wraps a unit of [work] that may fail and invokes it again on
//! failure, up to a fixed number of attempts, sleeping a fixed delay between them.
//! It can run on the calling thread, on a tokio runtime, or in the background with
//! a completion callback and an optional [`WaitGroup`] to join several executors:
//!
//! ```no_run
//! use retrier::executor::{callback, RetryExecutor};
//! use retrier::wait_group::WaitGroup;
//!
//! let executor = RetryExecutor::create(Some(|| Err::<(), _>("unknown error")), 5, 500).unwrap();
//! let wg = WaitGroup::new();
//! executor
//!     .start(
//!         Some(&wg),
//!         Some(callback(|r: &RetryExecutor<_>| {
//!             println!("failed after {} attempts: {:?}", r.attempts(), r.last_error());
//!         })),
//!     )
//!     .unwrap();
//! wg.wait();
//! ```
//!
//! [`RetryExecutor`]: crate::executor::RetryExecutor
//! [work]: crate::work::Retryable
//! [`WaitGroup`]: crate::wait_group::WaitGroup
//!
pub mod error;
pub mod executor;
pub mod trace;
pub mod wait_group;
pub mod work;

pub use error::RetrierError;
pub use executor::{RetryExecutor, RunState};
pub use retrier_config::{RetryConfig, RetryConfigBuilder};
