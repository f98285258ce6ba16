//! Retry is a crate for retrying something that can fail a bounded number of times
//! with a fixed delay between the attempts.
//! It can be used as follows:
//! ```
//! # use retrier_retry::retry_policy::RetryWithFixedDelay;
//! # use retrier_retry::retry_sync::retry_sync;
//! # use std::time::Duration;
//! let retry_policy = RetryWithFixedDelay::default_setting()
//!     .max_attempts(2)
//!     .wait_duration(Duration::from_millis(1));
//! let mut collection = vec![1, 2].into_iter();
//! let value = retry_sync(retry_policy, |_| match collection.next() {
//!     Some(n) if n == 2 => Ok(n),
//!     _ => Err("not 2"),
//! }).unwrap();
//!
//! assert_eq!(value, 2);
//!
//! ```
//! The above will try the code at most 2 times, sleeping 1ms after the failed first try.
//! If every attempt fails, it will return Err(RetryError::Operation) holding the error of the last try.
//! A policy allowing zero attempts never runs the code and returns Err(RetryError::Internal).
//!

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

pub mod retry_async;
pub mod retry_policy;
pub mod retry_result;
pub mod retry_sync;
