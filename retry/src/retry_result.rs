/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use std::fmt;
use std::time::Duration;

/// An error with a retryable operation.
#[derive(Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every allowed try of the operation failed.
    Operation {
        /// The error returned by the operation on the last try.
        error: E,
        /// The duration spent waiting between retries of the operation.
        total_delay: Duration,
        /// The total number of times the operation was tried.
        tries: u32,
    },
    /// The operation was never tried, the policy did not allow it.
    Internal(String),
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RetryError::Operation {
                error,
                total_delay,
                tries,
            } => write!(
                f,
                "operation failed after {} tries (waited {:?}): {}",
                tries, total_delay, error
            ),
            RetryError::Internal(msg) => write!(f, "retry not attempted: {}", msg),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}
