/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use super::retry_policy::RetryWithFixedDelay;
use super::retry_result::RetryError;
use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry the given operation synchronously until it succeeds, or until the policy
/// runs out of attempts. The operation receives the 1-based number of the current attempt.
/// It can be used as follows:
/// let retry_policy = RetryWithFixedDelay::default_setting().max_attempts(3);
/// let mut collection = vec![1, 2].into_iter();
/// let res = retry_sync(retry_policy, |_| match collection.next() {
///     Some(n) if n == 2 => Ok(n),
///     _ => Err("not 2"),
/// });
pub fn retry_sync<O, T, E>(retry_policy: RetryWithFixedDelay, mut operation: O) -> Result<T, RetryError<E>>
where
    O: FnMut(u32) -> Result<T, E>,
{
    let mut current_try = 0;
    let mut total_delay = Duration::default();
    // Must use return(for early return).
    loop {
        if retry_policy.is_exhausted(current_try) {
            return Err(RetryError::Internal(format!(
                "policy allows {} attempts",
                retry_policy.get_max_attempts()
            )));
        }
        current_try += 1;
        match operation(current_try) {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!("attempt {} of {} failed", current_try, retry_policy.get_max_attempts());
                if let Some(delay) = retry_policy.delay_after(current_try) {
                    debug!("sleeping {:?} before the next check", delay);
                    sleep(delay);
                    total_delay += delay;
                }
                if retry_policy.is_exhausted(current_try) {
                    return Err(RetryError::Operation {
                        error,
                        total_delay,
                        tries: current_try,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::retry_policy::RetryWithFixedDelay;
    use super::retry_sync;
    use super::RetryError;
    use snafu::Snafu;
    use std::time::{Duration, Instant};

    #[derive(Debug, PartialEq, Eq, Snafu)]
    pub enum SnafuError {
        #[snafu(display("Retryable error"))]
        Retryable,
    }

    fn fast_policy(max_attempts: u32) -> RetryWithFixedDelay {
        RetryWithFixedDelay::default_setting()
            .max_attempts(max_attempts)
            .wait_duration(Duration::from_millis(1))
    }

    #[test]
    fn test_succeeds_on_first_try() {
        let mut calls = 0;
        let value = retry_sync(fast_policy(3), |_| {
            calls += 1;
            Ok::<_, &str>(10)
        })
        .unwrap();
        assert_eq!(value, 10);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_succeeds_on_last_allowed_try() {
        let mut collection = vec![1, 2, 3].into_iter();
        let value = retry_sync(fast_policy(3), |_| match collection.next() {
            Some(n) if n == 3 => Ok(n),
            _ => Err("not 3"),
        })
        .unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_fails_after_last_try() {
        let res: Result<(), _> = retry_sync(fast_policy(2), |_| Err(SnafuError::Retryable));

        assert_eq!(
            res,
            Err(RetryError::Operation {
                error: SnafuError::Retryable,
                tries: 2,
                total_delay: Duration::from_millis(1),
            })
        );
    }

    #[test]
    fn test_keeps_error_of_last_try() {
        let res: Result<(), _> = retry_sync(fast_policy(4), |attempt| Err(attempt * 10));
        match res {
            Err(RetryError::Operation { error, tries, .. }) => {
                assert_eq!(error, 40);
                assert_eq!(tries, 4);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_trailing_wait_is_counted() {
        let policy = fast_policy(2).trailing_wait(true);
        let res: Result<(), _> = retry_sync(policy, |_| Err("retry"));
        assert!(matches!(
            res,
            Err(RetryError::Operation { total_delay, .. }) if total_delay == Duration::from_millis(2)
        ));
    }

    #[test]
    fn test_zero_attempts_never_runs_operation() {
        let mut calls = 0;
        let res: Result<(), _> = retry_sync(fast_policy(0), |_| {
            calls += 1;
            Err("retry")
        });
        assert!(matches!(res, Err(RetryError::Internal(_))));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_waits_between_failed_attempts() {
        let policy = RetryWithFixedDelay::default_setting()
            .max_attempts(3)
            .wait_duration(Duration::from_millis(50));
        let start = Instant::now();
        let res: Result<(), _> = retry_sync(policy, |_| Err("retry"));
        assert!(res.is_err());
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
