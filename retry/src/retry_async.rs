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
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry the given operation asynchronously until it succeeds,
/// or until the policy runs out of attempts.
/// It can be used as follows:
/// let retry_policy = RetryWithFixedDelay::default_setting();
/// let future = retry_async(retry_policy, |attempt| async move {
///     if attempt < 2 {
///         Err("retry")
///     } else {
///         Ok(attempt)
///     }
/// });
pub async fn retry_async<F, T, E>(
    retry_policy: RetryWithFixedDelay,
    mut operation: impl FnMut(u32) -> F,
) -> Result<T, RetryError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    let mut current_try = 0;
    let mut total_delay = Duration::default();
    loop {
        if retry_policy.is_exhausted(current_try) {
            return Err(RetryError::Internal(format!(
                "policy allows {} attempts",
                retry_policy.get_max_attempts()
            )));
        }
        current_try += 1;
        let result: Result<T, E> = operation(current_try).await;

        match result {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!("attempt {} of {} failed", current_try, retry_policy.get_max_attempts());
                if let Some(delay) = retry_policy.delay_after(current_try) {
                    debug!("sleeping {:?} before the next check", delay);
                    sleep(delay).await;
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
    use super::retry_async;
    use super::RetryError;
    use snafu::Snafu;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    #[derive(Debug, PartialEq, Eq, Snafu)]
    pub enum SnafuError {
        #[snafu(display("Retryable error"))]
        Retryable,
    }

    #[test]
    fn attempts_just_once() {
        let runtime = Runtime::new().unwrap();
        let retry_policy = RetryWithFixedDelay::default_setting().max_attempts(1);
        let future = retry_async(retry_policy, |_| async { Err::<(), _>(SnafuError::Retryable) });
        let res = runtime.block_on(future);
        assert_eq!(
            res,
            Err(RetryError::Operation {
                error: SnafuError::Retryable,
                tries: 1,
                total_delay: Duration::from_millis(0),
            })
        );
    }

    #[test]
    fn attempts_until_success() {
        let runtime = Runtime::new().unwrap();
        let retry_policy = RetryWithFixedDelay::default_setting()
            .max_attempts(5)
            .wait_duration(Duration::from_millis(1));
        let mut counter = 0;

        let future = retry_async(retry_policy, |_| {
            let previous = counter;
            counter += 1;
            async move {
                if previous < 3 {
                    Err(SnafuError::Retryable)
                } else {
                    Ok(previous)
                }
            }
        });
        let res = runtime.block_on(future);
        assert_eq!(res, Ok(3));
        assert_eq!(counter, 4);
    }

    #[test]
    fn zero_attempts_never_runs_operation() {
        let runtime = Runtime::new().unwrap();
        let retry_policy = RetryWithFixedDelay::default_setting().max_attempts(0);
        let mut counter = 0;
        let future = retry_async(retry_policy, |_| {
            counter += 1;
            async { Err::<(), _>(SnafuError::Retryable) }
        });
        let res = runtime.block_on(future);
        assert_eq!(res, Err(RetryError::Internal("policy allows 0 attempts".to_owned())));
        assert_eq!(counter, 0);
    }
}
