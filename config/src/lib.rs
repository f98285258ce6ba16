//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
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

use derive_builder::*;
use getset::CopyGetters;
use retrier_retry::retry_policy::RetryWithFixedDelay;
use std::env;
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS_ENV: &str = "retrier_max_attempts";
const WAIT_DURATION_MS_ENV: &str = "retrier_wait_duration_ms";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_WAIT_DURATION_MS: u64 = 1000;

/// Settings of a retry executor. Only `RetryConfigBuilder` can create one, so every
/// config has at least one attempt and waits at least 1ms.
///
/// ```compile_fail
/// # use retrier_config::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig {
///     max_attempts: 0,
///     wait_duration: Duration::from_millis(0),
///     trailing_wait: false,
/// };
/// ```
#[derive(Builder, Debug, CopyGetters, Clone, PartialEq, Eq)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RetryConfig {
    /// Total number of invocations allowed, the first one included.
    #[get_copy = "pub"]
    #[builder(default = "self.default_max_attempts()")]
    max_attempts: u32,

    /// Delay inserted after a failed attempt.
    #[get_copy = "pub"]
    #[builder(default = "self.default_wait_duration()")]
    wait_duration: Duration,

    /// Whether to also wait after the attempt that exhausts `max_attempts`.
    #[get_copy = "pub"]
    #[builder(default = "false")]
    trailing_wait: bool,
}

impl RetryConfig {
    /// The retry policy the retry loops are driven by.
    pub fn retry_policy(&self) -> RetryWithFixedDelay {
        RetryWithFixedDelay::default_setting()
            .max_attempts(self.max_attempts)
            .wait_duration(self.wait_duration)
            .trailing_wait(self.trailing_wait)
    }
}

impl RetryConfigBuilder {
    /// Shorthand for setting the wait duration in milliseconds.
    pub fn wait_duration_ms(&mut self, millis: u64) -> &mut Self {
        self.wait_duration = Some(Duration::from_millis(millis));
        self
    }

    fn default_max_attempts(&self) -> u32 {
        read_env(MAX_ATTEMPTS_ENV).unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn default_wait_duration(&self) -> Duration {
        Duration::from_millis(read_env(WAIT_DURATION_MS_ENV).unwrap_or(DEFAULT_WAIT_DURATION_MS))
    }

    /// validate the builder before returning it
    ///
    /// only explicitly set values are checked here, the env defaults
    /// are already guaranteed to be in range.
    fn validate(&self) -> Result<(), String> {
        if let Some(max_attempts) = self.max_attempts {
            if max_attempts < 1 {
                return Err(format!("max_attempts must be > 0, got {}", max_attempts));
            }
        }
        if let Some(wait_duration) = self.wait_duration {
            if wait_duration < Duration::from_millis(1) {
                return Err(format!("wait_duration must be >= 1ms, got {:?}", wait_duration));
            }
        }
        Ok(())
    }
}

// Zero is rejected the same way an unparsable value is.
fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialEq + From<u8>,
{
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::from(0) => Some(value),
        _ => {
            warn!("ignoring invalid value {:?} for {}", raw, key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_set() {
        let config = RetryConfigBuilder::default()
            .max_attempts(5u32)
            .wait_duration(Duration::from_millis(500))
            .trailing_wait(true)
            .build()
            .unwrap();

        assert_eq!(config.max_attempts(), 5);
        assert_eq!(config.wait_duration(), Duration::from_millis(500));
        assert!(config.trailing_wait());
        assert_eq!(
            config.retry_policy(),
            RetryWithFixedDelay::default_setting()
                .max_attempts(5)
                .wait_duration(Duration::from_millis(500))
                .trailing_wait(true)
        );
    }

    #[test]
    #[serial]
    fn test_get_default() {
        let config = RetryConfigBuilder::default().build().unwrap();

        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.wait_duration(), Duration::from_millis(1000));
        assert!(!config.trailing_wait());
        assert_eq!(config.retry_policy(), RetryWithFixedDelay::default_setting());
    }

    #[test]
    #[serial]
    fn test_rejects_out_of_range() {
        let res = RetryConfigBuilder::default().max_attempts(0u32).build();
        assert!(res.is_err());

        let res = RetryConfigBuilder::default().wait_duration_ms(0).build();
        assert!(res.is_err());

        let res = RetryConfigBuilder::default()
            .wait_duration(Duration::from_micros(999))
            .build();
        assert!(res.is_err());
    }

    #[test]
    #[serial]
    fn test_extract_from_env() {
        env::set_var(MAX_ATTEMPTS_ENV, "7");
        env::set_var(WAIT_DURATION_MS_ENV, "25");
        let config = RetryConfigBuilder::default().build().unwrap();
        assert_eq!(config.max_attempts(), 7);
        assert_eq!(config.wait_duration(), Duration::from_millis(25));

        // explicit values take priority over env
        let config = RetryConfigBuilder::default().max_attempts(2u32).build().unwrap();
        assert_eq!(config.max_attempts(), 2);

        // invalid env values fall back to the defaults
        env::set_var(MAX_ATTEMPTS_ENV, "0");
        env::set_var(WAIT_DURATION_MS_ENV, "soon");
        let config = RetryConfigBuilder::default().build().unwrap();
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.wait_duration(), Duration::from_millis(DEFAULT_WAIT_DURATION_MS));

        env::remove_var(MAX_ATTEMPTS_ENV);
        env::remove_var(WAIT_DURATION_MS_ENV);
    }
}
