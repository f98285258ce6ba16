/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use std::time::Duration;

/// The retry policy that can retry something a bounded number of times
/// with a constant delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryWithFixedDelay {
    max_attempts: u32,
    wait_duration: Duration,
    trailing_wait: bool,
}

impl RetryWithFixedDelay {
    /// Constructs a new fixed delay strategy using default setting:
    /// 3 attempts, 1 second apart.
    pub fn default_setting() -> RetryWithFixedDelay {
        RetryWithFixedDelay {
            max_attempts: 3,
            wait_duration: Duration::from_millis(1000),
            trailing_wait: false,
        }
    }

    /// Apply the total number of attempts, the first one included.
    pub fn max_attempts(mut self, max_attempts: u32) -> RetryWithFixedDelay {
        self.max_attempts = max_attempts;
        self
    }

    /// Apply the delay that follows every failed attempt.
    pub fn wait_duration(mut self, wait_duration: Duration) -> RetryWithFixedDelay {
        self.wait_duration = wait_duration;
        self
    }

    /// Also wait after the attempt that exhausts the policy.
    pub fn trailing_wait(mut self, trailing_wait: bool) -> RetryWithFixedDelay {
        self.trailing_wait = trailing_wait;
        self
    }

    pub fn get_max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn get_wait_duration(&self) -> Duration {
        self.wait_duration
    }

    pub fn has_trailing_wait(&self) -> bool {
        self.trailing_wait
    }

    /// Whether no further attempt is allowed once `attempt` attempts were made.
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }

    /// The delay to sleep after the given failed attempt, if any.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if !self.is_exhausted(attempt) || self.trailing_wait {
            Some(self.wait_duration)
        } else {
            None
        }
    }
}

impl Default for RetryWithFixedDelay {
    fn default() -> Self {
        RetryWithFixedDelay::default_setting()
    }
}

#[test]
fn test_uses_default_setting() {
    let s = RetryWithFixedDelay::default();

    assert_eq!(s.get_max_attempts(), 3);
    assert_eq!(s.get_wait_duration(), Duration::from_millis(1000));
    assert!(!s.has_trailing_wait());
}
