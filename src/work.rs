//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

/// A unit of work that can be retried.
///
/// Every closure returning `Result<(), E>` is `Retryable`, so most callers never
/// implement this by hand:
/// ```
/// # use retrier::work::Retryable;
/// let mut calls = 0;
/// let mut work = || {
///     calls += 1;
///     if calls < 2 { Err("not yet") } else { Ok(()) }
/// };
/// assert_eq!(work.exec(), Err("not yet"));
/// assert_eq!(work.exec(), Ok(()));
/// ```
pub trait Retryable {
    type Error;

    /// Runs the work once.
    fn exec(&mut self) -> Result<(), Self::Error>;
}

impl<F, E> Retryable for F
where
    F: FnMut() -> Result<(), E>,
{
    type Error = E;

    fn exec(&mut self) -> Result<(), E> {
        self()
    }
}
