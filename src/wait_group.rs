//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// A counting barrier used to wait for a number of executors started in the background.
///
/// Every started executor adds one pending unit and marks it done once it has finished
/// and its callback has returned. `wait` blocks until the count drops back to zero.
/// Clones share the same counter.
#[derive(Clone, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    count: Mutex<usize>,
    zero: Condvar,
}

impl WaitGroup {
    pub fn new() -> WaitGroup {
        WaitGroup::default()
    }

    /// Registers `n` more pending units.
    pub fn add(&self, n: usize) {
        let mut count = self.inner.count.lock();
        *count += n;
    }

    /// Marks one pending unit as finished.
    ///
    /// # Panics
    ///
    /// Panics if there is no pending unit left.
    pub fn done(&self) {
        assert!(self.release(), "wait group counter went negative");
    }

    // Returns false, leaving the counter at zero, if nothing was pending.
    fn release(&self) -> bool {
        let mut count = self.inner.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        if *count == 0 {
            self.inner.zero.notify_all();
        }
        true
    }

    /// Number of units still pending.
    pub fn count(&self) -> usize {
        *self.inner.count.lock()
    }

    /// Blocks until every pending unit is finished.
    pub fn wait(&self) {
        let mut count = self.inner.count.lock();
        while *count > 0 {
            self.inner.zero.wait(&mut count);
        }
    }

    /// Like `wait`, but gives up after `timeout`. Returns true if the counter reached zero.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.inner.count.lock();
        while *count > 0 {
            if self.inner.zero.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }

    /// Registers one pending unit, released when the returned guard is dropped.
    pub(crate) fn enter(&self) -> WaitGroupGuard {
        self.add(1);
        WaitGroupGuard { group: self.clone() }
    }
}

/// Releases one pending unit of its wait group on drop, even during a panic.
/// Never panics itself: if a caller already released the unit with an extra
/// `done`, the counter stays at zero.
pub(crate) struct WaitGroupGuard {
    group: WaitGroup,
}

impl Drop for WaitGroupGuard {
    fn drop(&mut self) {
        if !self.group.release() {
            warn!("wait group was released before its executor finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_wait_without_pending_returns() {
        let wg = WaitGroup::new();
        wg.wait();
        assert!(wg.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn test_wait_for_threads() {
        let wg = WaitGroup::new();
        let finished = Arc::new(AtomicUsize::new(0));
        wg.add(3);
        for i in 0..3 {
            let wg = wg.clone();
            let finished = finished.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10 * i));
                finished.fetch_add(1, Ordering::SeqCst);
                wg.done();
            });
        }
        wg.wait();
        assert_eq!(finished.load(Ordering::SeqCst), 3);
        assert_eq!(wg.count(), 0);
    }

    #[test]
    fn test_wait_timeout_expires() {
        let wg = WaitGroup::new();
        wg.add(1);
        assert!(!wg.wait_timeout(Duration::from_millis(20)));
        wg.done();
        assert!(wg.wait_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let wg = WaitGroup::new();
        let guard = wg.enter();
        assert_eq!(wg.count(), 1);
        drop(guard);
        assert_eq!(wg.count(), 0);
    }

    #[test]
    fn test_guard_saturates_after_extra_done() {
        let wg = WaitGroup::new();
        let guard = wg.enter();
        wg.done();
        drop(guard);
        assert_eq!(wg.count(), 0);
        wg.wait();
    }

    #[test]
    #[should_panic(expected = "wait group counter went negative")]
    fn test_done_without_add_panics() {
        WaitGroup::new().done();
    }
}
