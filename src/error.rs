//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

use crate::executor::RunState;
use snafu::Snafu;

/// Errors raised by the executor itself. Failures of the wrapped work are not
/// errors of the executor, they are kept as the executor's last error instead.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum RetrierError {
    #[snafu(display("Invalid configuration: {}", msg))]
    InvalidConfiguration { msg: String },

    #[snafu(display("Executor already started, current state is {:?}", state))]
    AlreadyStarted { state: RunState },

    #[snafu(display("Could not spawn the retry thread: {}", msg))]
    SpawnFailure { msg: String },

    #[snafu(display("Retry thread panicked: {}", msg))]
    JoinFailure { msg: String },
}
