// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oq-engine: the offline action queue runtime
//!
//! [`OfflineQueue`] owns the queue and is its only writer to storage.
//! [`Dispatcher`] sweeps it through registered executors, and
//! [`ConnectivityMonitor`] triggers sweeps when the network comes back.

mod dispatcher;
mod error;
mod monitor;
mod offline;
mod registry;

pub use dispatcher::{Dispatcher, SweepReport};
pub use error::QueueError;
pub use monitor::{ConnectivityMonitor, MonitorConfig, MonitorHandle};
pub use offline::{OfflineQueue, QueueStatus, RetryOutcome};
pub use registry::ExecutorRegistry;
