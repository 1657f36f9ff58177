// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oq-core: Core library for the offline action queue
//!
//! This crate provides:
//! - The action envelope data model
//! - A pure, ordered queue state machine with capacity eviction
//! - Clock and ID generation abstractions
//! - The sync notifier for terminal delivery outcomes
//! - TOML configuration

pub mod clock;
pub mod config;
pub mod envelope;
pub mod id;
pub mod notifier;
pub mod queue;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    Config, ConfigError, ConnectivityConfig, ExecutorConfig, HttpMethod, QueueConfig,
};
pub use envelope::{
    ActionEnvelope, EnqueueOptions, ParsePriorityError, Priority, DEFAULT_MAX_RETRIES,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use notifier::{SyncCallback, SyncNotifier, SyncSubscription};
pub use queue::{ActionQueue, QueueChange, QueueEvent, DEFAULT_MAX_QUEUE_SIZE};
