// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oq-storage: Durable storage for the offline action queue
//!
//! A byte-oriented [`KeyValueStore`] abstraction with file and in-memory
//! backends, and [`QueueStore`], which keeps the whole queue as a single
//! checksummed record.

mod file;
mod memory;
mod queue_store;
mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use queue_store::{QueueStore, QUEUE_KEY, RECORD_VERSION};
pub use store::{KeyValueStore, StorageError};
