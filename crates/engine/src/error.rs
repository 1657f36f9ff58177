// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the queue engine

use oq_storage::StorageError;
use thiserror::Error;

/// Errors surfaced to queue callers.
///
/// Executor failures never appear here: they are absorbed into the retry
/// counter of the affected action.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// The id generator kept producing ids that are already queued
    #[error("could not draw an unused action id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}
