// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action executors
//!
//! An executor delivers one action type's payload to its backend. Any error
//! it returns is treated as retryable by the dispatcher.

mod func;
mod http;

pub use func::FnExecutor;
pub use http::HttpExecutor;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeExecutor;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors from delivering a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend rejected action with status {code}")]
    Status { code: u16 },
    #[error("{0}")]
    Other(String),
}

/// Delivers an action payload to its backend
#[async_trait]
pub trait ActionExecutor: Send + Sync + 'static {
    async fn execute(&self, payload: &Value) -> Result<(), ExecutorError>;
}

#[async_trait]
impl<E: ActionExecutor + ?Sized> ActionExecutor for Arc<E> {
    async fn execute(&self, payload: &Value) -> Result<(), ExecutorError> {
        (**self).execute(payload).await
    }
}
