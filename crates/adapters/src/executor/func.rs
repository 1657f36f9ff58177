// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closure-backed executor

use super::{ActionExecutor, ExecutorError};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

/// Executor that delegates to an async closure
pub struct FnExecutor<F> {
    f: F,
}

impl<F, Fut> FnExecutor<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ExecutorError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ActionExecutor for FnExecutor<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ExecutorError>> + Send + 'static,
{
    async fn execute(&self, payload: &Value) -> Result<(), ExecutorError> {
        (self.f)(payload.clone()).await
    }
}

#[cfg(test)]
#[path = "func_tests.rs"]
mod tests;
