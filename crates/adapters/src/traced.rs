// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced executor wrapper for consistent observability

use crate::executor::{ActionExecutor, ExecutorError};
use async_trait::async_trait;
use serde_json::Value;
use tracing::Instrument;

/// Wrapper that adds tracing to any ActionExecutor
#[derive(Clone)]
pub struct TracedExecutor<E> {
    inner: E,
    action_type: String,
}

impl<E> TracedExecutor<E> {
    pub fn new(action_type: impl Into<String>, inner: E) -> Self {
        Self {
            inner,
            action_type: action_type.into(),
        }
    }
}

#[async_trait]
impl<E: ActionExecutor> ActionExecutor for TracedExecutor<E> {
    async fn execute(&self, payload: &Value) -> Result<(), ExecutorError> {
        let span = tracing::info_span!("executor.execute", action_type = %self.action_type);

        async {
            tracing::debug!(payload_bytes = payload.to_string().len(), "delivering");

            let start = std::time::Instant::now();
            let result = self.inner.execute(payload).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "delivered"),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "delivery failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
