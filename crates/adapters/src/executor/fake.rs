// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake executor for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ActionExecutor, ExecutorError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeState {
    /// Outcomes consumed one per call, before the fallback applies
    script: VecDeque<Result<(), ExecutorError>>,
    fallback: Option<ExecutorError>,
    delay: Option<Duration>,
    calls: Vec<Value>,
}

/// Fake executor with scripted outcomes that records every payload
#[derive(Clone, Default)]
pub struct FakeExecutor {
    state: Arc<Mutex<FakeState>>,
}

impl FakeExecutor {
    /// An executor that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor that always fails with a 503
    pub fn failing() -> Self {
        let fake = Self::default();
        fake.set_fallback(Some(ExecutorError::Status { code: 503 }));
        fake
    }

    /// Queue an outcome for the next unscripted call
    pub fn push_outcome(&self, outcome: Result<(), ExecutorError>) {
        self.lock().script.push_back(outcome);
    }

    /// Outcome once the script runs out: `None` succeeds
    pub fn set_fallback(&self, error: Option<ExecutorError>) {
        self.lock().fallback = error;
    }

    /// Hold every call for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    /// Payloads received, in call order
    pub fn calls(&self) -> Vec<Value> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ActionExecutor for FakeExecutor {
    async fn execute(&self, payload: &Value) -> Result<(), ExecutorError> {
        let (outcome, delay) = {
            let mut state = self.lock();
            state.calls.push(payload.clone());
            let outcome = match state.script.pop_front() {
                Some(outcome) => outcome,
                None => match &state.fallback {
                    Some(error) => Err(error.clone()),
                    None => Ok(()),
                },
            };
            (outcome, state.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
