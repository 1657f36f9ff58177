// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP executor: sends the payload as a JSON request body

use super::{ActionExecutor, ExecutorError};
use async_trait::async_trait;
use oq_core::{ExecutorConfig, HttpMethod};
use serde_json::Value;
use std::time::Duration;

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers payloads to a fixed URL. Any 2xx response is success.
#[derive(Clone)]
pub struct HttpExecutor {
    agent: ureq::Agent,
    url: String,
    method: HttpMethod,
    headers: Vec<(String, String)>,
}

impl HttpExecutor {
    pub fn new(url: impl Into<String>, method: HttpMethod, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
            method,
            headers: Vec::new(),
        }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        let mut executor = Self::new(
            config.url.clone(),
            config.method,
            config.timeout.unwrap_or(DEFAULT_TIMEOUT),
        );
        for (name, value) in &config.headers {
            executor = executor.with_header(name.clone(), value.clone());
        }
        executor
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Blocking send; run on the blocking pool
    fn send(&self, body: String) -> Result<(), ExecutorError> {
        let mut request = match self.method {
            HttpMethod::Post => self.agent.post(&self.url),
            HttpMethod::Put => self.agent.put(&self.url),
            HttpMethod::Patch => self.agent.patch(&self.url),
        }
        .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send(body)
            .map_err(|e| ExecutorError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ExecutorError::Status {
                code: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl ActionExecutor for HttpExecutor {
    async fn execute(&self, payload: &Value) -> Result<(), ExecutorError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ExecutorError::Other(format!("failed to encode payload: {e}")))?;
        let executor = self.clone();
        tokio::task::spawn_blocking(move || executor.send(body))
            .await
            .map_err(|e| ExecutorError::Other(format!("request task failed: {e}")))?
    }
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
