// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor registry keyed by action type

use oq_adapters::ActionExecutor;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Maps action types to executors. Clones share the same registrations.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    executors: Arc<RwLock<HashMap<String, Arc<dyn ActionExecutor>>>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `executor` for `action_type`, replacing any previous one
    pub fn register<E: ActionExecutor>(&self, action_type: impl Into<String>, executor: E) {
        self.register_arc(action_type, Arc::new(executor));
    }

    pub fn register_arc(&self, action_type: impl Into<String>, executor: Arc<dyn ActionExecutor>) {
        let action_type = action_type.into();
        tracing::debug!(%action_type, "executor registered");
        self.executors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(action_type, executor);
    }

    /// Returns false if nothing was registered for `action_type`
    pub fn unregister(&self, action_type: &str) -> bool {
        self.executors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(action_type)
            .is_some()
    }

    pub fn get(&self, action_type: &str) -> Option<Arc<dyn ActionExecutor>> {
        self.executors
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(action_type)
            .cloned()
    }

    /// Registered action types, sorted
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .executors
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        types.sort();
        types
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("types", &self.types())
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
