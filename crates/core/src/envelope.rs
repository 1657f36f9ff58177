// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action envelope: the durable unit of queued work
//!
//! An envelope is immutable once enqueued. The only field that changes while
//! it sits in the queue is the retry counter, and only the queue itself may
//! bump it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Retry ceiling applied when an enqueue does not name one
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delivery priority tier.
///
/// Variant order is the queue order: `High` sorts first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority '{0}' (expected high, normal or low)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// Per-enqueue overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnqueueOptions {
    pub priority: Option<Priority>,
    pub max_retries: Option<u32>,
}

impl EnqueueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn priority(self, priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..self
        }
    }

    pub fn max_retries(self, max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
            ..self
        }
    }
}

/// A queued action.
///
/// Serialized field names follow the persisted record layout
/// (`type`, `maxRetries`, `enqueuedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEnvelope {
    id: String,
    #[serde(rename = "type")]
    action_type: String,
    payload: serde_json::Value,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    retries: u32,
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    enqueued_at: DateTime<Utc>,
    /// Insertion counter assigned by the queue; breaks `enqueued_at` ties
    #[serde(default)]
    sequence: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ActionEnvelope {
    /// Create a normal-priority envelope with the default retry ceiling
    pub fn new(
        id: impl Into<String>,
        action_type: impl Into<String>,
        payload: serde_json::Value,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            action_type: action_type.into(),
            payload,
            priority: Priority::Normal,
            retries: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            enqueued_at,
            sequence: 0,
        }
    }

    pub fn with_priority(self, priority: Priority) -> Self {
        Self { priority, ..self }
    }

    pub fn with_max_retries(self, max_retries: u32) -> Self {
        Self {
            max_retries,
            ..self
        }
    }

    /// Apply enqueue options, falling back to `default_max_retries`
    pub fn with_options(self, options: EnqueueOptions, default_max_retries: u32) -> Self {
        Self {
            priority: options.priority.unwrap_or(self.priority),
            max_retries: options.max_retries.unwrap_or(default_max_retries),
            ..self
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Queue ordering key: priority tier, then age, then insertion order
    pub(crate) fn order_key(&self) -> (Priority, DateTime<Utc>, u64) {
        (self.priority, self.enqueued_at, self.sequence)
    }

    /// Age key used for capacity eviction (priority is ignored)
    pub(crate) fn age_key(&self) -> (DateTime<Utc>, u64) {
        (self.enqueued_at, self.sequence)
    }

    pub(crate) fn with_sequence(self, sequence: u64) -> Self {
        Self { sequence, ..self }
    }

    pub(crate) fn with_incremented_retries(&self) -> Self {
        Self {
            retries: self.retries.saturating_add(1),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
