// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted queue record
//!
//! The whole queue lives under one key as two newline-terminated JSON lines:
//!
//! ```text
//! {"version":1,"checksum":2841232810,"count":2}
//! [{"id":"...","type":"...",...},{...}]
//! ```
//!
//! The header's CRC32 covers the exact bytes of the actions line, so a
//! truncated or hand-edited record is detected before it is trusted.

use crate::store::{KeyValueStore, StorageError};
use oq_core::ActionEnvelope;
use serde::{Deserialize, Serialize};

/// Key the queue record is stored under
pub const QUEUE_KEY: &str = "offline_queue";

/// Record layout version written by this build
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct RecordHeader {
    version: u32,
    checksum: u32,
    count: usize,
}

/// Reads and writes the queue record through a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct QueueStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> QueueStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, QUEUE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted actions in stored order; an absent record is empty
    pub fn load(&self) -> Result<Vec<ActionEnvelope>, StorageError> {
        match self.store.get(&self.key)? {
            Some(bytes) => self.decode(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the record with `actions`. Durable once this returns `Ok`.
    pub fn save(&self, actions: &[ActionEnvelope]) -> Result<(), StorageError> {
        let bytes = encode(actions)?;
        self.store.put(&self.key, &bytes)?;
        tracing::trace!(key = %self.key, count = actions.len(), bytes = bytes.len(), "queue record saved");
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<ActionEnvelope>, StorageError> {
        let Some(split) = bytes.iter().position(|b| *b == b'\n') else {
            return Err(self.corrupt("missing header line"));
        };
        let header: RecordHeader = serde_json::from_slice(&bytes[..split])
            .map_err(|e| self.corrupt(format!("unreadable header: {e}")))?;
        if header.version != RECORD_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: header.version,
                expected: RECORD_VERSION,
            });
        }

        let rest = &bytes[split + 1..];
        let body = rest.strip_suffix(b"\n").unwrap_or(rest);
        let checksum = crc32fast::hash(body);
        if checksum != header.checksum {
            return Err(self.corrupt(format!(
                "checksum mismatch (header {}, computed {checksum})",
                header.checksum
            )));
        }

        let actions: Vec<ActionEnvelope> = serde_json::from_slice(body)?;
        if actions.len() != header.count {
            return Err(self.corrupt(format!(
                "header count {} but {} actions stored",
                header.count,
                actions.len()
            )));
        }
        Ok(actions)
    }

    fn corrupt(&self, reason: impl Into<String>) -> StorageError {
        StorageError::Corrupt {
            key: self.key.clone(),
            reason: reason.into(),
        }
    }
}

fn encode(actions: &[ActionEnvelope]) -> Result<Vec<u8>, StorageError> {
    let body = serde_json::to_vec(actions)?;
    let header = RecordHeader {
        version: RECORD_VERSION,
        checksum: crc32fast::hash(&body),
        count: actions.len(),
    };
    let mut bytes = serde_json::to_vec(&header)?;
    bytes.push(b'\n');
    bytes.extend_from_slice(&body);
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
#[path = "queue_store_tests.rs"]
mod tests;
