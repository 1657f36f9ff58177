// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{FileStore, MemoryStore};
use chrono::{DateTime, Utc};
use oq_core::Priority;
use serde_json::json;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_767_225_600 + secs, 0).unwrap()
}

fn sample_actions() -> Vec<ActionEnvelope> {
    let retried: ActionEnvelope = serde_json::from_value(json!({
        "id": "a-2",
        "type": "PREFERENCES_UPDATE",
        "payload": {"theme": "dark"},
        "priority": "low",
        "retries": 2,
        "maxRetries": 5,
        "enqueuedAt": "2026-01-01T00:00:05Z",
        "sequence": 2
    }))
    .unwrap();
    vec![
        ActionEnvelope::new("a-1", "CONTACT_FORM_SUBMIT", json!({"name": "Test"}), at(0))
            .with_priority(Priority::High),
        retried,
    ]
}

#[test]
fn absent_record_loads_empty() {
    let store = QueueStore::new(MemoryStore::new());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_load_preserves_order_and_fields() {
    let store = QueueStore::new(MemoryStore::new());
    let actions = sample_actions();
    store.save(&actions).unwrap();
    assert_eq!(store.load().unwrap(), actions);
}

#[test]
fn record_lives_under_offline_queue_key() {
    let memory = MemoryStore::new();
    let store = QueueStore::new(memory.clone());
    store.save(&sample_actions()).unwrap();

    assert_eq!(store.key(), "offline_queue");
    assert!(memory.get(QUEUE_KEY).unwrap().is_some());
}

#[test]
fn record_survives_file_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let actions = sample_actions();
    QueueStore::new(FileStore::open(dir.path()).unwrap())
        .save(&actions)
        .unwrap();

    let reopened = QueueStore::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.load().unwrap(), actions);
}

#[test]
fn saving_empty_queue_loads_empty() {
    let store = QueueStore::new(MemoryStore::new());
    store.save(&sample_actions()).unwrap();
    store.save(&[]).unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn failed_save_keeps_previous_record() {
    let memory = MemoryStore::new();
    let store = QueueStore::new(memory.clone());
    let actions = sample_actions();
    store.save(&actions).unwrap();

    memory.fail_writes(true);
    assert!(store.save(&[]).is_err());
    assert_eq!(store.load().unwrap(), actions);
}

#[test]
fn tampered_body_is_corrupt() {
    let memory = MemoryStore::new();
    let store = QueueStore::new(memory.clone());
    store.save(&sample_actions()).unwrap();

    let bytes = memory.get(QUEUE_KEY).unwrap().unwrap();
    let tampered = String::from_utf8(bytes).unwrap().replace("Test", "Tost");
    memory.put(QUEUE_KEY, tampered.as_bytes()).unwrap();

    assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
}

#[test]
fn truncated_record_is_corrupt() {
    let memory = MemoryStore::new();
    let store = QueueStore::new(memory.clone());
    store.save(&sample_actions()).unwrap();

    let bytes = memory.get(QUEUE_KEY).unwrap().unwrap();
    memory.put(QUEUE_KEY, &bytes[..bytes.len() / 2]).unwrap();

    assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
}

#[test]
fn missing_header_is_corrupt() {
    let memory = MemoryStore::new();
    memory.put(QUEUE_KEY, b"[]").unwrap();
    let store = QueueStore::new(memory);
    assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
}

#[test]
fn count_mismatch_is_corrupt() {
    let body = b"[]";
    let header = format!(
        r#"{{"version":1,"checksum":{},"count":3}}"#,
        crc32fast::hash(body)
    );
    let memory = MemoryStore::new();
    memory
        .put(QUEUE_KEY, format!("{header}\n[]\n").as_bytes())
        .unwrap();

    let store = QueueStore::new(memory);
    assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
}

#[test]
fn future_version_is_rejected() {
    let memory = MemoryStore::new();
    memory
        .put(QUEUE_KEY, b"{\"version\":2,\"checksum\":0,\"count\":0}\n[]\n")
        .unwrap();

    let store = QueueStore::new(memory);
    assert!(matches!(
        store.load(),
        Err(StorageError::UnsupportedVersion {
            found: 2,
            expected: 1
        })
    ));
}

#[test]
fn custom_key_is_isolated() {
    let memory = MemoryStore::new();
    let a = QueueStore::with_key(memory.clone(), "queue_a");
    let b = QueueStore::with_key(memory, "queue_b");
    a.save(&sample_actions()).unwrap();
    assert!(b.load().unwrap().is_empty());
}
