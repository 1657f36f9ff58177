// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn put_get_delete() {
    let store = MemoryStore::new();
    assert!(store.is_empty());

    store.put("k", b"v").unwrap();
    assert_eq!(store.get("k").unwrap().unwrap(), b"v");
    assert_eq!(store.len(), 1);

    store.delete("k").unwrap();
    assert!(store.get("k").unwrap().is_none());
}

#[test]
fn clones_share_entries() {
    let store = MemoryStore::new();
    let handle = store.clone();
    store.put("k", b"v").unwrap();
    assert_eq!(handle.get("k").unwrap().unwrap(), b"v");
}

#[test]
fn failed_writes_leave_contents_untouched() {
    let store = MemoryStore::new();
    store.put("k", b"old").unwrap();
    store.fail_writes(true);

    assert!(matches!(
        store.put("k", b"new"),
        Err(StorageError::Unavailable(_))
    ));
    assert!(matches!(
        store.delete("k"),
        Err(StorageError::Unavailable(_))
    ));
    assert_eq!(store.get("k").unwrap().unwrap(), b"old");

    store.fail_writes(false);
    store.put("k", b"new").unwrap();
    assert_eq!(store.get("k").unwrap().unwrap(), b"new");
}
