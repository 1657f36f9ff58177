// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved configuration and the wiring shared by every command

use crate::error::OqError;
use anyhow::{Context as _, Result};
use oq_adapters::{HttpExecutor, TracedExecutor};
use oq_core::{Config, SyncNotifier, SystemClock, UuidIdGen};
use oq_engine::{Dispatcher, ExecutorRegistry, OfflineQueue, QueueError};
use oq_storage::{FileStore, QueueStore, StorageError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type CliQueue = OfflineQueue<FileStore, SystemClock, UuidIdGen>;
pub type CliDispatcher = Dispatcher<FileStore, SystemClock, UuidIdGen>;

pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub store_dir: PathBuf,
}

impl Context {
    /// Load `config_path` (defaults if absent) and apply the store override
    pub fn load(config_path: &Path, store: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;
        let store_dir = store.unwrap_or_else(|| config.queue.store_dir.clone());
        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            store_dir,
        })
    }

    pub fn open_queue(&self) -> Result<CliQueue> {
        let store = FileStore::open(&self.store_dir)
            .map_err(|e| OqError::store_unavailable(&self.store_dir).with_source(e))?;
        match OfflineQueue::open(
            QueueStore::new(store),
            &self.config.queue,
            SystemClock,
            UuidIdGen,
        ) {
            Ok(queue) => Ok(queue),
            Err(QueueError::Storage(
                e @ (StorageError::Corrupt { .. } | StorageError::UnsupportedVersion { .. }),
            )) => Err(OqError::corrupt_store(&self.store_dir).with_source(e).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// HTTP executor per configured action type
    pub fn registry(&self) -> ExecutorRegistry {
        let registry = ExecutorRegistry::new();
        for (action_type, executor) in &self.config.executors {
            registry.register(
                action_type.clone(),
                TracedExecutor::new(action_type.clone(), HttpExecutor::from_config(executor)),
            );
        }
        registry
    }

    /// Dispatcher over `queue`. Refuses to sweep with no executors at all,
    /// since every queued action would be dropped as unhandled.
    pub fn dispatcher(&self, queue: CliQueue) -> Result<CliDispatcher> {
        let registry = self.registry();
        if registry.types().is_empty() {
            return Err(OqError::no_executors(&self.config_path).into());
        }
        Ok(Dispatcher::new(Arc::new(queue), registry, SyncNotifier::new()))
    }
}
