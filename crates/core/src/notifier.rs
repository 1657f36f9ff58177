// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync notifier for terminal delivery outcomes
//!
//! Observers hear about an envelope exactly once, when it leaves the queue
//! through a dispatch sweep: delivered (`true`) or given up (`false`).
//! Intermediate retryable failures are never reported.

use crate::envelope::ActionEnvelope;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Observer invoked with the envelope and whether it was delivered
pub type SyncCallback = Arc<dyn Fn(&ActionEnvelope, bool) + Send + Sync>;

/// Handle returned by [`SyncNotifier::on_sync`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncSubscription(u64);

/// Registry of sync observers, invoked in registration order
#[derive(Clone, Default)]
pub struct SyncNotifier {
    observers: Arc<RwLock<Vec<(SyncSubscription, SyncCallback)>>>,
    next_id: Arc<AtomicU64>,
}

impl SyncNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn on_sync<F>(&self, callback: F) -> SyncSubscription
    where
        F: Fn(&ActionEnvelope, bool) + Send + Sync + 'static,
    {
        let subscription = SyncSubscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        observers.push((subscription, Arc::new(callback)));
        subscription
    }

    /// Unregister an observer. Returns false if it was not registered.
    pub fn off_sync(&self, subscription: &SyncSubscription) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|(id, _)| id != subscription);
        observers.len() != before
    }

    /// Invoke every observer synchronously.
    ///
    /// Callbacks are cloned out of the registry first, so an observer may
    /// register or unregister others while being called. Such changes take
    /// effect from the next notification.
    pub fn notify(&self, envelope: &ActionEnvelope, success: bool) {
        let callbacks: Vec<SyncCallback> = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        tracing::debug!(
            id = %envelope.id(),
            action_type = %envelope.action_type(),
            success,
            observers = callbacks.len(),
            "notifying sync observers"
        );

        for callback in callbacks {
            callback(envelope, success);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl std::fmt::Debug for SyncNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncNotifier")
            .field("observers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
