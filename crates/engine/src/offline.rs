// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable offline queue
//!
//! Every mutation computes the next queue state, persists it, and only then
//! adopts it. The state lock is held across the write so the store always
//! sees mutations in the same order memory does. No lock is ever held
//! across an `.await`.

use crate::error::QueueError;
use oq_adapters::ConnectivitySource;
use oq_core::{
    ActionEnvelope, ActionQueue, Clock, EnqueueOptions, IdGen, QueueChange, QueueConfig,
    QueueEvent,
};
use oq_storage::{KeyValueStore, QueueStore};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};


/// Point-in-time view of the queue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub length: usize,
    /// Actions in dispatch order
    pub actions: Vec<ActionEnvelope>,
    pub is_online: bool,
}

/// Result of recording a failed delivery
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome {
    /// Still queued with the new retry count
    Requeued { retries: u32 },
    /// Retry budget spent; the action has been removed
    Exhausted(ActionEnvelope),
    /// The action was no longer queued
    Missing,
}

/// The offline action queue
pub struct OfflineQueue<S, C, I> {
    store: QueueStore<S>,
    state: Mutex<ActionQueue>,
    clock: C,
    id_gen: I,
    default_max_retries: u32,
    connectivity: Option<Arc<dyn ConnectivitySource>>,
}

impl<S, C, I> OfflineQueue<S, C, I>
where
    S: KeyValueStore,
    C: Clock,
    I: IdGen,
{
    /// Open the queue, restoring whatever was persisted
    pub fn open(
        store: QueueStore<S>,
        config: &QueueConfig,
        clock: C,
        id_gen: I,
    ) -> Result<Self, QueueError> {
        let stored = store.load()?;
        let stored_len = stored.len();
        let (queue, evicted) = ActionQueue::from_envelopes(stored, config.max_queue_size);

        for envelope in &evicted {
            tracing::warn!(
                id = %envelope.id(),
                action_type = %envelope.action_type(),
                "stored queue exceeds capacity, evicted oldest action"
            );
        }
        if queue.len() != stored_len {
            store.save(queue.actions())?;
        }
        tracing::info!(
            key = %store.key(),
            length = queue.len(),
            capacity = queue.max_queue_size(),
            "offline queue opened"
        );

        Ok(Self {
            store,
            state: Mutex::new(queue),
            clock,
            id_gen,
            default_max_retries: config.default_max_retries,
            connectivity: None,
        })
    }

    /// Report connectivity from `source` in [`status`](Self::status).
    /// Without a source the queue reports itself online.
    pub fn with_connectivity(mut self, source: Arc<dyn ConnectivitySource>) -> Self {
        self.connectivity = Some(source);
        self
    }

    /// Add an action. Returns its id once the new queue is durable.
    pub fn enqueue(
        &self,
        action_type: &str,
        payload: serde_json::Value,
        options: EnqueueOptions,
    ) -> Result<String, QueueError> {
        let mut state = self.lock();

        // A generator that never repeats itself finds a free id within
        // len + 1 draws.
        let attempts = state.len() + 1;
        let id = std::iter::repeat_with(|| self.id_gen.next())
            .take(attempts)
            .find(|id| !state.contains(id))
            .ok_or(QueueError::IdExhausted { attempts })?;

        let envelope = ActionEnvelope::new(id.clone(), action_type, payload, self.clock.now())
            .with_options(options, self.default_max_retries);
        let priority = envelope.priority();
        let changes = self.commit(&mut state, QueueEvent::Push { envelope })?;

        for change in &changes {
            match change {
                QueueChange::Evicted { envelope } => tracing::warn!(
                    id = %envelope.id(),
                    action_type = %envelope.action_type(),
                    retries = envelope.retries(),
                    "queue full, evicted oldest action"
                ),
                QueueChange::Added { id } => tracing::info!(
                    %id,
                    action_type,
                    %priority,
                    length = state.len(),
                    "action enqueued"
                ),
                _ => {}
            }
        }
        Ok(id)
    }

    /// Remove an action by id. Returns false, without writing, if absent.
    pub fn dequeue(&self, id: &str) -> Result<bool, QueueError> {
        let removed = self.remove(id)?;
        if let Some(envelope) = &removed {
            tracing::info!(id, action_type = %envelope.action_type(), "action dequeued");
        }
        Ok(removed.is_some())
    }

    /// Ordered copy of the queue plus current connectivity
    pub fn status(&self) -> QueueStatus {
        let actions = self.snapshot();
        QueueStatus {
            length: actions.len(),
            actions,
            is_online: self.is_online(),
        }
    }

    /// Drop every action and persist the empty queue
    pub fn clear_queue(&self) -> Result<(), QueueError> {
        let mut state = self.lock();
        let changes = self.commit(&mut state, QueueEvent::Clear)?;
        if changes.is_empty() {
            // Already empty in memory; still make the store agree.
            self.store.save(&[])?;
        }
        for change in &changes {
            if let QueueChange::Cleared { count } = change {
                tracing::info!(count, "queue cleared");
            }
        }
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        match &self.connectivity {
            Some(source) => source.is_online(),
            None => true,
        }
    }

    pub fn snapshot(&self) -> Vec<ActionEnvelope> {
        self.lock().snapshot()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove an action after delivery. `None` if it was already gone.
    pub fn complete(&self, id: &str) -> Result<Option<ActionEnvelope>, QueueError> {
        self.remove(id)
    }

    /// Count one failed delivery, removing the action once its budget is spent
    pub fn record_failure(&self, id: &str) -> Result<RetryOutcome, QueueError> {
        let mut state = self.lock();
        let changes = self.commit(&mut state, QueueEvent::Fail { id: id.to_string() })?;
        let outcome = changes
            .into_iter()
            .find_map(|change| match change {
                QueueChange::Retried { retries, .. } => Some(RetryOutcome::Requeued { retries }),
                QueueChange::Exhausted { envelope } => Some(RetryOutcome::Exhausted(envelope)),
                _ => None,
            })
            .unwrap_or(RetryOutcome::Missing);
        Ok(outcome)
    }

    fn remove(&self, id: &str) -> Result<Option<ActionEnvelope>, QueueError> {
        let mut state = self.lock();
        let changes = self.commit(&mut state, QueueEvent::Remove { id: id.to_string() })?;
        Ok(changes.into_iter().find_map(|change| match change {
            QueueChange::Removed { envelope } => Some(envelope),
            _ => None,
        }))
    }

    /// Apply `event`; persist and adopt the result only if something changed.
    ///
    /// On a failed write the in-memory queue keeps its last committed state.
    fn commit(
        &self,
        state: &mut MutexGuard<'_, ActionQueue>,
        event: QueueEvent,
    ) -> Result<Vec<QueueChange>, QueueError> {
        let (next, changes) = state.transition(event);
        let mutated = changes
            .iter()
            .any(|change| !matches!(change, QueueChange::Duplicate { .. }));
        if !mutated {
            return Ok(changes);
        }

        if let Err(e) = self.store.save(next.actions()) {
            tracing::error!(error = %e, "failed to persist queue, change rolled back");
            return Err(e.into());
        }
        **state = next;
        Ok(changes)
    }

    fn lock(&self) -> MutexGuard<'_, ActionQueue> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: KeyValueStore, C, I> std::fmt::Debug for OfflineQueue<S, C, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineQueue")
            .field("key", &self.store.key())
            .field("default_max_retries", &self.default_max_retries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "offline_tests.rs"]
mod tests;
