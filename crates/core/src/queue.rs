// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered action queue with capacity eviction
//!
//! A pure state machine: `transition` never mutates in place, it returns the
//! next queue plus the changes that produced it. Callers persist the next
//! queue first and only then adopt it, so a failed write leaves the last
//! committed state untouched.
//!
//! Ordering is priority tier first (high, normal, low), then `enqueued_at`,
//! then insertion sequence. Capacity pressure is resolved by age alone: the
//! globally oldest envelope is evicted regardless of its tier.

use crate::envelope::ActionEnvelope;
use std::collections::HashSet;

/// Capacity applied when none is configured
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

/// Events that can change queue state
#[derive(Clone, Debug)]
pub enum QueueEvent {
    /// Insert a new envelope, evicting the oldest one if at capacity
    Push { envelope: ActionEnvelope },
    /// Remove an envelope by id (delivered, dequeued, or undeliverable)
    Remove { id: String },
    /// Record one failed delivery attempt
    Fail { id: String },
    /// Drop every envelope
    Clear,
}

/// What a transition did
#[derive(Clone, Debug, PartialEq)]
pub enum QueueChange {
    Added {
        id: String,
    },
    /// Push ignored because the id is already queued
    Duplicate {
        id: String,
    },
    Evicted {
        envelope: ActionEnvelope,
    },
    Removed {
        envelope: ActionEnvelope,
    },
    Retried {
        id: String,
        retries: u32,
        max_retries: u32,
    },
    /// The failure pushed retries past the ceiling; the envelope is gone
    Exhausted {
        envelope: ActionEnvelope,
    },
    Cleared {
        count: usize,
    },
}

/// In-memory ordered queue of action envelopes
#[derive(Debug, Clone)]
pub struct ActionQueue {
    actions: Vec<ActionEnvelope>,
    next_sequence: u64,
    max_queue_size: usize,
}

impl ActionQueue {
    /// Create an empty queue. A capacity of zero is treated as one.
    pub fn new(max_queue_size: usize) -> Self {
        Self {
            actions: Vec::new(),
            next_sequence: 1,
            max_queue_size: max_queue_size.max(1),
        }
    }

    /// Rebuild a queue from persisted envelopes.
    ///
    /// Restores ordering, drops duplicate ids (first occurrence wins) and
    /// evicts the oldest envelopes if the stored list exceeds capacity.
    /// Returns the queue and whatever had to be evicted.
    pub fn from_envelopes(
        envelopes: Vec<ActionEnvelope>,
        max_queue_size: usize,
    ) -> (Self, Vec<ActionEnvelope>) {
        let mut seen = HashSet::new();
        let mut actions: Vec<ActionEnvelope> = envelopes
            .into_iter()
            .filter(|e| seen.insert(e.id().to_string()))
            .collect();
        sort_actions(&mut actions);

        let next_sequence = actions
            .iter()
            .map(ActionEnvelope::sequence)
            .max()
            .map_or(1, |s| s.saturating_add(1));

        let mut queue = Self {
            actions,
            next_sequence,
            max_queue_size: max_queue_size.max(1),
        };
        let mut evicted = Vec::new();
        while queue.actions.len() > queue.max_queue_size {
            match queue.take_oldest() {
                Some(envelope) => evicted.push(envelope),
                None => break,
            }
        }
        (queue, evicted)
    }

    /// Pure transition function - returns new state and the changes made.
    ///
    /// An empty change list means the event was a no-op.
    pub fn transition(&self, event: QueueEvent) -> (ActionQueue, Vec<QueueChange>) {
        match event {
            QueueEvent::Push { envelope } => {
                if self.contains(envelope.id()) {
                    let id = envelope.id().to_string();
                    return (self.clone(), vec![QueueChange::Duplicate { id }]);
                }

                let mut queue = self.clone();
                let mut changes = Vec::new();
                while queue.actions.len() >= queue.max_queue_size {
                    match queue.take_oldest() {
                        Some(evicted) => changes.push(QueueChange::Evicted { envelope: evicted }),
                        None => break,
                    }
                }

                let envelope = envelope.with_sequence(queue.next_sequence);
                queue.next_sequence = queue.next_sequence.saturating_add(1);
                changes.push(QueueChange::Added {
                    id: envelope.id().to_string(),
                });
                queue.actions.push(envelope);
                sort_actions(&mut queue.actions);
                (queue, changes)
            }

            QueueEvent::Remove { id } => {
                let Some(pos) = self.position(&id) else {
                    return (self.clone(), vec![]);
                };
                let mut queue = self.clone();
                let envelope = queue.actions.remove(pos);
                (queue, vec![QueueChange::Removed { envelope }])
            }

            QueueEvent::Fail { id } => {
                let Some(pos) = self.position(&id) else {
                    return (self.clone(), vec![]);
                };
                let mut queue = self.clone();
                let bumped = queue.actions[pos].with_incremented_retries();

                if bumped.retries() > bumped.max_retries() {
                    queue.actions.remove(pos);
                    (queue, vec![QueueChange::Exhausted { envelope: bumped }])
                } else {
                    let change = QueueChange::Retried {
                        id: bumped.id().to_string(),
                        retries: bumped.retries(),
                        max_retries: bumped.max_retries(),
                    };
                    // Retrying does not move the envelope: its sort key is unchanged.
                    queue.actions[pos] = bumped;
                    (queue, vec![change])
                }
            }

            QueueEvent::Clear => {
                if self.actions.is_empty() {
                    return (self.clone(), vec![]);
                }
                let queue = ActionQueue {
                    actions: Vec::new(),
                    next_sequence: self.next_sequence,
                    max_queue_size: self.max_queue_size,
                };
                let count = self.actions.len();
                (queue, vec![QueueChange::Cleared { count }])
            }
        }
    }

    /// Look up an envelope by id
    pub fn get(&self, id: &str) -> Option<&ActionEnvelope> {
        self.actions.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Envelopes in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &ActionEnvelope> {
        self.actions.iter()
    }

    /// Envelopes in dispatch order, as a slice
    pub fn actions(&self) -> &[ActionEnvelope] {
        &self.actions
    }

    /// Point-in-time copy of the queue contents
    pub fn snapshot(&self) -> Vec<ActionEnvelope> {
        self.actions.clone()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn max_queue_size(&self) -> usize {
        self.max_queue_size
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.actions.iter().position(|e| e.id() == id)
    }

    fn take_oldest(&mut self) -> Option<ActionEnvelope> {
        let pos = self
            .actions
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.age_key())
            .map(|(pos, _)| pos)?;
        Some(self.actions.remove(pos))
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUEUE_SIZE)
    }
}

/// Stable sort by (priority, enqueued_at, sequence)
fn sort_actions(actions: &mut [ActionEnvelope]) {
    actions.sort_by_key(|e| e.order_key());
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
