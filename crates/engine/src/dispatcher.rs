// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher: sweeps the queue through registered executors
//!
//! A sweep works on a snapshot taken when it starts, so actions enqueued
//! mid-sweep wait for the next one. Each action gets exactly one attempt per
//! sweep. Executor errors are absorbed into the retry counter; storage
//! errors abort the sweep and are returned.

use crate::error::QueueError;
use crate::offline::{OfflineQueue, RetryOutcome};
use crate::registry::ExecutorRegistry;
use oq_core::{ActionEnvelope, Clock, IdGen, SyncNotifier};
use oq_storage::KeyValueStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Tally of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Executor invocations
    pub attempted: usize,
    pub succeeded: usize,
    /// Failed but still queued
    pub retried: usize,
    /// Failed with no retries left, removed
    pub exhausted: usize,
    /// Removed because no executor handles the type
    pub dropped: usize,
    /// Gone from the queue before their turn came
    pub skipped: usize,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted {}, succeeded {}, retried {}, exhausted {}, dropped {}, skipped {}",
            self.attempted, self.succeeded, self.retried, self.exhausted, self.dropped, self.skipped
        )
    }
}

pub struct Dispatcher<S, C, I> {
    queue: Arc<OfflineQueue<S, C, I>>,
    registry: ExecutorRegistry,
    notifier: SyncNotifier,
    /// Serializes overlapping sweeps
    sweep_lock: tokio::sync::Mutex<()>,
}

impl<S, C, I> Dispatcher<S, C, I>
where
    S: KeyValueStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(
        queue: Arc<OfflineQueue<S, C, I>>,
        registry: ExecutorRegistry,
        notifier: SyncNotifier,
    ) -> Self {
        Self {
            queue,
            registry,
            notifier,
            sweep_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn queue(&self) -> &Arc<OfflineQueue<S, C, I>> {
        &self.queue
    }

    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    pub fn notifier(&self) -> &SyncNotifier {
        &self.notifier
    }

    /// Attempt every queued action once, in priority order.
    ///
    /// A call made while another sweep is running waits for it, then sweeps
    /// whatever is left.
    pub async fn process_queue(&self) -> Result<SweepReport, QueueError> {
        let _sweep = self.sweep_lock.lock().await;

        let snapshot = self.queue.snapshot();
        let span = tracing::info_span!("sweep", queued = snapshot.len());
        self.sweep(&snapshot).instrument(span).await
    }

    async fn sweep(&self, snapshot: &[ActionEnvelope]) -> Result<SweepReport, QueueError> {
        let start = std::time::Instant::now();
        let mut report = SweepReport::default();
        for envelope in snapshot {
            if !self.queue.contains(envelope.id()) {
                report.skipped += 1;
                continue;
            }
            let span = tracing::info_span!(
                "action.execute",
                id = %envelope.id(),
                action_type = %envelope.action_type(),
                retries = envelope.retries()
            );
            self.attempt(envelope, &mut report).instrument(span).await?;
        }

        tracing::info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            retried = report.retried,
            exhausted = report.exhausted,
            dropped = report.dropped,
            remaining = self.queue.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sweep complete"
        );
        Ok(report)
    }

    async fn attempt(
        &self,
        envelope: &ActionEnvelope,
        report: &mut SweepReport,
    ) -> Result<(), QueueError> {
        let id = envelope.id();
        let Some(executor) = self.registry.get(envelope.action_type()) else {
            tracing::warn!("no executor registered for action type, dropping action");
            if let Some(removed) = self.queue.complete(id)? {
                report.dropped += 1;
                self.notifier.notify(&removed, false);
            }
            return Ok(());
        };

        report.attempted += 1;
        match executor.execute(envelope.payload()).await {
            Ok(()) => match self.queue.complete(id)? {
                Some(removed) => {
                    report.succeeded += 1;
                    tracing::info!("action delivered");
                    self.notifier.notify(&removed, true);
                }
                None => tracing::debug!("action delivered but already removed"),
            },
            Err(error) => match self.queue.record_failure(id)? {
                RetryOutcome::Requeued { retries } => {
                    report.retried += 1;
                    tracing::warn!(
                        %error,
                        retries,
                        max_retries = envelope.max_retries(),
                        "delivery failed, will retry"
                    );
                }
                RetryOutcome::Exhausted(removed) => {
                    report.exhausted += 1;
                    tracing::warn!(
                        %error,
                        max_retries = removed.max_retries(),
                        "delivery failed, retries exhausted"
                    );
                    self.notifier.notify(&removed, false);
                }
                RetryOutcome::Missing => {
                    tracing::debug!(%error, "delivery failed but action already removed")
                }
            },
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
