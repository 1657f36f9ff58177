// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor: sweeps the queue when the network comes back
//!
//! An offline to online transition triggers a sweep. An optional timer adds
//! periodic sweeps, but only while online. Manual calls to
//! [`Dispatcher::process_queue`] are never blocked by the monitor.

use crate::dispatcher::Dispatcher;
use oq_adapters::ConnectivitySource;
use oq_core::{Clock, IdGen};
use oq_storage::KeyValueStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Periodic sweep while online
    pub sweep_interval: Option<Duration>,
    /// Sweep immediately if already online when the monitor starts
    pub sweep_on_start: bool,
}

/// Handle to a running monitor task. Dropping it also stops the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    sweeps: Arc<AtomicU64>,
}

impl MonitorHandle {
    /// Sweeps the monitor has triggered so far
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::SeqCst)
    }

    /// Stop the monitor, waiting for an in-progress sweep to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "connectivity monitor task ended abnormally");
        }
    }
}

pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    /// Start monitoring `source` on the current tokio runtime
    pub fn spawn<S, C, I>(
        dispatcher: Arc<Dispatcher<S, C, I>>,
        source: Arc<dyn ConnectivitySource>,
        config: MonitorConfig,
    ) -> MonitorHandle
    where
        S: KeyValueStore,
        C: Clock,
        I: IdGen,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let sweeps = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run(
            dispatcher,
            source,
            config,
            shutdown_rx,
            Arc::clone(&sweeps),
        ));
        MonitorHandle {
            shutdown: Some(shutdown_tx),
            task,
            sweeps,
        }
    }
}

async fn run<S, C, I>(
    dispatcher: Arc<Dispatcher<S, C, I>>,
    source: Arc<dyn ConnectivitySource>,
    config: MonitorConfig,
    mut shutdown: oneshot::Receiver<()>,
    sweeps: Arc<AtomicU64>,
) where
    S: KeyValueStore,
    C: Clock,
    I: IdGen,
{
    let mut rx = source.subscribe();
    let mut online = *rx.borrow_and_update();
    let mut ticker = config.sweep_interval.map(|period| {
        let period = period.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    tracing::info!(
        online,
        sweep_interval_ms = config.sweep_interval.map(|d| d.as_millis() as u64),
        "connectivity monitor started"
    );

    if online && config.sweep_on_start {
        sweep(&dispatcher, &sweeps, "start").await;
    }

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("connectivity source closed, monitor stopping");
                    break;
                }
                let now_online = *rx.borrow_and_update();
                if now_online == online {
                    continue;
                }
                online = now_online;
                if online {
                    tracing::info!("back online");
                    sweep(&dispatcher, &sweeps, "reconnect").await;
                } else {
                    tracing::info!("offline, automatic sweeps paused");
                }
            }
            _ = tick(&mut ticker) => {
                if online {
                    sweep(&dispatcher, &sweeps, "interval").await;
                }
            }
        }
    }
    tracing::info!("connectivity monitor stopped");
}

async fn sweep<S, C, I>(dispatcher: &Dispatcher<S, C, I>, sweeps: &AtomicU64, trigger: &str)
where
    S: KeyValueStore,
    C: Clock,
    I: IdGen,
{
    tracing::debug!(trigger, "triggering sweep");
    if let Err(e) = dispatcher.process_queue().await {
        tracing::error!(trigger, error = %e, "sweep failed");
    }
    sweeps.fetch_add(1, Ordering::SeqCst);
}

/// Next tick of the optional timer; pends forever without one
async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
