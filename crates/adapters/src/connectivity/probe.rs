// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP reachability probe

use super::ConnectivitySource;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Try one TCP connect to `addr` within `timeout`
pub async fn probe_once(addr: &str, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Connectivity decided by periodically connecting to a known endpoint.
///
/// Starts offline; the first probe runs immediately. The probe task stops
/// when this value is dropped.
#[derive(Debug)]
pub struct ProbeConnectivity {
    tx: Arc<watch::Sender<bool>>,
    task: JoinHandle<()>,
}

impl ProbeConnectivity {
    /// Start probing. Must be called within a tokio runtime.
    pub fn spawn(addr: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        let addr = addr.into();
        let (tx, _) = watch::channel(false);
        let tx = Arc::new(tx);

        let task_tx = Arc::clone(&tx);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let online = probe_once(&addr, timeout).await;
                let changed = task_tx.send_if_modified(|current| {
                    let changed = *current != online;
                    *current = online;
                    changed
                });
                if changed {
                    if online {
                        tracing::info!(%addr, "connectivity restored");
                    } else {
                        tracing::warn!(%addr, "connectivity lost");
                    }
                } else {
                    tracing::trace!(%addr, online, "probe");
                }
            }
        });

        Self { tx, task }
    }
}

impl ConnectivitySource for ProbeConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Drop for ProbeConnectivity {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
