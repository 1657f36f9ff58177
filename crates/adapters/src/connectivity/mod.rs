// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity sources
//!
//! A source answers "are we online right now?" and publishes transitions
//! through a `watch` channel, so late subscribers still see the current
//! state.

mod manual;
mod probe;

pub use manual::ManualConnectivity;
pub use probe::{probe_once, ProbeConnectivity};

use std::sync::Arc;
use tokio::sync::watch;

/// Network reachability signal
pub trait ConnectivitySource: Send + Sync + 'static {
    fn is_online(&self) -> bool;

    /// Receiver that is notified on every online/offline transition
    fn subscribe(&self) -> watch::Receiver<bool>;
}

impl<C: ConnectivitySource + ?Sized> ConnectivitySource for Arc<C> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        (**self).subscribe()
    }
}
