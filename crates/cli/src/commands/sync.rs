// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery commands: `oq sweep` and `oq watch`

use crate::context::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use oq_adapters::{ConnectivitySource, ManualConnectivity, ProbeConnectivity};
use oq_engine::{ConnectivityMonitor, MonitorConfig};
use std::sync::Arc;

pub async fn sweep(ctx: &Context, format: OutputFormat) -> Result<()> {
    let dispatcher = ctx.dispatcher(ctx.open_queue()?)?;
    let report = dispatcher.process_queue().await?;
    output::print(&report, format);
    Ok(())
}

pub async fn watch(ctx: &Context) -> Result<()> {
    let settings = &ctx.config.connectivity;
    let connectivity: Arc<dyn ConnectivitySource> = match &settings.probe_addr {
        Some(addr) => Arc::new(ProbeConnectivity::spawn(
            addr.clone(),
            settings.probe_interval,
            settings.probe_timeout,
        )),
        None => {
            tracing::info!("no probe_addr configured, assuming online");
            Arc::new(ManualConnectivity::new(true))
        }
    };

    let queue = ctx
        .open_queue()?
        .with_connectivity(Arc::clone(&connectivity));
    let dispatcher = Arc::new(ctx.dispatcher(queue)?);
    dispatcher.notifier().on_sync(|envelope, success| {
        let outcome = if success { "synced" } else { "failed" };
        println!("{outcome:<7} {} {}", envelope.id(), envelope.action_type());
    });

    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        connectivity,
        MonitorConfig {
            sweep_interval: settings.sweep_interval,
            sweep_on_start: true,
        },
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupted, stopping");
    handle.shutdown().await;
    Ok(())
}
