// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue commands: `oq enqueue`, `oq dequeue`, `oq status`, `oq clear`

use crate::context::Context;
use crate::error::OqError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use oq_adapters::{probe_once, ManualConnectivity};
use oq_core::{EnqueueOptions, Priority};
use oq_engine::QueueStatus;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Args)]
pub struct EnqueueArgs {
    /// Action type, selects the executor
    #[arg(value_name = "TYPE")]
    pub action_type: String,

    /// Payload as JSON
    #[arg(short, long, default_value = "{}")]
    pub payload: String,

    /// Delivery priority: high, normal or low
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Failed deliveries tolerated before the action is dropped
    #[arg(long)]
    pub max_retries: Option<u32>,
}

#[derive(Args)]
pub struct DequeueArgs {
    /// Id printed by `oq enqueue`
    pub id: String,
}

#[derive(Serialize)]
struct Enqueued {
    id: String,
}

impl fmt::Display for Enqueued {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Serialize)]
struct Dequeued {
    id: String,
    removed: bool,
}

impl fmt::Display for Dequeued {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed {
            write!(f, "Removed {}", self.id)
        } else {
            write!(f, "Not queued: {}", self.id)
        }
    }
}

#[derive(Serialize)]
struct Cleared {
    count: usize,
}

impl fmt::Display for Cleared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.count == 1 { "" } else { "s" };
        write!(f, "Cleared {} action{}", self.count, plural)
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct StatusView(QueueStatus);

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = &self.0;
        let connectivity = if status.is_online { "online" } else { "offline" };
        if status.actions.is_empty() {
            return write!(f, "Queue is empty ({connectivity})");
        }

        writeln!(f, "{} queued ({})", status.length, connectivity)?;
        write!(
            f,
            "{:<36}  {:<24}  {:<8}  {:<7}  ENQUEUED",
            "ID", "TYPE", "PRIORITY", "RETRIES"
        )?;
        for action in &status.actions {
            write!(
                f,
                "\n{:<36}  {:<24}  {:<8}  {:<7}  {}",
                action.id(),
                action.action_type(),
                action.priority(),
                format!("{}/{}", action.retries(), action.max_retries()),
                action.enqueued_at().format("%Y-%m-%d %H:%M:%S")
            )?;
        }
        Ok(())
    }
}

pub fn enqueue(ctx: &Context, args: EnqueueArgs, format: OutputFormat) -> Result<()> {
    let payload: serde_json::Value =
        serde_json::from_str(&args.payload).map_err(|e| OqError::invalid_payload(&e))?;

    let mut options = EnqueueOptions::new();
    if let Some(priority) = args.priority {
        options = options.priority(priority);
    }
    if let Some(max_retries) = args.max_retries {
        options = options.max_retries(max_retries);
    }

    let queue = ctx.open_queue()?;
    let id = queue.enqueue(&args.action_type, payload, options)?;
    output::print(&Enqueued { id }, format);
    Ok(())
}

pub fn dequeue(ctx: &Context, args: DequeueArgs, format: OutputFormat) -> Result<()> {
    let queue = ctx.open_queue()?;
    let removed = queue.dequeue(&args.id)?;
    output::print(
        &Dequeued {
            id: args.id,
            removed,
        },
        format,
    );
    Ok(())
}

/// Connectivity is probed once when `probe_addr` is configured
pub async fn status(ctx: &Context, format: OutputFormat) -> Result<()> {
    let mut queue = ctx.open_queue()?;
    let settings = &ctx.config.connectivity;
    if let Some(addr) = &settings.probe_addr {
        let online = probe_once(addr, settings.probe_timeout).await;
        queue = queue.with_connectivity(Arc::new(ManualConnectivity::new(online)));
    }
    output::print(&StatusView(queue.status()), format);
    Ok(())
}

pub fn clear(ctx: &Context, format: OutputFormat) -> Result<()> {
    let queue = ctx.open_queue()?;
    let count = queue.len();
    queue.clear_queue()?;
    output::print(&Cleared { count }, format);
    Ok(())
}
