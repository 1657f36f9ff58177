// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! oq - Offline action queue CLI

mod commands;
mod context;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{queue, sync};
use context::Context;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "oq",
    version,
    about = "oq - Durable offline action queue with retrying delivery"
)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "oq.toml")]
    config: PathBuf,

    /// Store directory (overrides `queue.store_dir`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue an action for delivery
    Enqueue(queue::EnqueueArgs),
    /// Remove a queued action by id
    Dequeue(queue::DequeueArgs),
    /// Show queued actions in dispatch order
    Status,
    /// Remove every queued action
    Clear,
    /// Attempt delivery of every queued action once
    Sweep,
    /// Sweep whenever connectivity returns, until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let ctx = Context::load(&cli.config, cli.store)?;

    match cli.command {
        Commands::Enqueue(args) => queue::enqueue(&ctx, args, cli.output),
        Commands::Dequeue(args) => queue::dequeue(&ctx, args, cli.output),
        Commands::Status => queue::status(&ctx, cli.output).await,
        Commands::Clear => queue::clear(&ctx, cli.output),
        Commands::Sweep => sync::sweep(&ctx, cli.output).await,
        Commands::Watch => sync::watch(&ctx).await,
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("OQ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
