// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm`: one-shot CLI front-end over the orchestration substrate
//! (spec.md §6). Every invocation loads `.swarm/config.toml`, wires the
//! full component stack, runs one command, and exits 0 on success or 1
//! with a rendered error otherwise.

mod cli;
mod commands;
mod config;
mod context;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use context::Context;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => error::render(&e),
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Init { force, quick } = cli.command {
        let cwd = std::env::current_dir()?;
        return commands::init::run(&cwd, force, quick);
    }

    let ctx = Context::discover()?;
    commands::dispatch(ctx, cli.command, cli.format).await
}
