// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One module per subcommand group, dispatched from `main`.

pub mod budget;
pub mod codebase;
pub mod conflict;
pub mod costs;
pub mod dashboard;
pub mod doctor;
pub mod goal;
pub mod init;
pub mod item;
pub mod overseer;
pub mod patrol;
pub mod sandbox;
pub mod signal;
pub mod validate;
pub mod worker;

use crate::cli::{Command, ConflictCommand};
use crate::context::Context;
use crate::output::OutputFormat;

/// Dispatches every subcommand except `init`, which runs before a
/// [`Context`] can be bootstrapped (there may be no workspace yet).
pub async fn dispatch(mut ctx: Context, command: Command, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Command::Init { .. } => unreachable!("init is handled in main before Context::discover"),
        Command::Doctor { fix } => doctor::run(&ctx, fix, format).await,
        Command::Codebase(cmd) => codebase::run(&mut ctx, cmd, format).await,
        Command::Goal(cmd) => goal::run(&ctx, cmd, format).await,
        Command::Item(cmd) => item::run(&ctx, cmd, format).await,
        Command::Worker(cmd) => worker::run(&ctx, cmd, format).await,
        Command::Signal(cmd) => signal::run(&ctx, cmd, format).await,
        Command::Costs(cmd) => costs::run(&ctx, cmd, format).await,
        Command::Sandbox(cmd) => sandbox::run(&ctx, cmd, format).await,
        Command::Budget { goal } => budget::run(&ctx, goal, format).await,
        Command::Conflict(args) => match args.command {
            ConflictCommand::Check { worker } => conflict::check(&ctx, worker, format).await,
        },
        Command::Validate { worker } => validate::run(&ctx, worker).await,
        Command::Overseer => overseer::run(&ctx).await,
        Command::Patrol { no_fix } => patrol::run(&ctx, no_fix).await,
        Command::Dashboard => dashboard::run(),
    }
}
