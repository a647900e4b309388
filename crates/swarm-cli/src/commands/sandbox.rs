// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm sandbox {list,clean}`.

use crate::cli::SandboxCommand;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use swarm_core::Sandbox;

pub async fn run(ctx: &Context, command: SandboxCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        SandboxCommand::List => {
            let mut sandboxes = ctx.store.all::<Sandbox>()?;
            sandboxes.sort_by_key(|s| s.created_at);
            output::print_list(&sandboxes, format, |s| format!("{} [{:?}] {}", s.id, s.status, s.branch))?;
        }
        SandboxCommand::Clean => {
            let count = ctx.sandbox.orphans_reconcile()?;
            println!("OK: reconciled {count} orphaned sandbox(es)");
        }
    }
    Ok(())
}
