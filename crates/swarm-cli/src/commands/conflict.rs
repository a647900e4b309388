// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm conflict check --worker <id>`: read-only merge-conflict detection.

use crate::context::Context;
use crate::output::OutputFormat;
use swarm_core::{Codebase, SandboxStatus, SwarmError, WorkerId};
use swarm_sandbox::ConflictReport;

pub async fn check(ctx: &Context, worker: String, format: OutputFormat) -> anyhow::Result<()> {
    let worker_id = WorkerId::from_string(&worker);
    let sandbox = ctx
        .store
        .find_one::<swarm_core::Sandbox>(|s| s.worker_id == worker_id && s.status == SandboxStatus::Active)?
        .ok_or_else(|| SwarmError::not_found("sandboxes", worker.clone()))?;
    let codebase: Codebase = ctx.store.fetch(sandbox.codebase_id.as_str())?;
    let report = ctx.sandbox.check_conflicts(&codebase, &sandbox).await;

    match format {
        OutputFormat::Json => {
            let value = match &report {
                ConflictReport::Clean => serde_json::json!({"status": "clean"}),
                ConflictReport::Conflicts(files) => serde_json::json!({"status": "conflicts", "files": files}),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => match report {
            ConflictReport::Clean => println!("OK: clean"),
            ConflictReport::Conflicts(files) => {
                println!("WARN: {} conflicting file(s):", files.len());
                for f in files {
                    println!("  {f}");
                }
            }
        },
    }
    Ok(())
}
