// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm validate --worker <id>`: runs the owning codebase's configured
//! validation command against the worker's sandbox working tree.

use std::time::Duration;

use crate::context::Context;
use swarm_adapters::subprocess::run_with_timeout;
use swarm_core::{Codebase, SandboxStatus, SwarmError, WorkerId};

const VALIDATE_TIMEOUT: Duration = Duration::from_secs(600);

pub async fn run(ctx: &Context, worker: String) -> anyhow::Result<()> {
    let worker_id = WorkerId::from_string(&worker);
    let sandbox = ctx
        .store
        .find_one::<swarm_core::Sandbox>(|s| s.worker_id == worker_id && s.status == SandboxStatus::Active)?
        .ok_or_else(|| SwarmError::not_found("sandboxes", worker.clone()))?;
    let codebase: Codebase = ctx.store.fetch(sandbox.codebase_id.as_str())?;
    let command = codebase
        .validation_command
        .ok_or_else(|| SwarmError::MissingFields(vec!["validation_command".to_string()]))?;

    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| SwarmError::MissingFields(vec!["validation_command".to_string()]))?;
    let args: Vec<&str> = parts.collect();

    let output = run_with_timeout(program, &args, &sandbox.path, VALIDATE_TIMEOUT)
        .await
        .map_err(|e| SwarmError::ToolFailure(e.to_string()))?;

    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    if output.status_ok {
        println!("OK: validation passed");
        Ok(())
    } else {
        Err(SwarmError::ToolFailure(format!("validation command exited non-zero: {command}")).into())
    }
}
