// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm patrol [--no-fix]`: runs a single health-patrol cycle.

use crate::context::Context;
use swarm_overseer::Patrol;

pub async fn run(ctx: &Context, no_fix: bool) -> anyhow::Result<()> {
    let patrol = Patrol::new(
        ctx.store.clone(),
        ctx.bus.clone(),
        ctx.diagnostic_context(),
        swarm_overseer::patrol::DEFAULT_INTERVAL,
        !no_fix,
    );
    let results = patrol.tick().await;
    for r in &results {
        let tag = match r.status {
            swarm_overseer::DiagnosticStatus::Ok => "OK",
            swarm_overseer::DiagnosticStatus::Warn => "WARN",
            swarm_overseer::DiagnosticStatus::Error => "ERROR",
        };
        println!("{tag}: {} - {}", r.name, r.message);
    }
    Ok(())
}
