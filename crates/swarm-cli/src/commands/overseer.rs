// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm overseer`: runs the signal-reaction control loop and the health
//! patrol together in the foreground, each supervised with panic-restart.

use std::sync::Arc;

use crate::context::Context;
use swarm_overseer::{Overseer, Patrol, Supervisor};

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let overseer = Arc::new(Overseer::new(
        ctx.store.clone(),
        ctx.engine.clone(),
        ctx.lifecycle.clone(),
        ctx.bus.clone(),
        swarm_overseer::DEFAULT_MAX_RETRIES,
        ctx.config.costs.budget_usd,
    ));
    let patrol = Arc::new(Patrol::new(
        ctx.store.clone(),
        ctx.bus.clone(),
        ctx.diagnostic_context(),
        swarm_overseer::patrol::DEFAULT_INTERVAL,
        true,
    ));

    let mut supervisor = Supervisor::new();
    supervisor.supervise("overseer", {
        let overseer = overseer.clone();
        move || {
            let overseer = overseer.clone();
            async move { overseer.run().await }
        }
    });
    supervisor.supervise("patrol", {
        let patrol = patrol.clone();
        move || {
            let patrol = patrol.clone();
            async move { patrol.run().await }
        }
    });

    tracing::info!("overseer running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    Ok(())
}
