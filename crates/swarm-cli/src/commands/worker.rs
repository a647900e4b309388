// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm worker {list,spawn,stop,complete,fail}` — the latter two are the
//! wrapper-script callbacks that are the detached worker's completion channel.

use crate::cli::WorkerCommand;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use swarm_core::{Worker, WorkerId};

pub async fn run(ctx: &Context, command: WorkerCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        WorkerCommand::List => {
            let mut workers = ctx.store.all::<Worker>()?;
            workers.sort_by_key(|w| w.created_at);
            output::print_list(&workers, format, |w| format!("{} [{:?}] {}", w.id, w.status, w.name))?;
        }
        WorkerCommand::Spawn { item, codebase, name, attached } => {
            let _ = codebase; // the engine resolves the codebase from the work item itself
            let item_id = swarm_core::WorkItemId::from_string(&item);
            let name = name.unwrap_or_else(|| format!("worker-{item}"));
            let worker = if attached {
                ctx.lifecycle.spawn_attached(item_id, &name).await?
            } else {
                ctx.lifecycle.spawn_detached(item_id, &name).await?
            };
            output::print_one(&serde_json::to_value(&worker)?, format)?;
        }
        WorkerCommand::Stop { id } => {
            let worker_id = WorkerId::from_string(&id);
            ctx.lifecycle.stop(&worker_id)?;
            println!("OK: stop requested for worker {id}");
        }
        WorkerCommand::Complete { id } => {
            let worker_id = WorkerId::from_string(&id);
            ctx.lifecycle.complete(worker_id).await?;
            println!("OK: worker {id} marked complete");
        }
        WorkerCommand::Fail { id, reason } => {
            let worker_id = WorkerId::from_string(&id);
            ctx.lifecycle.fail(worker_id, &reason).await?;
            println!("OK: worker {id} marked failed");
        }
    }
    Ok(())
}
