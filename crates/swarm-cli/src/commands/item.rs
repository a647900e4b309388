// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm item {list,show,create,reset,deps}`.

use crate::cli::{ItemCommand, ItemDepsCommand};
use crate::context::Context;
use crate::output::{self, OutputFormat};
use swarm_core::{CodebaseId, GoalId, WorkItem, WorkItemId};

pub async fn run(ctx: &Context, command: ItemCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        ItemCommand::List { goal, codebase } => {
            let goal_id = goal.as_deref().map(GoalId::from_string);
            let codebase_id = codebase.as_deref().map(CodebaseId::from_string);
            let mut items = ctx.engine.list_items(goal_id, codebase_id)?;
            items.sort_by_key(|i| (-(i.priority as i64), i.created_at));
            output::print_list(&items, format, |i| format!("{} [{:?}] {}", i.id, i.status, i.title))?;
        }
        ItemCommand::Show { id } => {
            let item: WorkItem = ctx.store.fetch(&id)?;
            output::print_one(&serde_json::to_value(&item)?, format)?;
        }
        ItemCommand::Create { goal, title, codebase, description } => {
            let goal_id = GoalId::from_string(&goal);
            let goal_record: swarm_core::Goal = ctx.store.fetch(&goal)?;
            let codebase_ident = codebase.or_else(|| goal_record.codebase_id.as_ref().map(|id| id.as_str().to_string()));
            let codebase = ctx.resolve_codebase(codebase_ident.as_deref())?;
            let item = WorkItem {
                id: Default::default(),
                title,
                description,
                status: swarm_core::WorkItemStatus::Pending,
                goal_id,
                codebase_id: codebase.id,
                worker_id: None,
                priority: 0,
                created_at: 0,
                updated_at: 0,
            };
            let item = ctx.store.insert(item)?;
            output::print_one(&serde_json::to_value(&item)?, format)?;
        }
        ItemCommand::Reset { id } => {
            let item = ctx.engine.reset(&id).await?;
            output::print_one(&serde_json::to_value(&item)?, format)?;
        }
        ItemCommand::Deps(deps) => run_deps(ctx, deps, format)?,
    }
    Ok(())
}

fn run_deps(ctx: &Context, command: ItemDepsCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        ItemDepsCommand::Add { item, depends_on } => {
            let from = WorkItemId::from_string(&item);
            let to = WorkItemId::from_string(&depends_on);
            let dep = ctx.engine.add_dependency(from, to)?;
            output::print_one(&serde_json::to_value(&dep)?, format)?;
        }
        ItemDepsCommand::Remove { item, depends_on } => {
            let from = WorkItemId::from_string(&item);
            let to = WorkItemId::from_string(&depends_on);
            ctx.engine.remove_dependency(from, to)?;
            println!("OK: removed dependency {item} -> {depends_on}");
        }
        ItemDepsCommand::List { item } => {
            let item_id = WorkItemId::from_string(&item);
            let deps = ctx.engine.list_dependencies(item_id)?;
            output::print_list(&deps, format, |d| format!("{} {} -> {}", d.id, d.from, d.to))?;
        }
    }
    Ok(())
}
