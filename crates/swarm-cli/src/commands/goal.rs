// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm goal {new,list,show,delete,merge,report}`.

use crate::cli::GoalCommand;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use swarm_core::{Goal, GoalId, GoalStatus};

const NAME_TRUNCATE: usize = 48;

pub async fn run(ctx: &Context, command: GoalCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        GoalCommand::New { goal_text, codebase } => {
            let codebase = ctx.resolve_codebase(codebase.as_deref()).ok();
            let name: String = goal_text.chars().take(NAME_TRUNCATE).collect();
            let goal = Goal {
                id: Default::default(),
                name,
                text: goal_text,
                status: GoalStatus::Pending,
                codebase_id: codebase.map(|c| c.id),
                created_at: 0,
                updated_at: 0,
            };
            let goal = ctx.store.insert(goal)?;
            output::print_one(&serde_json::to_value(&goal)?, format)?;
        }
        GoalCommand::List => {
            let mut goals = ctx.store.all::<Goal>()?;
            goals.sort_by_key(|g| g.created_at);
            output::print_list(&goals, format, |g| format!("{} [{:?}] {}", g.id, g.status, g.name))?;
        }
        GoalCommand::Show { id } => {
            let goal: Goal = ctx.store.fetch(&id)?;
            output::print_one(&serde_json::to_value(&goal)?, format)?;
        }
        GoalCommand::Delete { id } => {
            ctx.store.fetch::<Goal>(&id)?;
            ctx.store.delete::<Goal>(&id)?;
            println!("OK: deleted goal {id}");
        }
        GoalCommand::Merge { id } => {
            let goal_id = GoalId::from_string(&id);
            let items = ctx.engine.list_items(Some(goal_id), None)?;
            for item in items.into_iter().filter(|i| i.status == swarm_core::WorkItemStatus::Done) {
                let Some(sandbox) = ctx.store.find_one::<swarm_core::Sandbox>(|s| {
                    item.worker_id.map(|w| s.worker_id == w).unwrap_or(false) && s.status == swarm_core::SandboxStatus::Active
                })?
                else {
                    continue;
                };
                let codebase: swarm_core::Codebase = ctx.store.fetch(sandbox.codebase_id.as_str())?;
                let outcome = ctx.sandbox.merge_back(&codebase, &sandbox).await?;
                println!("{}: {outcome:?}", item.id);
            }
        }
        GoalCommand::Report { id } => {
            let goal_id = GoalId::from_string(&id);
            let goal: Goal = ctx.store.fetch(&id)?;
            let summary = swarm_cost::summarize_goal(&ctx.store, goal_id)?;
            let items = ctx.engine.list_items(Some(goal_id), None)?;
            match format {
                OutputFormat::Json => {
                    let report = serde_json::json!({
                        "goal": goal,
                        "item_count": items.len(),
                        "total_cost_usd": summary.total_cost_usd,
                        "total_input_tokens": summary.total_input_tokens,
                        "total_output_tokens": summary.total_output_tokens,
                        "entry_count": summary.entry_count,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => {
                    println!("goal {} [{:?}] {}", goal.id, goal.status, goal.name);
                    println!("items: {}", items.len());
                    println!("spend: ${:.6} across {} cost entries", summary.total_cost_usd, summary.entry_count);
                }
            }
        }
    }
    Ok(())
}
