// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm budget --goal <id>`.

use crate::context::Context;
use crate::output::OutputFormat;
use swarm_core::GoalId;
use swarm_cost::BudgetStatus;

pub async fn run(ctx: &Context, goal: String, format: OutputFormat) -> anyhow::Result<()> {
    let goal_id = GoalId::from_string(&goal);
    let budget_usd = ctx.config.costs.budget_usd;
    let status = swarm_cost::check(&ctx.store, goal_id, budget_usd)?;

    match format {
        OutputFormat::Json => {
            let value = match status {
                BudgetStatus::Ok { remaining } => serde_json::json!({"status": "ok", "remaining": remaining}),
                BudgetStatus::Exceeded { spent } => serde_json::json!({"status": "exceeded", "spent": spent}),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => match status {
            BudgetStatus::Ok { remaining } => println!("OK: ${remaining:.6} remaining of ${budget_usd:.2}"),
            BudgetStatus::Exceeded { spent } => println!("WARN: budget exceeded, spent ${spent:.6} of ${budget_usd:.2}"),
        },
    }
    Ok(())
}
