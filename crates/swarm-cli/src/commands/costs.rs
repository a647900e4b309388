// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm costs {summary,record}`.

use crate::cli::CostsCommand;
use crate::context::Context;
use crate::output::OutputFormat;
use swarm_core::{GoalId, WorkerId};
use swarm_cost::CostAttrs;

pub async fn run(ctx: &Context, command: CostsCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        CostsCommand::Summary { goal } => {
            let goal_id = GoalId::from_string(&goal);
            let summary = swarm_cost::summarize_goal(&ctx.store, goal_id)?;
            match format {
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "total_cost_usd": summary.total_cost_usd,
                        "total_input_tokens": summary.total_input_tokens,
                        "total_output_tokens": summary.total_output_tokens,
                        "total_cache_read_tokens": summary.total_cache_read_tokens,
                        "total_cache_write_tokens": summary.total_cache_write_tokens,
                        "entry_count": summary.entry_count,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                OutputFormat::Text => {
                    println!("spend: ${:.6}", summary.total_cost_usd);
                    println!("input tokens: {}", summary.total_input_tokens);
                    println!("output tokens: {}", summary.total_output_tokens);
                    println!("cache read/write tokens: {}/{}", summary.total_cache_read_tokens, summary.total_cache_write_tokens);
                    println!("entries: {}", summary.entry_count);
                }
            }
        }
        CostsCommand::Record { worker, input, output, model } => {
            let worker_id = WorkerId::from_string(&worker);
            let attrs = CostAttrs {
                input_tokens: input,
                output_tokens: output,
                cache_read_tokens: 0,
                cache_write_tokens: 0,
                model: model.unwrap_or_else(|| ctx.config.costs.default_model.clone().unwrap_or_default()),
                cost_usd: None,
            };
            let entry = ctx.cost_recorder.record(worker_id, attrs)?;
            crate::output::print_one(&serde_json::to_value(&entry)?, format)?;
        }
    }
    Ok(())
}
