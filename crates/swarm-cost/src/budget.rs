// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Budget accounting (spec.md §4.F): `spent_for`/`budget_for`/`remaining`/
//! `check`, consulted by the overseer before every retry spawn (§4.G).

use std::sync::Arc;
use swarm_core::{CostEntry, GoalId, SwarmError, WorkItem, WorkItemId, Worker, WorkerId};
use swarm_store::Store;

/// Every worker that has ever served any work item of `goal_id`, keyed by
/// the worker's own durable `work_item_id` rather than the item's current
/// `worker_id` — the item's reference moves on across retries, but a
/// retried-away worker's cost entries must still count toward the goal's
/// total spend (spec.md §8 S3: cost must accumulate across retries).
fn worker_ids_for_goal(store: &Store, goal_id: GoalId) -> Result<Vec<WorkerId>, SwarmError> {
    let items = store.filter::<WorkItem>(|i| i.goal_id == goal_id).map_err(SwarmError::from)?;
    let item_ids: Vec<WorkItemId> = items.iter().map(|i| i.id).collect();
    let workers = store
        .filter::<Worker>(|w| w.work_item_id.map(|id| item_ids.contains(&id)).unwrap_or(false))
        .map_err(SwarmError::from)?;
    Ok(workers.into_iter().map(|w| w.id).collect())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    Ok { remaining: f64 },
    Exceeded { spent: f64 },
}

fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Sum of `cost_usd` over every CostEntry whose worker is referenced by
/// any WorkItem of `goal_id`.
pub fn spent_for(store: &Store, goal_id: GoalId) -> Result<f64, SwarmError> {
    let worker_ids = worker_ids_for_goal(store, goal_id)?;
    let entries = store.filter::<CostEntry>(|e| worker_ids.contains(&e.worker_id)).map_err(SwarmError::from)?;
    Ok(round6(entries.iter().map(|e| e.cost_usd).sum()))
}

/// Configured per-goal budget, else the workspace-global default.
pub fn budget_for(per_goal_usd: Option<f64>, default_budget_usd: f64) -> f64 {
    per_goal_usd.unwrap_or(default_budget_usd)
}

pub fn remaining(budget_usd: f64, spent_usd: f64) -> f64 {
    round6(budget_usd - spent_usd)
}

/// Consulted by the overseer before every retry spawn (spec.md §4.G step 3).
pub fn check(store: &Store, goal_id: GoalId, budget_usd: f64) -> Result<BudgetStatus, SwarmError> {
    let spent = spent_for(store, goal_id)?;
    let remaining_usd = remaining(budget_usd, spent);
    if remaining_usd >= 0.0 {
        Ok(BudgetStatus::Ok { remaining: remaining_usd })
    } else {
        Ok(BudgetStatus::Exceeded { spent })
    }
}

/// Convenience used by `swarm-cli`'s `costs summary`: per-goal and
/// per-worker roll-ups over `Store::filter` (SPEC_FULL.md §4.F supplement).
pub struct GoalCostSummary {
    pub total_cost_usd: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cache_read_tokens: u64,
    pub total_cache_write_tokens: u64,
    pub entry_count: usize,
}

pub fn summarize_goal(store: &Arc<Store>, goal_id: GoalId) -> Result<GoalCostSummary, SwarmError> {
    let worker_ids = worker_ids_for_goal(store, goal_id)?;
    let entries = store.filter::<CostEntry>(|e| worker_ids.contains(&e.worker_id)).map_err(SwarmError::from)?;

    Ok(GoalCostSummary {
        total_cost_usd: round6(entries.iter().map(|e| e.cost_usd).sum()),
        total_input_tokens: entries.iter().map(|e| e.input_tokens).sum(),
        total_output_tokens: entries.iter().map(|e| e.output_tokens).sum(),
        total_cache_read_tokens: entries.iter().map(|e| e.cache_read_tokens).sum(),
        total_cache_write_tokens: entries.iter().map(|e| e.cache_write_tokens).sum(),
        entry_count: entries.len(),
    })
}
