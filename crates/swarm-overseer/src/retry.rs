// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The retry protocol (spec.md §4.G): five steps run on every `job_failed`
//! signal, consulting the budget before every retry spawn.

use parking_lot::Mutex;
use std::collections::HashMap;
use swarm_bus::MessageBus;
use swarm_core::{Worker, WorkItem, WorkItemId, WorkerId};
use swarm_cost::BudgetStatus;
use swarm_engine::WorkItemEngine;
use swarm_store::Store;
use swarm_worker::WorkerLifecycle;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome {
    /// A replacement attached worker is running.
    Retried { worker_id: WorkerId },
    /// The failed worker has no associated work item; nothing to retry.
    WorkItemMissing,
    /// `retry_counts[item_id] >= max_retries`.
    ExhaustedRetries,
    /// Budget consulted and found exceeded; a `budget_exceeded` signal was emitted.
    BudgetExceeded { spent: f64 },
    /// `reset` or the replacement spawn failed; the retry count is left unchanged.
    SpawnFailed,
}

/// Step 1-5 of the retry protocol for a single `job_failed(failed_worker_id)`.
///
/// `retry_counts` is the overseer's ephemeral per-item attempt count, shared
/// across calls (only the overseer mutates it, per §4.G shared-resource policy).
pub async fn attempt_retry(
    store: &Store,
    engine: &WorkItemEngine,
    lifecycle: &WorkerLifecycle,
    bus: &MessageBus,
    retry_counts: &Mutex<HashMap<WorkItemId, u32>>,
    max_retries: u32,
    default_budget_usd: f64,
    failed_worker_id: WorkerId,
) -> RetryOutcome {
    // Step 1: look up the worker's work item.
    let Ok(Some(worker)) = store.get::<Worker>(failed_worker_id.as_str()) else {
        return RetryOutcome::WorkItemMissing;
    };
    let Some(item_id) = worker.work_item_id else {
        return RetryOutcome::WorkItemMissing;
    };
    let Ok(Some(item)) = store.get::<WorkItem>(item_id.as_str()) else {
        return RetryOutcome::WorkItemMissing;
    };

    // Step 2: retry-count ceiling.
    let n = *retry_counts.lock().get(&item_id).unwrap_or(&0);
    if n >= max_retries {
        tracing::warn!(item_id = %item_id, attempts = n, "retry exhausted");
        return RetryOutcome::ExhaustedRetries;
    }

    // Step 3: budget check.
    let budget_usd = swarm_cost::budget_for(None, default_budget_usd);
    match swarm_cost::check(store, item.goal_id, budget_usd) {
        Ok(BudgetStatus::Exceeded { spent }) => {
            tracing::warn!(goal_id = %item.goal_id, spent, "retry refused: budget exceeded");
            let _ = bus.send("overseer", "overseer", "budget_exceeded", &format!("{spent:.6}"), None);
            return RetryOutcome::BudgetExceeded { spent };
        }
        Err(e) => {
            tracing::debug!(error = %e, "budget check failed, treating as refused");
            return RetryOutcome::SpawnFailed;
        }
        Ok(BudgetStatus::Ok { .. }) => {}
    }

    // Step 4: forced cleanup of the prior attempt.
    if let Err(e) = engine.reset(item_id.as_str()).await {
        tracing::warn!(item_id = %item_id, error = %e, "reset before retry failed");
        return RetryOutcome::SpawnFailed;
    }

    // Step 5: spawn a replacement attached worker.
    let name = format!("retry-{item_id}");
    match lifecycle.spawn_attached(item_id, &name).await {
        Ok(replacement) => {
            retry_counts.lock().entry(item_id).and_modify(|c| *c += 1).or_insert(1);
            RetryOutcome::Retried { worker_id: replacement.id }
        }
        Err(e) => {
            tracing::warn!(item_id = %item_id, error = %e, "retry spawn failed");
            RetryOutcome::SpawnFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swarm_adapters::{FakeCodeHost, FakeVcs};
    use swarm_bus::TopicRegistry;
    use swarm_core::ids::RandomIdGen;
    use swarm_core::test_support::{fake_codebase, fake_goal, fake_work_item};
    use swarm_core::{CostEntry, SystemClock};
    use swarm_engine::NoopWorkerControl;
    use swarm_sandbox::SandboxManager;
    use swarm_worker::{AttachedRegistry, WorkerConfig};

    struct Harness {
        store: Arc<Store>,
        engine: Arc<WorkItemEngine>,
        lifecycle: Arc<WorkerLifecycle>,
        bus: Arc<MessageBus>,
        _dir: tempfile::TempDir,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(dir.path(), Arc::new(SystemClock), Arc::new(RandomIdGen)));
        let bus = Arc::new(MessageBus::new(store.clone(), Arc::new(TopicRegistry::new())));
        let sandbox = Arc::new(SandboxManager::new(store.clone(), Arc::new(FakeVcs::new()), Arc::new(FakeCodeHost::default()), bus.clone()));
        let engine = Arc::new(WorkItemEngine::new(store.clone(), sandbox.clone(), Arc::new(NoopWorkerControl)));
        let pricing = swarm_cost::PricingTable { models: Default::default(), default_model: "M".into() };
        let recorder = Arc::new(swarm_cost::CostRecorder::new(store.clone(), bus.clone(), pricing));
        let tailer = Arc::new(swarm_cost::Tailer::new(recorder));
        let registry = Arc::new(AttachedRegistry::new());
        let config = WorkerConfig {
            run_dir: dir.path().join("run"),
            cli_path: "swarm".into(),
            llm_command: "true".into(),
            llm_args: vec![],
            agent_profile_command: None,
        };
        let lifecycle = Arc::new(WorkerLifecycle::new(store.clone(), engine.clone(), sandbox, bus.clone(), tailer, registry, config));
        Harness { store, engine, lifecycle, bus, _dir: dir }
    }

    // S3: retry under budget, then refused once it's exceeded.
    #[tokio::test]
    async fn s3_retry_then_budget_exceeded() {
        let h = harness();
        let cb = h.store.insert(fake_codebase("cb")).unwrap();
        let goal = h.store.insert(fake_goal(cb.id)).unwrap();
        let item = h.store.insert(fake_work_item(goal.id, cb.id)).unwrap();
        let retry_counts = Mutex::new(HashMap::new());

        let worker = h.lifecycle.spawn_attached(item.id, "w").await.unwrap();
        h.lifecycle.fail(worker.id, "boom").await.unwrap();
        h.store.insert(CostEntry {
            id: Default::default(), worker_id: worker.id, input_tokens: 0, output_tokens: 0,
            cache_read_tokens: 0, cache_write_tokens: 0, cost_usd: 0.10, model: "M".into(),
            recorded_at: 0, created_at: 0, updated_at: 0,
        }).unwrap();

        let outcome = attempt_retry(&h.store, &h.engine, &h.lifecycle, &h.bus, &retry_counts, DEFAULT_MAX_RETRIES, 1.0, worker.id).await;
        let worker2 = match outcome {
            RetryOutcome::Retried { worker_id } => worker_id,
            other => panic!("expected Retried, got {other:?}"),
        };
        assert_eq!(*retry_counts.lock().get(&item.id).unwrap(), 1);

        h.lifecycle.fail(worker2, "boom again").await.unwrap();
        h.store.insert(CostEntry {
            id: Default::default(), worker_id: worker2, input_tokens: 0, output_tokens: 0,
            cache_read_tokens: 0, cache_write_tokens: 0, cost_usd: 1.40, model: "M".into(),
            recorded_at: 0, created_at: 0, updated_at: 0,
        }).unwrap();

        let outcome = attempt_retry(&h.store, &h.engine, &h.lifecycle, &h.bus, &retry_counts, DEFAULT_MAX_RETRIES, 1.0, worker2).await;
        assert_eq!(outcome, RetryOutcome::BudgetExceeded { spent: 1.50 });
    }

    #[tokio::test]
    async fn exhausted_retry_count_gives_up_without_spawning() {
        let h = harness();
        let cb = h.store.insert(fake_codebase("cb")).unwrap();
        let goal = h.store.insert(fake_goal(cb.id)).unwrap();
        let item = h.store.insert(fake_work_item(goal.id, cb.id)).unwrap();
        let worker = h.lifecycle.spawn_attached(item.id, "w").await.unwrap();
        h.lifecycle.fail(worker.id, "boom").await.unwrap();

        let retry_counts = Mutex::new(HashMap::from([(item.id, 3)]));
        let outcome = attempt_retry(&h.store, &h.engine, &h.lifecycle, &h.bus, &retry_counts, DEFAULT_MAX_RETRIES, 10.0, worker.id).await;
        assert_eq!(outcome, RetryOutcome::ExhaustedRetries);
    }

    #[tokio::test]
    async fn worker_with_no_work_item_is_a_noop() {
        let h = harness();
        let worker_id = WorkerId::from_string("bee-ffffff");
        let retry_counts = Mutex::new(HashMap::new());
        let outcome = attempt_retry(&h.store, &h.engine, &h.lifecycle, &h.bus, &retry_counts, DEFAULT_MAX_RETRIES, 10.0, worker_id).await;
        assert_eq!(outcome, RetryOutcome::WorkItemMissing);
    }
}
