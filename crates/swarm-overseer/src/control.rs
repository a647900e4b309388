// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The overseer control loop (spec.md §4.G): subscribes to `signals:overseer`
//! and reacts to `job_complete`/`job_failed`/`budget_exceeded` notifications,
//! driving the retry protocol for failures.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use swarm_bus::MessageBus;
use swarm_core::{WorkItemId, WorkerId};
use swarm_engine::WorkItemEngine;
use swarm_store::Store;
use swarm_worker::WorkerLifecycle;

use crate::retry::{self, RetryOutcome};

/// Ephemeral, process-local overseer state (spec.md §5: "not persisted,
/// rebuilt from the store on restart" — a restarted overseer simply starts
/// every in-flight item's retry count back at zero).
pub struct Overseer {
    store: Arc<Store>,
    engine: Arc<WorkItemEngine>,
    lifecycle: Arc<WorkerLifecycle>,
    bus: Arc<MessageBus>,
    retry_counts: Mutex<HashMap<WorkItemId, u32>>,
    max_retries: u32,
    default_budget_usd: f64,
}

impl Overseer {
    pub fn new(
        store: Arc<Store>,
        engine: Arc<WorkItemEngine>,
        lifecycle: Arc<WorkerLifecycle>,
        bus: Arc<MessageBus>,
        max_retries: u32,
        default_budget_usd: f64,
    ) -> Self {
        Self { store, engine, lifecycle, bus, retry_counts: Mutex::new(HashMap::new()), max_retries, default_budget_usd }
    }

    /// Reacts to one signal addressed to `overseer`. Exposed separately from
    /// [`Self::run`] so tests can drive it without a live broadcast channel.
    pub async fn handle_signal(&self, from: &str, subject: &str) -> Option<RetryOutcome> {
        match subject {
            "job_failed" => {
                let worker_id = WorkerId::from_string(from);
                let outcome = retry::attempt_retry(
                    &self.store,
                    &self.engine,
                    &self.lifecycle,
                    &self.bus,
                    &self.retry_counts,
                    self.max_retries,
                    self.default_budget_usd,
                    worker_id,
                )
                .await;
                tracing::info!(worker = from, outcome = ?outcome, "job_failed handled");
                Some(outcome)
            }
            "job_complete" => {
                tracing::debug!(worker = from, "job_complete");
                None
            }
            _ => None,
        }
    }

    /// Runs forever, consuming `signals:overseer` as they arrive. Intended to
    /// be spawned as a supervised task (see [`crate::supervisor::Supervisor`]);
    /// a send-side lag drops the oldest unread signals rather than blocking
    /// the bus, matching the broadcast channel's bounded-buffer semantics.
    pub async fn run(&self) {
        let mut rx = self.bus.subscribe(&self.bus.topic("", "overseer"));
        loop {
            match rx.recv().await {
                Ok(signal) => {
                    self.handle_signal(&signal.from, &signal.subject).await;
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "overseer lagged behind signal bus");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_adapters::{FakeCodeHost, FakeVcs};
    use swarm_bus::TopicRegistry;
    use swarm_core::ids::RandomIdGen;
    use swarm_core::test_support::{fake_codebase, fake_goal, fake_work_item};
    use swarm_core::SystemClock;
    use swarm_engine::NoopWorkerControl;
    use swarm_sandbox::SandboxManager;
    use swarm_worker::{AttachedRegistry, WorkerConfig};

    fn overseer() -> (Overseer, tempfile::TempDir) {
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
        (Overseer::new(store, engine, lifecycle, bus, retry::DEFAULT_MAX_RETRIES, 10.0), dir)
    }

    #[tokio::test]
    async fn job_failed_drives_a_retry() {
        let (overseer, _dir) = overseer();
        let cb = overseer.store.insert(fake_codebase("cb")).unwrap();
        let goal = overseer.store.insert(fake_goal(cb.id)).unwrap();
        let item = overseer.store.insert(fake_work_item(goal.id, cb.id)).unwrap();
        let worker = overseer.lifecycle.spawn_attached(item.id, "w").await.unwrap();
        overseer.lifecycle.fail(worker.id, "boom").await.unwrap();

        let outcome = overseer.handle_signal(worker.id.as_str(), "job_failed").await;
        assert!(matches!(outcome, Some(RetryOutcome::Retried { .. })));
    }

    #[tokio::test]
    async fn job_complete_is_ignored() {
        let (overseer, _dir) = overseer();
        let outcome = overseer.handle_signal("bee-000001", "job_complete").await;
        assert_eq!(outcome, None);
    }
}
