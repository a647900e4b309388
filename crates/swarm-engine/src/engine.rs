// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Work-Item Engine (spec.md §4.D): state machine + DAG scheduler.

use crate::dependencies::would_create_cycle;
use crate::goal_status::derive_status;
use crate::transitions::{self, Action};
use crate::worker_control::WorkerControl;
use std::sync::Arc;
use swarm_core::{Dependency, Goal, SwarmError, WorkItem, WorkItemId, WorkItemStatus, Worker, WorkerId, WorkerStatus};
use swarm_sandbox::SandboxManager;
use swarm_store::Store;

pub struct WorkItemEngine {
    store: Arc<Store>,
    sandbox: Arc<SandboxManager>,
    worker_control: Arc<dyn WorkerControl>,
}

impl WorkItemEngine {
    pub fn new(store: Arc<Store>, sandbox: Arc<SandboxManager>, worker_control: Arc<dyn WorkerControl>) -> Self {
        Self { store, sandbox, worker_control }
    }

    fn transition(&self, item_id: &str, action: Action) -> Result<WorkItem, SwarmError> {
        let mut item: WorkItem = self.store.fetch(item_id).map_err(SwarmError::from)?;
        transitions::apply(&mut item, action)?;
        self.store.put(item).map_err(SwarmError::from)
    }

    pub fn assign(&self, item_id: &str, worker_id: WorkerId) -> Result<WorkItem, SwarmError> {
        let mut item: WorkItem = self.store.fetch(item_id).map_err(SwarmError::from)?;
        transitions::apply(&mut item, Action::Assign)?;
        transitions::set_worker_ref(&mut item, worker_id);
        self.store.put(item).map_err(SwarmError::from)
    }

    pub fn start(&self, item_id: &str) -> Result<WorkItem, SwarmError> {
        self.transition(item_id, Action::Start)
    }

    pub fn complete(&self, item_id: &str) -> Result<WorkItem, SwarmError> {
        self.transition(item_id, Action::Complete)
    }

    pub fn fail(&self, item_id: &str) -> Result<WorkItem, SwarmError> {
        self.transition(item_id, Action::Fail)
    }

    pub fn block(&self, item_id: &str) -> Result<WorkItem, SwarmError> {
        self.transition(item_id, Action::Block)
    }

    pub fn unblock(&self, item_id: &str) -> Result<WorkItem, SwarmError> {
        self.transition(item_id, Action::Unblock)
    }

    /// `reset`: the state-machine transition (`failed -> pending`) must
    /// succeed; the worker-stop / sandbox-removal cleanup that follows is
    /// best-effort and never fails the call (spec.md §4.D).
    pub async fn reset(&self, item_id: &str) -> Result<WorkItem, SwarmError> {
        let mut item: WorkItem = self.store.fetch(item_id).map_err(SwarmError::from)?;
        let prior_worker = item.worker_id;
        transitions::apply(&mut item, Action::Reset)?;
        transitions::clear_worker_ref(&mut item);
        let item = self.store.put(item).map_err(SwarmError::from)?;

        if let Some(worker_id) = prior_worker {
            self.cleanup_worker_best_effort(worker_id).await;
        }
        Ok(item)
    }

    async fn cleanup_worker_best_effort(&self, worker_id: WorkerId) {
        let Ok(Some(worker)) = self.store.get::<Worker>(worker_id.as_str()) else {
            return;
        };

        if worker.status == WorkerStatus::Working {
            self.worker_control.request_stop(&worker_id);
        }

        if let Ok(Some(sandbox)) =
            self.store.find_one::<swarm_core::Sandbox>(|s| s.worker_id == worker_id && s.status == swarm_core::SandboxStatus::Active)
        {
            if let Ok(Some(codebase)) = self.store.get::<swarm_core::Codebase>(sandbox.codebase_id.as_str()) {
                if let Err(e) = self.sandbox.remove(&sandbox, &codebase, true).await {
                    tracing::debug!(error = %e, "best-effort sandbox removal during reset failed");
                }
            }
        }

        let mut stopped = worker;
        stopped.status = WorkerStatus::Stopped;
        if let Err(e) = self.store.put(stopped) {
            tracing::debug!(error = %e, "best-effort worker status update during reset failed");
        }
    }

    // --- dependency management -------------------------------------------------

    pub fn add_dependency(&self, from: WorkItemId, to: WorkItemId) -> Result<Dependency, SwarmError> {
        if from == to {
            return Err(SwarmError::SelfDependency(from.to_string()));
        }
        let existing = self.store.all::<Dependency>().map_err(SwarmError::from)?;
        if would_create_cycle(&existing, from, to) {
            return Err(SwarmError::CycleDetected { from: from.to_string(), to: to.to_string() });
        }
        let dep = Dependency { id: Default::default(), from, to, created_at: 0, updated_at: 0 };
        self.store.insert(dep).map_err(SwarmError::from)
    }

    pub fn remove_dependency(&self, from: WorkItemId, to: WorkItemId) -> Result<(), SwarmError> {
        let existing = self
            .store
            .find_one::<Dependency>(|d| d.from == from && d.to == to)
            .map_err(SwarmError::from)?
            .ok_or_else(|| SwarmError::not_found("dependencies", format!("{from}->{to}")))?;
        self.store.delete::<Dependency>(existing.id.as_str()).map_err(SwarmError::from)
    }

    pub fn dependencies(&self, item_id: WorkItemId) -> Result<Vec<Dependency>, SwarmError> {
        self.store.filter::<Dependency>(|d| d.from == item_id).map_err(SwarmError::from)
    }

    pub fn dependents(&self, item_id: WorkItemId) -> Result<Vec<Dependency>, SwarmError> {
        self.store.filter::<Dependency>(|d| d.to == item_id).map_err(SwarmError::from)
    }

    /// True iff every dependency edge's target is `done`. A dangling
    /// dependency (target deleted) is treated as satisfied.
    pub fn ready(&self, item_id: WorkItemId) -> Result<bool, SwarmError> {
        let deps = self.dependencies(item_id)?;
        for dep in deps {
            match self.store.get::<WorkItem>(dep.to.as_str()).map_err(SwarmError::from)? {
                Some(target) if target.status != WorkItemStatus::Done => return Ok(false),
                _ => {}
            }
        }
        Ok(true)
    }

    pub fn unblock_dependents(&self, item_id: WorkItemId) -> Result<Vec<WorkItem>, SwarmError> {
        let dependents = self.dependents(item_id)?;
        let mut unblocked = Vec::new();
        for dep in dependents {
            let item: WorkItem = self.store.fetch(dep.from.as_str()).map_err(SwarmError::from)?;
            if item.status == WorkItemStatus::Blocked && self.ready(item.id)? {
                unblocked.push(self.unblock(item.id.as_str())?);
            }
        }
        Ok(unblocked)
    }

    // --- goal status -------------------------------------------------------

    pub fn list_items(&self, goal_id: Option<swarm_core::GoalId>, codebase_id: Option<swarm_core::CodebaseId>) -> Result<Vec<WorkItem>, SwarmError> {
        self.store
            .filter::<WorkItem>(|i| {
                goal_id.map(|g| i.goal_id == g).unwrap_or(true) && codebase_id.map(|c| i.codebase_id == c).unwrap_or(true)
            })
            .map_err(SwarmError::from)
    }

    pub fn list_dependencies(&self, item_id: WorkItemId) -> Result<Vec<Dependency>, SwarmError> {
        self.store
            .filter::<Dependency>(|d| d.from == item_id || d.to == item_id)
            .map_err(SwarmError::from)
    }

    pub fn update_goal_status(&self, goal_id: &str) -> Result<Goal, SwarmError> {
        let goal: Goal = self.store.fetch(goal_id).map_err(SwarmError::from)?;
        let parsed = swarm_core::GoalId::from_string(goal_id);
        let items = self.list_items(Some(parsed), None)?;
        let statuses: Vec<_> = items.iter().map(|i| i.status).collect();
        let mut goal = goal;
        goal.status = derive_status(&statuses);
        self.store.put(goal).map_err(SwarmError::from)
    }
}
