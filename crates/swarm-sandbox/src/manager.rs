// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Sandbox Manager (spec.md §4.C): per-worker isolated working
//! directories realized as worktree+branch pairs, merge-back by policy,
//! read-only conflict detection, and orphan reconciliation.

use std::path::PathBuf;
use std::sync::Arc;
use swarm_adapters::codehost::CodeHost;
use swarm_adapters::vcs::Vcs;
use swarm_bus::MessageBus;
use swarm_core::{Codebase, MergePolicy, Sandbox, SandboxStatus, SwarmError, Worker, WorkerStatus};
use swarm_store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReport {
    Clean,
    Conflicts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `manual` policy: nothing done except logging that the branch is
    /// ready for human review.
    ManualReadyForReview { branch: String },
    Merged { branch: String, into: String },
    PrOpened { url: String },
    /// PR creation failed; the detail is carried in the emitted signal
    /// (SPEC_FULL.md §9 resolves this ambiguity in favor of more information).
    PrFailed { detail: String },
}

pub struct SandboxManager {
    store: Arc<Store>,
    vcs: Arc<dyn Vcs>,
    code_host: Arc<dyn CodeHost>,
    bus: Arc<MessageBus>,
}

impl SandboxManager {
    pub fn new(store: Arc<Store>, vcs: Arc<dyn Vcs>, code_host: Arc<dyn CodeHost>, bus: Arc<MessageBus>) -> Self {
        Self { store, vcs, code_host, bus }
    }

    fn branch_name(worker_id: &str, branch_override: Option<&str>) -> String {
        branch_override.map(str::to_string).unwrap_or_else(|| format!("worker/{worker_id}"))
    }

    /// Create a sandbox for `worker` against `codebase`. On worktree-add
    /// failure, rolls back fully: no record inserted, no directory left.
    pub async fn create(
        &self,
        codebase: &Codebase,
        worker: &Worker,
        branch_override: Option<&str>,
    ) -> Result<Sandbox, SwarmError> {
        let repo_path = codebase
            .path
            .clone()
            .ok_or_else(|| SwarmError::CodebaseHasNoPath(codebase.name.clone()))?;

        let branch = Self::branch_name(worker.id.as_str(), branch_override);
        let sandbox_path = repo_path.join("workers").join(worker.id.as_str());

        self.vcs.worktree_add(&repo_path, &sandbox_path, &branch).await?;

        let sandbox = Sandbox {
            id: Default::default(),
            codebase_id: codebase.id,
            worker_id: worker.id,
            path: sandbox_path,
            branch,
            status: SandboxStatus::Active,
            removed_at: None,
            created_at: 0,
            updated_at: 0,
        };
        self.store.insert(sandbox).map_err(SwarmError::from)
    }

    /// Remove a sandbox: worktree-remove, then branch-delete (non-fatal if
    /// it fails — the branch may already be gone), then mark the record
    /// `removed`.
    pub async fn remove(&self, sandbox: &Sandbox, codebase: &Codebase, force: bool) -> Result<Sandbox, SwarmError> {
        let repo_path = codebase.path.clone().ok_or_else(|| SwarmError::CodebaseHasNoPath(codebase.name.clone()))?;
        self.vcs.worktree_remove(&repo_path, &sandbox.path, force).await?;

        if let Err(e) = self.vcs.branch_delete(&repo_path, &sandbox.branch).await {
            tracing::debug!(branch = %sandbox.branch, error = %e, "branch delete after sandbox removal failed (non-fatal)");
        }

        let mut updated = sandbox.clone();
        updated.status = SandboxStatus::Removed;
        updated.removed_at = Some(0); // stamped by Store::put's clock on write
        self.store.put(updated).map_err(SwarmError::from)
    }

    /// Read-only: files changed on the sandbox branch since divergence,
    /// intersected with files changed on main since the same merge-base.
    /// Any tool failure is treated conservatively as `Clean`.
    pub async fn check_conflicts(&self, codebase: &Codebase, sandbox: &Sandbox) -> ConflictReport {
        let Some(repo_path) = codebase.path.clone() else {
            return ConflictReport::Clean;
        };
        let main = match self.vcs.default_branch(&repo_path).await {
            Ok(b) => b,
            Err(_) => return ConflictReport::Clean,
        };
        let base = match self.vcs.merge_base(&repo_path, &sandbox.branch, &main).await {
            Ok(b) => b,
            Err(_) => return ConflictReport::Clean,
        };
        let sandbox_changed = match self.vcs.changed_files_since(&repo_path, &sandbox.branch, &base).await {
            Ok(files) => files,
            Err(_) => return ConflictReport::Clean,
        };
        let main_changed = match self.vcs.changed_files_since(&repo_path, &main, &base).await {
            Ok(files) => files,
            Err(_) => return ConflictReport::Clean,
        };

        let overlap: Vec<String> = sandbox_changed.into_iter().filter(|f| main_changed.contains(f)).collect();
        if overlap.is_empty() {
            ConflictReport::Clean
        } else {
            ConflictReport::Conflicts(overlap)
        }
    }

    /// Merge-back governed by the codebase's merge policy.
    pub async fn merge_back(&self, codebase: &Codebase, sandbox: &Sandbox) -> Result<MergeOutcome, SwarmError> {
        match codebase.merge_policy {
            MergePolicy::Manual => {
                tracing::info!(branch = %sandbox.branch, "branch ready for manual review");
                Ok(MergeOutcome::ManualReadyForReview { branch: sandbox.branch.clone() })
            }
            MergePolicy::Auto => {
                let repo_path = codebase.path.clone().ok_or_else(|| SwarmError::CodebaseHasNoPath(codebase.name.clone()))?;
                let main = self.vcs.default_branch(&repo_path).await?;
                self.vcs.checkout(&repo_path, &main).await?;
                self.vcs.merge_no_ff(&repo_path, &sandbox.branch).await?;
                Ok(MergeOutcome::Merged { branch: sandbox.branch.clone(), into: main })
            }
            MergePolicy::Pr => {
                let (Some(owner), Some(repo)) = (&codebase.code_host_owner, &codebase.code_host_repo) else {
                    let detail = "no code-host configuration on codebase".to_string();
                    self.emit_pr_signal(Err(detail.clone())).ok();
                    return Ok(MergeOutcome::PrFailed { detail });
                };
                let base = codebase.default_branch.clone().unwrap_or_else(|| "main".to_string());
                match self
                    .code_host
                    .open_pull_request(owner, repo, &sandbox.branch, &base, &sandbox.branch, "")
                    .await
                {
                    Ok(url) => {
                        self.emit_pr_signal(Ok(url.clone())).ok();
                        Ok(MergeOutcome::PrOpened { url })
                    }
                    Err(e) => {
                        let detail = e.to_string();
                        self.emit_pr_signal(Err(detail.clone())).ok();
                        Ok(MergeOutcome::PrFailed { detail })
                    }
                }
            }
        }
    }

    fn emit_pr_signal(&self, result: Result<String, String>) -> Result<(), SwarmError> {
        let (subject, body) = match result {
            Ok(url) => ("pr_opened".to_string(), url),
            Err(detail) => ("pr_failed".to_string(), detail),
        };
        self.bus.send("sandbox_manager", "overseer", &subject, &body, None).map(|_| ())
    }

    /// Mark any `active` Sandbox as `removed` when its Worker is absent or
    /// in status `{stopped, crashed}`. Returns the count reconciled.
    pub fn orphans_reconcile(&self) -> Result<usize, SwarmError> {
        let active = self.store.filter::<Sandbox>(|s| s.status == SandboxStatus::Active).map_err(SwarmError::from)?;
        let mut orphan_ids = Vec::new();
        for sandbox in &active {
            let worker = self.store.get::<Worker>(sandbox.worker_id.as_str()).map_err(SwarmError::from)?;
            let is_orphan = match worker {
                None => true,
                Some(w) => matches!(w.status, WorkerStatus::Stopped | WorkerStatus::Crashed),
            };
            if is_orphan {
                orphan_ids.push(sandbox.id);
            }
        }
        let count = orphan_ids.len();
        self.store
            .update_matching::<Sandbox>(
                |s| orphan_ids.contains(&s.id),
                |s| {
                    s.status = SandboxStatus::Removed;
                    s.removed_at = Some(0);
                },
            )
            .map_err(SwarmError::from)?;
        Ok(count)
    }

    pub fn sandbox_path(codebase_path: &PathBuf, worker_id: &str) -> PathBuf {
        codebase_path.join("workers").join(worker_id)
    }
}
