// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The seven store-backed entities from the data model (spec.md §3), plus
//! the shared [`Record`] trait the Store uses to stamp timestamps and
//! resolve collection names/ID prefixes generically instead of needing a
//! hand-written CRUD module per entity.

use crate::ids::{CodebaseId, CostEntryId, DependencyId, GoalId, SandboxId, SignalId, WorkItemId, WorkerId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Implemented by every entity the Store persists. `id()`/`created_at()`/
/// `updated_at()` are used generically by `insert`/`put` to stamp
/// timestamps and fill identifiers without per-entity boilerplate.
pub trait Record: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static {
    /// The Store collection name this entity lives in, e.g. `"codebases"`.
    const COLLECTION: &'static str;
    /// The 3-letter ID prefix for this entity, e.g. `"cmb"`.
    const ID_PREFIX: &'static str;

    fn id_str(&self) -> String;
    fn created_at(&self) -> u64;
    fn set_created_at(&mut self, secs: u64);
    fn updated_at(&self) -> u64;
    fn set_updated_at(&mut self, secs: u64);
    /// If this record's ID is the unassigned sentinel, mint one with the
    /// given generator (spec.md §4.A: "fills missing identifiers using the
    /// kind prefix registered for the collection").
    fn ensure_id(&mut self, id_gen: &dyn crate::ids::IdGen);
}

macro_rules! impl_record {
    ($ty:ty, $collection:literal, $prefix:literal, $id_field:ident, $id_ty:ty) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;
            const ID_PREFIX: &'static str = $prefix;

            fn id_str(&self) -> String {
                self.$id_field.as_str().to_string()
            }
            fn created_at(&self) -> u64 {
                self.created_at
            }
            fn set_created_at(&mut self, secs: u64) {
                self.created_at = secs;
            }
            fn updated_at(&self) -> u64 {
                self.updated_at
            }
            fn set_updated_at(&mut self, secs: u64) {
                self.updated_at = secs;
            }
            fn ensure_id(&mut self, id_gen: &dyn crate::ids::IdGen) {
                if self.$id_field.is_unassigned() {
                    self.$id_field = <$id_ty>::generate(id_gen);
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    Manual,
    Auto,
    Pr,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::Manual
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Codebase {
    pub id: CodebaseId,
    pub name: String,
    pub path: Option<PathBuf>,
    pub origin_url: Option<String>,
    pub merge_policy: MergePolicy,
    pub validation_command: Option<String>,
    pub code_host_owner: Option<String>,
    pub code_host_repo: Option<String>,
    /// Cached detected main branch; refreshed by the sandbox manager's
    /// `auto` merge-back path (SPEC_FULL.md §3 supplement).
    pub default_branch: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(Codebase, "codebases", "cmb", id, CodebaseId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub text: String,
    pub status: GoalStatus,
    pub codebase_id: Option<CodebaseId>,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(Goal, "goals", "qst", id, GoalId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemStatus {
    Pending,
    Assigned,
    Running,
    Done,
    Failed,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub title: String,
    pub description: Option<String>,
    pub status: WorkItemStatus,
    pub goal_id: GoalId,
    pub codebase_id: CodebaseId,
    pub worker_id: Option<WorkerId>,
    /// Listing sort order only; never affects scheduling (SPEC_FULL.md §3).
    pub priority: i32,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(WorkItem, "work_items", "job", id, WorkItemId);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub from: WorkItemId,
    pub to: WorkItemId,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(Dependency, "dependencies", "jdp", id, DependencyId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Starting,
    Working,
    Stopped,
    Crashed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub status: WorkerStatus,
    pub work_item_id: Option<WorkItemId>,
    pub sandbox_path: Option<PathBuf>,
    pub pid: Option<u32>,
    /// Stamped whenever the cost tailer reads new bytes from this
    /// worker's log (SPEC_FULL.md §3 supplement; feeds stale-worker diagnostic).
    pub last_heartbeat_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(Worker, "workers", "bee", id, WorkerId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxStatus {
    Active,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sandbox {
    pub id: SandboxId,
    pub codebase_id: CodebaseId,
    pub worker_id: WorkerId,
    pub path: PathBuf,
    pub branch: String,
    pub status: SandboxStatus,
    pub removed_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(Sandbox, "sandboxes", "cel", id, SandboxId);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub metadata: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(Signal, "signals", "wag", id, SignalId);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEntry {
    pub id: CostEntryId,
    pub worker_id: WorkerId,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
    pub cost_usd: f64,
    pub model: String,
    pub recorded_at: u64,
    pub created_at: u64,
    pub updated_at: u64,
}
impl_record!(CostEntry, "cost_entries", "cst", id, CostEntryId);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RandomIdGen};

    #[test]
    fn record_trait_exposes_collection_and_prefix() {
        assert_eq!(WorkItem::COLLECTION, "work_items");
        assert_eq!(WorkItem::ID_PREFIX, "job");
    }

    #[test]
    fn set_created_updated_roundtrip() {
        let mut item = WorkItem {
            id: WorkItemId::generate(&RandomIdGen),
            title: "t".into(),
            description: None,
            status: WorkItemStatus::Pending,
            goal_id: GoalId::generate(&RandomIdGen),
            codebase_id: CodebaseId::generate(&RandomIdGen),
            worker_id: None,
            priority: 0,
            created_at: 0,
            updated_at: 0,
        };
        item.set_created_at(10);
        item.set_updated_at(20);
        assert_eq!(item.created_at(), 10);
        assert_eq!(item.updated_at(), 20);
    }
}
