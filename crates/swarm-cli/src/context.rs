// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace discovery and component wiring. Every subcommand but `init`
//! needs a live [`Context`]: the workspace root found by walking up from
//! the current directory (mirroring how the teacher's own tooling finds
//! its project root), the loaded [`Config`], and the full stack of
//! already-built components wired together in their dependency order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use swarm_adapters::{GitCli, NullCodeHost};
use swarm_bus::{MessageBus, TopicRegistry};
use swarm_core::ids::RandomIdGen;
use swarm_core::{SwarmError, SystemClock};
use swarm_cost::{CostRecorder, Tailer};
use swarm_engine::{NoopWorkerControl, WorkItemEngine};
use swarm_overseer::paths;
use swarm_sandbox::SandboxManager;
use swarm_store::Store;
use swarm_worker::{AttachedRegistry, WorkerConfig, WorkerLifecycle};

use crate::config::Config;

/// Everything a command needs, wired once at startup.
pub struct Context {
    pub workspace_root: PathBuf,
    pub config: Config,
    pub store: Arc<Store>,
    pub bus: Arc<MessageBus>,
    pub sandbox: Arc<SandboxManager>,
    pub engine: Arc<WorkItemEngine>,
    pub cost_recorder: Arc<CostRecorder>,
    pub tailer: Arc<Tailer>,
    pub attached: Arc<AttachedRegistry>,
    pub lifecycle: Arc<WorkerLifecycle>,
}

/// Walks up from `start` looking for a `.swarm` directory, the way `git`
/// walks up looking for `.git`.
fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if paths::app_dir(&dir).is_dir() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

impl Context {
    /// Discovers the workspace from the current directory and bootstraps
    /// every component. Fails with [`SwarmError::NotInWorkspace`] if no
    /// `.swarm` directory is found, with the hint already attached via
    /// `SwarmError::hint`.
    pub fn discover() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let workspace_root = find_workspace_root(&cwd)
            .ok_or_else(|| SwarmError::NotInWorkspace(cwd.display().to_string()))?;
        Self::bootstrap(workspace_root)
    }

    pub fn bootstrap(workspace_root: PathBuf) -> anyhow::Result<Self> {
        let config = Config::load(&paths::config_path(&workspace_root))?;

        let store = Arc::new(Store::new(
            paths::store_dir(&workspace_root),
            Arc::new(SystemClock),
            Arc::new(RandomIdGen),
        ));
        let bus = Arc::new(MessageBus::new(store.clone(), Arc::new(TopicRegistry::new())));
        let sandbox = Arc::new(SandboxManager::new(
            store.clone(),
            Arc::new(GitCli),
            Arc::new(NullCodeHost),
            bus.clone(),
        ));
        let engine = Arc::new(WorkItemEngine::new(store.clone(), sandbox.clone(), Arc::new(NoopWorkerControl)));
        let cost_recorder = Arc::new(CostRecorder::new(store.clone(), bus.clone(), config.pricing_table()));
        let tailer = Arc::new(Tailer::new(cost_recorder.clone()));
        let attached = Arc::new(AttachedRegistry::new());

        let worker_config = WorkerConfig {
            run_dir: paths::run_dir(&workspace_root),
            cli_path: std::env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "swarm".to_string()),
            llm_command: "claude".to_string(),
            llm_args: vec!["--print".to_string(), "--output-format".to_string(), "stream-json".to_string()],
            agent_profile_command: None,
        };
        let lifecycle = Arc::new(WorkerLifecycle::new(
            store.clone(),
            engine.clone(),
            sandbox.clone(),
            bus.clone(),
            tailer.clone(),
            attached.clone(),
            worker_config,
        ));

        Ok(Self {
            workspace_root,
            config,
            store,
            bus,
            sandbox,
            engine,
            cost_recorder,
            tailer,
            attached,
            lifecycle,
        })
    }

    pub fn config_path(&self) -> PathBuf {
        paths::config_path(&self.workspace_root)
    }

    /// Resolves an explicit `--codebase` name/id, falling back to
    /// `[session] current_codebase` (spec.md §6: "maintained by the CLI").
    pub fn resolve_codebase(&self, explicit: Option<&str>) -> anyhow::Result<swarm_core::Codebase> {
        let ident = explicit
            .map(str::to_string)
            .or_else(|| self.config.session.current_codebase.clone())
            .ok_or_else(|| SwarmError::MissingFields(vec!["codebase".to_string()]))?;

        if let Some(codebase) = self.store.get::<swarm_core::Codebase>(&ident)? {
            return Ok(codebase);
        }
        self.store
            .find_one::<swarm_core::Codebase>(|c| c.name == ident)?
            .ok_or_else(|| SwarmError::not_found("codebases", ident).into())
    }

    pub fn diagnostic_context(&self) -> swarm_overseer::DiagnosticContext {
        swarm_overseer::DiagnosticContext {
            store: self.store.clone(),
            sandbox: self.sandbox.clone(),
            workspace_root: self.workspace_root.clone(),
            vcs_binary: "git".to_string(),
            llm_binary: "claude".to_string(),
            stale_after: std::time::Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_workspace_root_walks_up_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".swarm")).unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_workspace_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn find_workspace_root_returns_none_outside_any_workspace() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_workspace_root(dir.path()), None);
    }
}
