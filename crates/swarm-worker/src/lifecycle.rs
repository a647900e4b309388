// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Worker Lifecycle (spec.md §4.E): attached in-process supervision
//! and detached fully-independent OS processes, plus the durable
//! `worker complete` / `worker fail` callback handlers that are the
//! completion channel for detached workers.

use crate::attached::AttachedRegistry;
use crate::profile;
use crate::wrapper;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use swarm_bus::MessageBus;
use swarm_core::{SwarmError, Worker, WorkerId, WorkerStatus, WorkItem, WorkItemId, WorkItemStatus};
use swarm_cost::Tailer;
use swarm_engine::WorkItemEngine;
use swarm_sandbox::SandboxManager;
use swarm_store::Store;
use tokio::io::AsyncWriteExt;

/// Static configuration for how workers are spawned; analogous to the
/// workspace-level settings in spec.md §6.
pub struct WorkerConfig {
    pub run_dir: PathBuf,
    pub cli_path: String,
    pub llm_command: String,
    pub llm_args: Vec<String>,
    pub agent_profile_command: Option<(String, Vec<String>)>,
}

pub struct WorkerLifecycle {
    store: Arc<Store>,
    engine: Arc<WorkItemEngine>,
    sandbox: Arc<SandboxManager>,
    bus: Arc<MessageBus>,
    tailer: Arc<Tailer>,
    registry: Arc<AttachedRegistry>,
    config: WorkerConfig,
}

impl WorkerLifecycle {
    pub fn new(
        store: Arc<Store>,
        engine: Arc<WorkItemEngine>,
        sandbox: Arc<SandboxManager>,
        bus: Arc<MessageBus>,
        tailer: Arc<Tailer>,
        registry: Arc<AttachedRegistry>,
        config: WorkerConfig,
    ) -> Self {
        Self { store, engine, sandbox, bus, tailer, registry, config }
    }

    /// The nine-step detached sequence (spec.md §4.E), each step failing
    /// cleanly if the prior one failed.
    pub async fn spawn_detached(&self, item_id: WorkItemId, name: &str) -> Result<Worker, SwarmError> {
        if !self.engine.ready(item_id)? {
            return Err(SwarmError::Blocked(item_id.to_string()));
        }
        let item: WorkItem = self.store.fetch(item_id.as_str()).map_err(SwarmError::from)?;

        let worker = self.store.insert(Worker {
            id: Default::default(),
            name: name.to_string(),
            status: WorkerStatus::Starting,
            work_item_id: Some(item_id),
            sandbox_path: None,
            pid: None,
            last_heartbeat_at: None,
            created_at: 0,
            updated_at: 0,
        }).map_err(SwarmError::from)?;

        self.engine.assign(item_id.as_str(), worker.id)?;

        let codebase = self.store.fetch(item.codebase_id.as_str()).map_err(SwarmError::from)?;
        let sandbox = self.sandbox.create(&codebase, &worker, None).await?;

        let mut worker = worker;
        worker.status = WorkerStatus::Working;
        worker.sandbox_path = Some(sandbox.path.clone());
        let worker = self.store.put(worker).map_err(SwarmError::from)?;

        if item.status == WorkItemStatus::Assigned {
            self.engine.start(item_id.as_str())?;
        }

        let profile_path = sandbox.path.join("AGENT_PROFILE.md");
        let profile_cmd = self.config.agent_profile_command.as_ref().map(|(p, a)| (p.as_str(), a.iter().map(String::as_str).collect::<Vec<_>>()));
        profile::generate(&sandbox.path, &profile_path, profile_cmd.as_ref().map(|(p, a)| (*p, a.as_slice()))).await;

        let log_path = wrapper::log_path(&self.config.run_dir, worker.id.as_str());
        let script = wrapper::render(worker.id.as_str(), &sandbox.path, &log_path, &self.config.cli_path, &self.config.llm_command, &self.config.llm_args)?;
        let script_path = wrapper::script_path(&self.config.run_dir, worker.id.as_str());
        tokio::fs::create_dir_all(&self.config.run_dir).await.map_err(|e| SwarmError::StorageError(e.to_string()))?;
        tokio::fs::write(&script_path, script).await.map_err(|e| SwarmError::StorageError(e.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o755);
            tokio::fs::set_permissions(&script_path, perms).await.map_err(|e| SwarmError::StorageError(e.to_string()))?;
        }

        self.tailer.watch(worker.id, log_path);

        let mut cmd = tokio::process::Command::new("nohup");
        cmd.arg(&script_path).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        let child = cmd.spawn().map_err(|e| SwarmError::ToolFailure(format!("failed to spawn wrapper: {e}")))?;
        let pid = child.id();
        // Detach: never awaited, never killed on drop (kill_on_drop defaults to false).
        drop(child);

        let mut worker = worker;
        worker.pid = pid;
        self.store.put(worker).map_err(SwarmError::from)
    }

    /// Attached worker: the LLM runs as a supervised child of this
    /// process, stdout piped to the same per-worker log file the cost
    /// tailer already knows how to watch.
    pub async fn spawn_attached(&self, item_id: WorkItemId, name: &str) -> Result<Worker, SwarmError> {
        if !self.engine.ready(item_id)? {
            return Err(SwarmError::Blocked(item_id.to_string()));
        }
        let item: WorkItem = self.store.fetch(item_id.as_str()).map_err(SwarmError::from)?;

        let worker = self.store.insert(Worker {
            id: Default::default(),
            name: name.to_string(),
            status: WorkerStatus::Starting,
            work_item_id: Some(item_id),
            sandbox_path: None,
            pid: None,
            last_heartbeat_at: None,
            created_at: 0,
            updated_at: 0,
        }).map_err(SwarmError::from)?;
        self.engine.assign(item_id.as_str(), worker.id)?;

        let codebase = self.store.fetch(item.codebase_id.as_str()).map_err(SwarmError::from)?;
        let sandbox = self.sandbox.create(&codebase, &worker, None).await?;

        let mut worker = worker;
        worker.status = WorkerStatus::Working;
        worker.sandbox_path = Some(sandbox.path.clone());
        let worker = self.store.put(worker).map_err(SwarmError::from)?;
        if item.status == WorkItemStatus::Assigned {
            self.engine.start(item_id.as_str())?;
        }

        let log_path = wrapper::log_path(&self.config.run_dir, worker.id.as_str());
        tokio::fs::create_dir_all(&self.config.run_dir).await.map_err(|e| SwarmError::StorageError(e.to_string()))?;
        self.tailer.watch(worker.id, log_path.clone());

        let mut cmd = tokio::process::Command::new(&self.config.llm_command);
        cmd.args(&self.config.llm_args)
            .current_dir(&sandbox.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let mut child = cmd.spawn().map_err(|e| SwarmError::ToolFailure(format!("failed to spawn attached worker: {e}")))?;

        let mut log_file = tokio::fs::File::create(&log_path).await.map_err(|e| SwarmError::StorageError(e.to_string()))?;
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.registry.register(worker.id, stop_tx);

        let mut stdout = child.stdout.take();
        let worker_id = worker.id;
        let registry = self.registry.clone();
        tokio::spawn(async move {
            use tokio::io::AsyncReadExt;
            let mut buf = [0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        let _ = child.start_kill();
                        break;
                    }
                    result = child.wait() => {
                        let _ = result;
                        break;
                    }
                    n = async {
                        match stdout.as_mut() {
                            Some(s) => s.read(&mut buf).await,
                            None => std::future::pending().await,
                        }
                    } => {
                        match n {
                            Ok(0) | Err(_) => {}
                            Ok(n) => { let _ = log_file.write_all(&buf[..n]).await; }
                        }
                    }
                }
            }
            registry.deregister(&worker_id);
        });

        Ok(worker)
    }

    /// `worker complete <id>` callback (spec.md §4.E): the durable
    /// completion channel for detached workers, also used by attached
    /// supervisors that observe a clean exit.
    pub async fn complete(&self, worker_id: WorkerId) -> Result<(), SwarmError> {
        self.finish(worker_id, true, None).await
    }

    /// `worker fail <id> --reason <text>` callback.
    pub async fn fail(&self, worker_id: WorkerId, reason: &str) -> Result<(), SwarmError> {
        self.finish(worker_id, false, Some(reason.to_string())).await
    }

    async fn finish(&self, worker_id: WorkerId, success: bool, reason: Option<String>) -> Result<(), SwarmError> {
        let mut worker: Worker = self.store.fetch(worker_id.as_str()).map_err(SwarmError::from)?;
        worker.status = if success { WorkerStatus::Stopped } else { WorkerStatus::Crashed };
        let worker = self.store.put(worker).map_err(SwarmError::from)?;

        let log_path = wrapper::log_path(&self.config.run_dir, worker_id.as_str());
        let _ = self.tailer.final_parse(worker_id, &log_path).await;
        self.tailer.unwatch(&worker_id);

        if let Some(item_id) = worker.work_item_id {
            if success {
                self.engine.complete(item_id.as_str())?;
                self.engine.unblock_dependents(item_id)?;
                self.bus.send(worker_id.as_str(), "overseer", "job_complete", "", None)?;
            } else {
                self.engine.fail(item_id.as_str())?;
                let body = reason.unwrap_or_default();
                self.bus.send(worker_id.as_str(), "overseer", "job_failed", &body, None)?;
            }
        }
        Ok(())
    }

    pub fn stop(&self, worker_id: &WorkerId) -> Result<(), SwarmError> {
        self.registry.stop(worker_id)
    }
}
