// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The health patrol's diagnostic battery (spec.md §4.G): nine named,
//! stable checks, each returning `{name, status, message, fixable?}`.
//! `run_all(fix)` applies the declared fix function to every fixable
//! warn/error result.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use swarm_core::{Sandbox, SandboxStatus, SwarmError, Worker, WorkerStatus};
use swarm_sandbox::SandboxManager;
use swarm_store::Store;

use crate::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct DiagnosticResult {
    pub name: &'static str,
    pub status: DiagnosticStatus,
    pub message: String,
    pub fixable: bool,
}

impl DiagnosticResult {
    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self { name, status: DiagnosticStatus::Ok, message: message.into(), fixable: false }
    }
    fn warn(name: &'static str, message: impl Into<String>, fixable: bool) -> Self {
        Self { name, status: DiagnosticStatus::Warn, message: message.into(), fixable }
    }
    fn error(name: &'static str, message: impl Into<String>, fixable: bool) -> Self {
        Self { name, status: DiagnosticStatus::Error, message: message.into(), fixable }
    }
}

/// The references every diagnostic/fix pair is run against.
pub struct DiagnosticContext {
    pub store: Arc<Store>,
    pub sandbox: Arc<SandboxManager>,
    pub workspace_root: PathBuf,
    pub vcs_binary: String,
    pub llm_binary: String,
    /// How long a worker may go without a heartbeat before it is "stale".
    pub stale_after: Duration,
}

pub async fn vcs_installed(ctx: &DiagnosticContext) -> DiagnosticResult {
    binary_installed("vcs_installed", &ctx.vcs_binary).await
}

pub async fn llm_installed(ctx: &DiagnosticContext) -> DiagnosticResult {
    binary_installed("llm_installed", &ctx.llm_binary).await
}

async fn binary_installed(name: &'static str, binary: &str) -> DiagnosticResult {
    let dir = std::env::temp_dir();
    match swarm_adapters::subprocess::run_with_timeout(binary, &["--version"], &dir, Duration::from_secs(5)).await {
        Ok(_) => DiagnosticResult::ok(name, format!("{binary} found on PATH")),
        Err(e) => DiagnosticResult::error(name, format!("{binary} not runnable: {e}"), false),
    }
}

pub fn workspace_initialized(ctx: &DiagnosticContext) -> DiagnosticResult {
    if paths::app_dir(&ctx.workspace_root).is_dir() {
        DiagnosticResult::ok("workspace_initialized", "workspace present")
    } else {
        DiagnosticResult::error("workspace_initialized", "no .swarm directory found", false)
    }
}

pub fn store_ok(ctx: &DiagnosticContext) -> DiagnosticResult {
    match ctx.store.all::<Worker>() {
        Ok(_) => DiagnosticResult::ok("store_ok", "store readable"),
        Err(e) => DiagnosticResult::error("store_ok", format!("store read failed: {e}"), false),
    }
}

pub fn config_valid(ctx: &DiagnosticContext) -> DiagnosticResult {
    let path = paths::config_path(&ctx.workspace_root);
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return DiagnosticResult::warn("config_valid", "config.toml missing", true);
    };
    match contents.parse::<toml::Value>() {
        Ok(_) => DiagnosticResult::ok("config_valid", "config.toml parses"),
        Err(e) => DiagnosticResult::error("config_valid", format!("config.toml invalid: {e}"), true),
    }
}

/// Read-only count of `Sandbox` rows marked `active` whose worker is absent
/// or terminal; does not mutate (the fix function does, via
/// [`SandboxManager::orphans_reconcile`]).
pub fn orphan_sandboxes(ctx: &DiagnosticContext) -> DiagnosticResult {
    let count = match count_orphans(&ctx.store) {
        Ok(n) => n,
        Err(e) => return DiagnosticResult::error("orphan_sandboxes", format!("scan failed: {e}"), false),
    };
    if count == 0 {
        DiagnosticResult::ok("orphan_sandboxes", "no orphaned sandboxes")
    } else {
        DiagnosticResult::warn("orphan_sandboxes", format!("{count} orphaned sandbox(es)"), true)
    }
}

fn count_orphans(store: &Store) -> Result<usize, SwarmError> {
    let active = store.filter::<Sandbox>(|s| s.status == SandboxStatus::Active).map_err(SwarmError::from)?;
    let mut count = 0;
    for sandbox in &active {
        let worker = store.get::<Worker>(sandbox.worker_id.as_str()).map_err(SwarmError::from)?;
        let is_orphan = match worker {
            None => true,
            Some(w) => matches!(w.status, WorkerStatus::Stopped | WorkerStatus::Crashed),
        };
        if is_orphan {
            count += 1;
        }
    }
    Ok(count)
}

/// A worker is "stale" when it is `starting`/`working`, has gone longer than
/// `stale_after` without a heartbeat (or never produced one), and has had a
/// full patrol cycle to do so (spec.md §8: "pid recorded but no log appears
/// within a full patrol cycle").
pub fn stale_workers(ctx: &DiagnosticContext, now_secs: u64) -> DiagnosticResult {
    let count = match count_stale(&ctx.store, ctx.stale_after, now_secs) {
        Ok(n) => n,
        Err(e) => return DiagnosticResult::error("stale_workers", format!("scan failed: {e}"), false),
    };
    if count == 0 {
        DiagnosticResult::ok("stale_workers", "no stale workers")
    } else {
        DiagnosticResult::warn("stale_workers", format!("{count} stale worker(s)"), true)
    }
}

fn count_stale(store: &Store, stale_after: Duration, now_secs: u64) -> Result<usize, SwarmError> {
    let threshold = stale_after.as_secs();
    let workers = store
        .filter::<Worker>(|w| matches!(w.status, WorkerStatus::Starting | WorkerStatus::Working))
        .map_err(SwarmError::from)?;
    Ok(workers
        .into_iter()
        .filter(|w| {
            let last_signal = w.last_heartbeat_at.unwrap_or(w.created_at);
            now_secs.saturating_sub(last_signal) >= threshold
        })
        .count())
}

pub fn overseer_workspace_present(ctx: &DiagnosticContext) -> DiagnosticResult {
    if paths::instructions_path(&ctx.workspace_root).is_file() {
        DiagnosticResult::ok("overseer_workspace_present", "overseer/INSTRUCTIONS.md present")
    } else {
        DiagnosticResult::warn("overseer_workspace_present", "overseer/INSTRUCTIONS.md missing", true)
    }
}

/// Best-effort, non-fixable: total bytes under the workspace's store
/// directory. No platform-specific free-space API is added; this is a
/// coarse signal, not a statvfs-backed capacity check.
pub fn disk_usage(ctx: &DiagnosticContext) -> DiagnosticResult {
    const WARN_BYTES: u64 = 500 * 1024 * 1024;
    let total = dir_size(&paths::store_dir(&ctx.workspace_root)).unwrap_or(0);
    if total >= WARN_BYTES {
        DiagnosticResult::warn("disk_usage", format!("store directory is {} MB", total / 1024 / 1024), false)
    } else {
        DiagnosticResult::ok("disk_usage", format!("store directory is {} KB", total / 1024))
    }
}

fn dir_size(path: &Path) -> std::io::Result<u64> {
    if !path.exists() {
        return Ok(0);
    }
    let mut total = 0;
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        total += if metadata.is_dir() { dir_size(&entry.path())? } else { metadata.len() };
    }
    Ok(total)
}

/// Runs the full battery, returning every result in a stable order.
pub async fn run_all(ctx: &DiagnosticContext, now_secs: u64, fix: bool) -> Vec<DiagnosticResult> {
    let mut results = vec![
        vcs_installed(ctx).await,
        llm_installed(ctx).await,
        workspace_initialized(ctx),
        store_ok(ctx),
        config_valid(ctx),
        orphan_sandboxes(ctx),
        stale_workers(ctx, now_secs),
        overseer_workspace_present(ctx),
        disk_usage(ctx),
    ];

    if fix {
        for result in &mut results {
            if !result.fixable || result.status == DiagnosticStatus::Ok {
                continue;
            }
            if apply_fix(ctx, result.name).await.is_ok() {
                result.status = DiagnosticStatus::Ok;
                result.message = format!("{} (auto-fixed)", result.message);
            }
        }
    }
    results
}

async fn apply_fix(ctx: &DiagnosticContext, name: &'static str) -> Result<(), SwarmError> {
    match name {
        "orphan_sandboxes" => {
            ctx.sandbox.orphans_reconcile()?;
            Ok(())
        }
        "stale_workers" => {
            let threshold = ctx.stale_after.as_secs();
            let now = ctx.store.now_secs();
            ctx.store
                .update_matching::<Worker>(
                    |w| {
                        matches!(w.status, WorkerStatus::Starting | WorkerStatus::Working)
                            && now.saturating_sub(w.last_heartbeat_at.unwrap_or(w.created_at)) >= threshold
                    },
                    |w| w.status = WorkerStatus::Crashed,
                )
                .map_err(SwarmError::from)?;
            Ok(())
        }
        "overseer_workspace_present" => {
            let dir = paths::overseer_dir(&ctx.workspace_root);
            std::fs::create_dir_all(&dir).map_err(|e| SwarmError::StorageError(e.to_string()))?;
            std::fs::write(paths::instructions_path(&ctx.workspace_root), paths::DEFAULT_INSTRUCTIONS)
                .map_err(|e| SwarmError::StorageError(e.to_string()))?;
            Ok(())
        }
        "config_valid" => {
            let dir = paths::app_dir(&ctx.workspace_root);
            std::fs::create_dir_all(&dir).map_err(|e| SwarmError::StorageError(e.to_string()))?;
            std::fs::write(paths::config_path(&ctx.workspace_root), DEFAULT_CONFIG_TOML)
                .map_err(|e| SwarmError::StorageError(e.to_string()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

const DEFAULT_CONFIG_TOML: &str = "\
[app]
version = \"0.1.0\"

[overseer]
max_workers = 5

[costs]
warn_threshold_usd = 5.0
budget_usd = 10.0
";
