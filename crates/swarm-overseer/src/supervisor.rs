// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task supervision (SPEC_FULL.md §4.G ambient): the overseer loop, the
//! health patrol, and the cost tailer each run as a long-lived `tokio` task
//! that is restarted on panic so one misbehaving component cannot take the
//! whole daemon down with it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay before respawning a task that exited (by panic or early return).
/// Fixed rather than configurable: a crash loop tighter than this would
/// just burn CPU logging the same failure every few milliseconds.
const RESTART_BACKOFF: Duration = Duration::from_secs(1);

/// Owns the `JoinHandle`s of every supervised task; dropping it aborts them.
pub struct Supervisor {
    handles: Vec<JoinHandle<()>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self { handles: Vec::new() }
    }

    /// Spawns `make_task()` and keeps restarting it with [`RESTART_BACKOFF`]
    /// between attempts for as long as the supervisor lives. `name` is only
    /// used in logging.
    pub fn supervise<F, Fut>(&mut self, name: &'static str, make_task: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let make_task = Arc::new(make_task);
        let handle = tokio::spawn(async move {
            loop {
                let task = (make_task)();
                match tokio::spawn(task).await {
                    Ok(()) => {
                        tracing::warn!(task = name, "supervised task exited, restarting");
                    }
                    Err(e) if e.is_panic() => {
                        tracing::error!(task = name, "supervised task panicked, restarting");
                    }
                    Err(e) => {
                        tracing::warn!(task = name, error = %e, "supervised task cancelled, restarting");
                    }
                }
                tokio::time::sleep(RESTART_BACKOFF).await;
            }
        });
        self.handles.push(handle);
    }

    /// Aborts every supervised task. Used by graceful shutdown and by tests
    /// that don't want to wait out the process lifetime.
    pub fn shutdown(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
