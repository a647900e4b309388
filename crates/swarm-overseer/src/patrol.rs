// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The periodic health patrol (spec.md §4.G): every `interval` (default 30s)
//! runs the diagnostic battery, optionally auto-fixing what it can, and
//! raises a `health_alert` signal for anything left in `warn`/`error`.

use std::sync::Arc;
use std::time::Duration;
use swarm_bus::MessageBus;
use swarm_store::Store;

use crate::diagnostics::{self, DiagnosticContext, DiagnosticResult, DiagnosticStatus};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

pub struct Patrol {
    store: Arc<Store>,
    bus: Arc<MessageBus>,
    ctx: DiagnosticContext,
    interval: Duration,
    auto_fix: bool,
}

impl Patrol {
    pub fn new(store: Arc<Store>, bus: Arc<MessageBus>, ctx: DiagnosticContext, interval: Duration, auto_fix: bool) -> Self {
        Self { store, bus, ctx, interval, auto_fix }
    }

    /// Runs one patrol cycle, returning every diagnostic's result. A panic
    /// inside a single diagnostic never escapes `run_all` (each check is a
    /// plain function call, not a spawned task), so a single misbehaving
    /// check cannot take the patrol loop down with it.
    pub async fn tick(&self) -> Vec<DiagnosticResult> {
        let now = self.store.now_secs();
        let results = diagnostics::run_all(&self.ctx, now, self.auto_fix).await;
        for result in &results {
            if result.status != DiagnosticStatus::Ok {
                let severity = if result.status == DiagnosticStatus::Error { "error" } else { "warn" };
                let body = format!("{severity}: {} - {}", result.name, result.message);
                if let Err(e) = self.bus.send("patrol", "overseer", "health_alert", &body, None) {
                    tracing::debug!(error = %e, "failed to emit health_alert");
                }
            }
        }
        results
    }

    /// Runs [`Self::tick`] forever at `self.interval`. Intended to be wrapped
    /// by [`crate::supervisor::Supervisor`].
    pub async fn run(&self) {
        loop {
            let results = self.tick().await;
            let problems = results.iter().filter(|r| r.status != DiagnosticStatus::Ok).count();
            if problems > 0 {
                tracing::warn!(problems, "patrol cycle found issues");
            } else {
                tracing::debug!("patrol cycle clean");
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
