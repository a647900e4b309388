// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process registry of attached-worker supervisors (spec.md §4.E
//! "attached worker"). Implements [`swarm_engine::WorkerControl`] so the
//! engine's `reset` can request a graceful stop without depending on this
//! crate (SPEC_FULL.md §2).

use parking_lot::Mutex;
use std::collections::HashMap;
use swarm_core::WorkerId;
use swarm_engine::WorkerControl;
use tokio::sync::oneshot;

/// One outstanding attached child: a one-shot channel that, when sent,
/// asks the supervisor task to close the child's stdio and kill it.
pub struct AttachedRegistry {
    stops: Mutex<HashMap<WorkerId, oneshot::Sender<()>>>,
}

impl Default for AttachedRegistry {
    fn default() -> Self {
        Self { stops: Mutex::new(HashMap::new()) }
    }
}

impl AttachedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a supervisor's stop channel. Called once the attached
    /// child has been spawned.
    pub fn register(&self, worker_id: WorkerId, stop_tx: oneshot::Sender<()>) {
        self.stops.lock().insert(worker_id, stop_tx);
    }

    /// Drops the registration once the supervisor task observes exit.
    pub fn deregister(&self, worker_id: &WorkerId) {
        self.stops.lock().remove(worker_id);
    }

    /// `stop(worker_id)`: spec.md §4.E — `not_found` if no attached
    /// supervisor is registered.
    pub fn stop(&self, worker_id: &WorkerId) -> Result<(), swarm_core::SwarmError> {
        match self.stops.lock().remove(worker_id) {
            Some(tx) => {
                let _ = tx.send(());
                Ok(())
            }
            None => Err(swarm_core::SwarmError::not_found("attached_workers", worker_id.to_string())),
        }
    }
}

impl WorkerControl for AttachedRegistry {
    fn request_stop(&self, worker_id: &WorkerId) {
        let _ = self.stop(worker_id);
    }
}
