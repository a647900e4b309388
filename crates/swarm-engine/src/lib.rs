// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-engine: the Work-Item Engine (spec.md §4.D) — the WorkItem state
//! machine, dependency DAG, goal-status derivation, and the stateful
//! [`WorkItemEngine`] that ties them to a [`swarm_store::Store`] and a
//! [`swarm_sandbox::SandboxManager`].

pub mod dependencies;
pub mod engine;
pub mod goal_status;
pub mod transitions;
pub mod worker_control;

pub use dependencies::would_create_cycle;
pub use engine::WorkItemEngine;
pub use goal_status::derive_status;
pub use transitions::Action;
pub use worker_control::{NoopWorkerControl, WorkerControl};
