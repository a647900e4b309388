// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WorkItem state machine (spec.md §4.D transition table).

use swarm_core::{SwarmError, WorkItem, WorkItemStatus, WorkerId};

/// One entry in spec.md's transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Assign,
    Start,
    Complete,
    Fail,
    Block,
    Unblock,
    Reset,
}

impl Action {
    fn name(self) -> &'static str {
        match self {
            Action::Assign => "assign",
            Action::Start => "start",
            Action::Complete => "complete",
            Action::Fail => "fail",
            Action::Block => "block",
            Action::Unblock => "unblock",
            Action::Reset => "reset",
        }
    }
}

/// Pure transition guard: the table from spec.md §4.D, with no side
/// effects and no store access. `assign`'s extra worker-ref write and
/// `reset`'s cleanup side effects are layered on in [`crate::WorkItemEngine`].
pub fn next_status(from: WorkItemStatus, action: Action) -> Option<WorkItemStatus> {
    use WorkItemStatus::*;
    match (from, action) {
        (Pending, Action::Assign) => Some(Assigned),
        (Pending, Action::Block) => Some(Blocked),
        (Assigned, Action::Start) => Some(Running),
        (Running, Action::Complete) => Some(Done),
        (Running, Action::Fail) => Some(Failed),
        (Running, Action::Block) => Some(Blocked),
        (Failed, Action::Reset) => Some(Pending),
        (Blocked, Action::Unblock) => Some(Pending),
        _ => None,
    }
}

/// Apply `action` to `item` in place, or return `invalid_transition`.
pub fn apply(item: &mut WorkItem, action: Action) -> Result<(), SwarmError> {
    let from = item.status;
    match next_status(from, action) {
        Some(to) => {
            item.status = to;
            Ok(())
        }
        None => Err(SwarmError::invalid_transition(item.id.to_string(), format!("{from:?}"), action.name())),
    }
}

pub fn status_label(status: WorkItemStatus) -> &'static str {
    match status {
        WorkItemStatus::Pending => "pending",
        WorkItemStatus::Assigned => "assigned",
        WorkItemStatus::Running => "running",
        WorkItemStatus::Done => "done",
        WorkItemStatus::Failed => "failed",
        WorkItemStatus::Blocked => "blocked",
    }
}

pub fn clear_worker_ref(item: &mut WorkItem) {
    item.worker_id = None;
}

pub fn set_worker_ref(item: &mut WorkItem, worker_id: WorkerId) {
    item.worker_id = Some(worker_id);
}
