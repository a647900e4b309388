// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Goal status derivation (spec.md §4.D): a pure function of the multiset
//! of its WorkItems' statuses, computed rather than stored so it can never
//! drift from the items it summarizes.

use swarm_core::{GoalStatus, WorkItemStatus};

pub fn derive_status(statuses: &[WorkItemStatus]) -> GoalStatus {
    if statuses.is_empty() || statuses.iter().all(|s| *s == WorkItemStatus::Pending) {
        return GoalStatus::Pending;
    }
    if statuses.iter().all(|s| *s == WorkItemStatus::Done) {
        return GoalStatus::Completed;
    }
    if statuses.iter().any(|s| *s == WorkItemStatus::Failed) {
        return GoalStatus::Failed;
    }
    if statuses.iter().any(|s| matches!(s, WorkItemStatus::Running | WorkItemStatus::Assigned)) {
        return GoalStatus::Active;
    }
    GoalStatus::Pending
}
