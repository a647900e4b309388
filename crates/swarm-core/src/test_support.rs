// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared across crates, gated behind `test-support` so
//! production builds never link them in (mirrors the teacher's
//! `oj-core::test_support` convention).

use crate::ids::{CodebaseId, GoalId, RandomIdGen, WorkItemId};
use crate::records::{Codebase, Goal, GoalStatus, MergePolicy, WorkItem, WorkItemStatus};

pub fn fake_codebase(name: &str) -> Codebase {
    Codebase {
        id: CodebaseId::generate(&RandomIdGen),
        name: name.to_string(),
        path: Some(std::path::PathBuf::from(format!("/tmp/{name}"))),
        origin_url: None,
        merge_policy: MergePolicy::Manual,
        validation_command: None,
        code_host_owner: None,
        code_host_repo: None,
        default_branch: None,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn fake_goal(codebase_id: CodebaseId) -> Goal {
    Goal {
        id: GoalId::generate(&RandomIdGen),
        name: "goal".into(),
        text: "do the thing".into(),
        status: GoalStatus::Pending,
        codebase_id: Some(codebase_id),
        created_at: 0,
        updated_at: 0,
    }
}

pub fn fake_work_item(goal_id: GoalId, codebase_id: CodebaseId) -> WorkItem {
    WorkItem {
        id: WorkItemId::generate(&RandomIdGen),
        title: "item".into(),
        description: None,
        status: WorkItemStatus::Pending,
        goal_id,
        codebase_id,
        worker_id: None,
        priority: 0,
        created_at: 0,
        updated_at: 0,
    }
}
