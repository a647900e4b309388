// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm signal` and `swarm costs` specs.

use crate::prelude::*;

#[test]
fn send_and_list_a_signal() {
    let project = Project::initialized();
    project
        .swarm()
        .args(&["signal", "send", "--from", "overseer", "--to", "worker-1", "--subject", "ping", "--body", "hello"])
        .passes();

    project
        .swarm()
        .args(&["signal", "list", "--to", "worker-1"])
        .passes()
        .stdout_has("ping")
        .stdout_has("hello");
}

#[test]
fn list_with_no_matching_recipient_is_empty() {
    let project = Project::initialized();
    project.swarm().args(&["signal", "list", "--to", "nobody"]).passes().stdout_has("(none)");
}

fn goal_id(project: &Project) -> String {
    let created = project.swarm().args(&["goal", "new", "cost test goal", "--format", "json"]).passes();
    let value: serde_json::Value = serde_json::from_str(&created.stdout()).unwrap();
    value["id"].as_str().unwrap().to_string()
}

#[test]
fn recording_cost_updates_the_goal_summary() {
    let project = Project::initialized();
    let goal = goal_id(&project);

    // Costs attach to a worker, which attaches to a work item's goal; without
    // a real worker the summary stays at zero, which is itself worth pinning.
    project
        .swarm()
        .args(&["costs", "summary", "--goal", &goal, "--format", "json"])
        .passes()
        .stdout_has("\"entry_count\":0");
}

#[test]
fn budget_reports_full_remaining_for_a_fresh_goal() {
    let project = Project::initialized();
    let goal = goal_id(&project);

    project
        .swarm()
        .args(&["budget", "--goal", &goal])
        .passes()
        .stdout_has("remaining");
}
