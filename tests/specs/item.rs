// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm item {list,show,create,deps}` specs.

use crate::prelude::*;

fn setup_goal_with_codebase(project: &Project) -> String {
    std::fs::create_dir_all(project.path().join("repo")).unwrap();
    project.swarm().args(&["codebase", "add", "repo", "--name", "demo"]).passes();
    let created = project
        .swarm()
        .args(&["goal", "new", "ship it", "--codebase", "demo", "--format", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&created.stdout()).unwrap();
    value["id"].as_str().unwrap().to_string()
}

#[test]
fn create_and_show_a_work_item() {
    let project = Project::initialized();
    let goal_id = setup_goal_with_codebase(&project);

    let created = project
        .swarm()
        .args(&["item", "create", "--goal", &goal_id, "--title", "write the code", "--format", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&created.stdout()).unwrap();
    let item_id = value["id"].as_str().unwrap();
    assert_eq!(value["status"], "pending");

    project.swarm().args(&["item", "show", item_id]).passes().stdout_has("write the code");
}

#[test]
fn list_filters_by_goal() {
    let project = Project::initialized();
    let goal_id = setup_goal_with_codebase(&project);
    project
        .swarm()
        .args(&["item", "create", "--goal", &goal_id, "--title", "first task"])
        .passes();

    project.swarm().args(&["item", "list", "--goal", &goal_id]).passes().stdout_has("first task");
}

#[test]
fn dependency_cycle_is_rejected() {
    let project = Project::initialized();
    let goal_id = setup_goal_with_codebase(&project);

    let a = item_id(&project, &goal_id, "task a");
    let b = item_id(&project, &goal_id, "task b");

    project.swarm().args(&["item", "deps", "add", "--item", &b, "--depends-on", &a]).passes();
    project
        .swarm()
        .args(&["item", "deps", "add", "--item", &a, "--depends-on", &b])
        .fails()
        .stderr_has("ERROR");
}

fn item_id(project: &Project, goal_id: &str, title: &str) -> String {
    let created = project
        .swarm()
        .args(&["item", "create", "--goal", goal_id, "--title", title, "--format", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&created.stdout()).unwrap();
    value["id"].as_str().unwrap().to_string()
}
