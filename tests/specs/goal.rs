// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm goal {new,list,show,delete}` specs.

use crate::prelude::*;

#[test]
fn new_goal_without_a_codebase_still_succeeds() {
    let project = Project::initialized();
    project
        .swarm()
        .args(&["goal", "new", "ship the thing"])
        .passes()
        .stdout_has("\"text\":\"ship the thing\"")
        .stdout_has("\"status\":\"pending\"");
}

#[test]
fn goal_name_truncates_long_goal_text() {
    let project = Project::initialized();
    let long_text = "a".repeat(80);
    let out = project.swarm().args(&["goal", "new", &long_text]).passes();
    let stdout = out.stdout();
    // The display name is truncated to 48 chars; the full text is preserved.
    assert!(stdout.contains(&"a".repeat(48)));
    assert!(!stdout.contains(&format!("\"name\":\"{}\"", "a".repeat(49))));
}

#[test]
fn list_and_show_a_created_goal() {
    let project = Project::initialized();
    let created = project.swarm().args(&["goal", "new", "first goal", "--format", "json"]).passes();
    let id = extract_id(&created.stdout());

    project.swarm().args(&["goal", "list"]).passes().stdout_has("first goal");
    project.swarm().args(&["goal", "show", &id]).passes().stdout_has("first goal");
}

#[test]
fn delete_removes_the_goal() {
    let project = Project::initialized();
    let created = project.swarm().args(&["goal", "new", "throwaway", "--format", "json"]).passes();
    let id = extract_id(&created.stdout());

    project.swarm().args(&["goal", "delete", &id]).passes();
    project.swarm().args(&["goal", "show", &id]).fails();
}

fn extract_id(json: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    value["id"].as_str().unwrap().to_string()
}
