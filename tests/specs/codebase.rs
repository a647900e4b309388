// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm codebase {add,list,remove,use}` specs.

use crate::prelude::*;

#[test]
fn add_list_and_remove_a_local_codebase() {
    let project = Project::initialized();
    std::fs::create_dir_all(project.path().join("repo")).unwrap();

    project
        .swarm()
        .args(&["codebase", "add", "repo", "--name", "demo"])
        .passes()
        .stdout_has("\"name\":\"demo\"");

    project.swarm().args(&["codebase", "list"]).passes().stdout_has("demo");

    project.swarm().args(&["codebase", "remove", "demo"]).passes().stdout_has("OK: removed codebase demo");

    project.swarm().args(&["codebase", "list"]).passes().stdout_has("(none)");
}

#[test]
fn adding_a_duplicate_name_fails() {
    let project = Project::initialized();
    std::fs::create_dir_all(project.path().join("repo")).unwrap();

    project.swarm().args(&["codebase", "add", "repo", "--name", "demo"]).passes();
    project
        .swarm()
        .args(&["codebase", "add", "repo", "--name", "demo"])
        .fails()
        .stderr_has("ERROR");
}

#[test]
fn name_defaults_to_the_path_basename() {
    let project = Project::initialized();
    std::fs::create_dir_all(project.path().join("my-service")).unwrap();

    project
        .swarm()
        .args(&["codebase", "add", "my-service"])
        .passes()
        .stdout_has("\"name\":\"my-service\"");
}

#[test]
fn use_sets_the_session_default_codebase() {
    let project = Project::initialized();
    std::fs::create_dir_all(project.path().join("repo")).unwrap();
    project.swarm().args(&["codebase", "add", "repo", "--name", "demo"]).passes();

    project.swarm().args(&["codebase", "use", "demo"]).passes().stdout_has("OK: current codebase set to demo");

    let config = std::fs::read_to_string(project.path().join(".swarm/config.toml")).unwrap();
    assert!(config.contains("current_codebase"));
}
