// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm init` workspace bootstrap specs.

use crate::prelude::*;

#[test]
fn init_creates_the_fixed_workspace_tree() {
    let project = Project::empty();
    project.swarm().args(&["init"]).passes().stdout_has("OK: workspace initialized");

    assert!(project.path().join(".swarm/config.toml").is_file());
    assert!(project.path().join(".swarm/overseer/INSTRUCTIONS.md").is_file());
    assert!(project.path().join(".swarm/store").is_dir());
    assert!(project.path().join(".swarm/run").is_dir());
}

#[test]
fn init_twice_without_force_fails() {
    let project = Project::initialized();
    project.swarm().args(&["init"]).fails().stderr_has("ERROR");
}

#[test]
fn init_twice_with_force_succeeds() {
    let project = Project::initialized();
    project.swarm().args(&["init", "--force"]).passes();
}

#[test]
fn doctor_on_a_freshly_initialized_workspace_reports_workspace_and_store_ok() {
    let project = Project::initialized();
    // `claude` is unlikely to be on PATH in a test sandbox, so the overall
    // exit code isn't asserted here; only that the workspace-local checks ran.
    let mut cmd = project.swarm().args(&["doctor"]).command();
    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("workspace_initialized"));
    assert!(stdout.contains("store_ok"));
}
