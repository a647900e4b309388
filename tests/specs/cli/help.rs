// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help and usage output specs.

use crate::prelude::*;

#[test]
fn swarm_no_args_shows_usage() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn swarm_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn swarm_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn swarm_codebase_help_shows_subcommands() {
    cli()
        .args(&["codebase", "--help"])
        .passes()
        .stdout_has("add")
        .stdout_has("list")
        .stdout_has("remove");
}

#[test]
fn swarm_item_help_shows_subcommands() {
    cli()
        .args(&["item", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("create")
        .stdout_has("deps");
}

#[test]
fn swarm_without_workspace_reports_not_in_workspace() {
    let project = Project::empty();
    project.swarm().args(&["goal", "list"]).fails().stderr_has("ERROR");
}
