// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm sandbox` and `swarm dashboard` specs.

use crate::prelude::*;

#[test]
fn sandbox_list_is_empty_on_a_fresh_workspace() {
    let project = Project::initialized();
    project.swarm().args(&["sandbox", "list"]).passes().stdout_has("(none)");
}

#[test]
fn sandbox_clean_reconciles_zero_orphans_on_a_fresh_workspace() {
    let project = Project::initialized();
    project.swarm().args(&["sandbox", "clean"]).passes().stdout_has("reconciled 0");
}

#[test]
fn dashboard_is_an_explicit_stub() {
    let project = Project::initialized();
    project.swarm().args(&["dashboard"]).fails();
}
