// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace layout (spec.md §6): the fixed sub-paths under `.<app>/`
//! every diagnostic and the CLI's `init` agree on.

use std::path::{Path, PathBuf};

pub const APP_DIR: &str = ".swarm";

pub fn app_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(APP_DIR)
}

pub fn config_path(workspace_root: &Path) -> PathBuf {
    app_dir(workspace_root).join("config.toml")
}

pub fn overseer_dir(workspace_root: &Path) -> PathBuf {
    app_dir(workspace_root).join("overseer")
}

pub fn instructions_path(workspace_root: &Path) -> PathBuf {
    overseer_dir(workspace_root).join("INSTRUCTIONS.md")
}

pub fn run_dir(workspace_root: &Path) -> PathBuf {
    app_dir(workspace_root).join("run")
}

pub fn store_dir(workspace_root: &Path) -> PathBuf {
    app_dir(workspace_root).join("store")
}

pub const DEFAULT_INSTRUCTIONS: &str = "\
# Overseer Instructions

You are supervising a swarm of coding-agent workers against this workspace's
registered codebases. Consult `swarm doctor` if a worker appears stuck.
";
