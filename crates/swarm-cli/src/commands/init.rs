// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm init`: lays down the fixed `.swarm/{config.toml, overseer/INSTRUCTIONS.md, run/, store/}` tree.

use std::path::Path;
use swarm_core::SwarmError;
use swarm_overseer::paths;

use crate::config::Config;

pub fn run(workspace_root: &Path, force: bool, quick: bool) -> anyhow::Result<()> {
    let app_dir = paths::app_dir(workspace_root);
    if app_dir.is_dir() && !force {
        return Err(SwarmError::AlreadyExists(app_dir.display().to_string()).into());
    }

    std::fs::create_dir_all(paths::store_dir(workspace_root))?;
    std::fs::create_dir_all(paths::run_dir(workspace_root))?;
    std::fs::create_dir_all(paths::overseer_dir(workspace_root))?;

    let config_path = paths::config_path(workspace_root);
    if !config_path.exists() || force {
        Config::default().save(&config_path)?;
    }

    let instructions_path = paths::instructions_path(workspace_root);
    if !instructions_path.exists() || force {
        std::fs::write(&instructions_path, paths::DEFAULT_INSTRUCTIONS)?;
    }

    println!("OK: workspace initialized at {}", app_dir.display());
    if !quick {
        println!("Next: `swarm codebase add <path>` then `swarm goal new \"<goal>\"`.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_lays_down_the_fixed_tree() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false, true).unwrap();
        assert!(paths::config_path(dir.path()).is_file());
        assert!(paths::instructions_path(dir.path()).is_file());
        assert!(paths::store_dir(dir.path()).is_dir());
        assert!(paths::run_dir(dir.path()).is_dir());
    }

    #[test]
    fn init_twice_without_force_fails() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false, true).unwrap();
        let err = run(dir.path(), false, true).unwrap_err();
        assert!(err.downcast_ref::<SwarmError>().is_some());
    }

    #[test]
    fn init_twice_with_force_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false, true).unwrap();
        run(dir.path(), true, true).unwrap();
    }
}
