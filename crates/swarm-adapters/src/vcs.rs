// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The version-control operations the Sandbox Manager requires (spec.md
//! §6: "the version-control tool itself; we specify only the operations we
//! require of it"). `GitCli` shells out to a real `git` binary through
//! [`crate::subprocess::run_with_timeout`]; `FakeVcs` is an in-memory
//! double used by sandbox-manager unit tests so they never touch a real
//! git binary.

use crate::subprocess::run_with_timeout;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use swarm_core::SwarmError;

const VCS_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait Vcs: Send + Sync {
    async fn worktree_add(&self, repo_path: &Path, worktree_path: &Path, branch: &str) -> Result<(), SwarmError>;
    async fn worktree_remove(&self, repo_path: &Path, worktree_path: &Path, force: bool) -> Result<(), SwarmError>;
    async fn branch_delete(&self, repo_path: &Path, branch: &str) -> Result<(), SwarmError>;
    async fn current_branch(&self, repo_path: &Path) -> Result<String, SwarmError>;
    async fn default_branch(&self, repo_path: &Path) -> Result<String, SwarmError>;
    async fn changed_files_since(&self, repo_path: &Path, branch: &str, base: &str) -> Result<Vec<String>, SwarmError>;
    async fn merge_no_ff(&self, repo_path: &Path, branch: &str) -> Result<(), SwarmError>;
    async fn merge_base(&self, repo_path: &Path, a: &str, b: &str) -> Result<String, SwarmError>;
    async fn checkout(&self, repo_path: &Path, branch: &str) -> Result<(), SwarmError>;
}

pub struct GitCli;

fn tool_failure(context: &str, stderr: &str) -> SwarmError {
    SwarmError::ToolFailure(format!("{context}: {stderr}"))
}

#[async_trait]
impl Vcs for GitCli {
    async fn worktree_add(&self, repo_path: &Path, worktree_path: &Path, branch: &str) -> Result<(), SwarmError> {
        let path_str = worktree_path.to_string_lossy();
        let out = run_with_timeout(
            "git",
            &["worktree", "add", "-b", branch, &path_str],
            repo_path,
            VCS_TIMEOUT,
        )
        .await
        .map_err(|e| tool_failure("worktree add", &e.to_string()))?;
        if out.status_ok {
            Ok(())
        } else {
            Err(tool_failure("worktree add", &out.stderr))
        }
    }

    async fn worktree_remove(&self, repo_path: &Path, worktree_path: &Path, force: bool) -> Result<(), SwarmError> {
        let path_str = worktree_path.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&path_str);
        let out = run_with_timeout("git", &args, repo_path, VCS_TIMEOUT)
            .await
            .map_err(|e| tool_failure("worktree remove", &e.to_string()))?;
        if out.status_ok {
            Ok(())
        } else {
            Err(tool_failure("worktree remove", &out.stderr))
        }
    }

    async fn branch_delete(&self, repo_path: &Path, branch: &str) -> Result<(), SwarmError> {
        let out = run_with_timeout("git", &["branch", "-D", branch], repo_path, VCS_TIMEOUT)
            .await
            .map_err(|e| tool_failure("branch delete", &e.to_string()))?;
        if out.status_ok {
            Ok(())
        } else {
            Err(tool_failure("branch delete", &out.stderr))
        }
    }

    async fn current_branch(&self, repo_path: &Path) -> Result<String, SwarmError> {
        let out = run_with_timeout("git", &["rev-parse", "--abbrev-ref", "HEAD"], repo_path, VCS_TIMEOUT)
            .await
            .map_err(|e| tool_failure("current branch", &e.to_string()))?;
        if out.status_ok {
            Ok(out.stdout.trim().to_string())
        } else {
            Err(tool_failure("current branch", &out.stderr))
        }
    }

    async fn default_branch(&self, repo_path: &Path) -> Result<String, SwarmError> {
        for candidate in ["main", "master"] {
            let out = run_with_timeout(
                "git",
                &["show-ref", "--verify", "--quiet", &format!("refs/heads/{candidate}")],
                repo_path,
                VCS_TIMEOUT,
            )
            .await
            .map_err(|e| tool_failure("default branch", &e.to_string()))?;
            if out.status_ok {
                return Ok(candidate.to_string());
            }
        }
        self.current_branch(repo_path).await
    }

    async fn changed_files_since(&self, repo_path: &Path, branch: &str, base: &str) -> Result<Vec<String>, SwarmError> {
        let out = run_with_timeout(
            "git",
            &["diff", "--name-only", &format!("{base}...{branch}")],
            repo_path,
            VCS_TIMEOUT,
        )
        .await
        .map_err(|e| tool_failure("diff", &e.to_string()))?;
        if !out.status_ok {
            return Err(tool_failure("diff", &out.stderr));
        }
        Ok(out.stdout.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect())
    }

    async fn merge_no_ff(&self, repo_path: &Path, branch: &str) -> Result<(), SwarmError> {
        let out = run_with_timeout("git", &["merge", "--no-ff", "--no-edit", branch], repo_path, VCS_TIMEOUT)
            .await
            .map_err(|e| tool_failure("merge", &e.to_string()))?;
        if out.status_ok {
            Ok(())
        } else {
            Err(SwarmError::MergeConflict(out.stderr))
        }
    }

    async fn merge_base(&self, repo_path: &Path, a: &str, b: &str) -> Result<String, SwarmError> {
        let out = run_with_timeout("git", &["merge-base", a, b], repo_path, VCS_TIMEOUT)
            .await
            .map_err(|e| tool_failure("merge-base", &e.to_string()))?;
        if out.status_ok {
            Ok(out.stdout.trim().to_string())
        } else {
            Err(tool_failure("merge-base", &out.stderr))
        }
    }

    async fn checkout(&self, repo_path: &Path, branch: &str) -> Result<(), SwarmError> {
        let out = run_with_timeout("git", &["checkout", branch], repo_path, VCS_TIMEOUT)
            .await
            .map_err(|e| tool_failure("checkout", &e.to_string()))?;
        if out.status_ok {
            Ok(())
        } else {
            Err(tool_failure("checkout", &out.stderr))
        }
    }
}

/// In-memory double for sandbox-manager unit tests: no real git binary
/// involved. Tracks worktrees/branches as plain maps and lets tests inject
/// "changed files" fixtures for conflict-detection scenarios.
#[derive(Default)]
pub struct FakeVcs {
    pub worktrees: parking_lot::Mutex<std::collections::HashMap<PathBuf, String>>,
    pub changed_files: parking_lot::Mutex<std::collections::HashMap<String, Vec<String>>>,
    pub default_branch_name: parking_lot::Mutex<String>,
    pub fail_worktree_add: std::sync::atomic::AtomicBool,
    pub fail_merge: std::sync::atomic::AtomicBool,
}

impl FakeVcs {
    pub fn new() -> Self {
        let mut me = Self::default();
        me.default_branch_name = parking_lot::Mutex::new("main".to_string());
        me
    }

    pub fn set_changed_files(&self, branch: &str, files: Vec<String>) {
        self.changed_files.lock().insert(branch.to_string(), files);
    }
}

#[async_trait]
impl Vcs for FakeVcs {
    async fn worktree_add(&self, _repo_path: &Path, worktree_path: &Path, branch: &str) -> Result<(), SwarmError> {
        use std::sync::atomic::Ordering;
        if self.fail_worktree_add.load(Ordering::SeqCst) {
            return Err(SwarmError::ToolFailure("branch already exists".into()));
        }
        self.worktrees.lock().insert(worktree_path.to_path_buf(), branch.to_string());
        Ok(())
    }

    async fn worktree_remove(&self, _repo_path: &Path, worktree_path: &Path, _force: bool) -> Result<(), SwarmError> {
        self.worktrees.lock().remove(worktree_path);
        Ok(())
    }

    async fn branch_delete(&self, _repo_path: &Path, _branch: &str) -> Result<(), SwarmError> {
        Ok(())
    }

    async fn current_branch(&self, _repo_path: &Path) -> Result<String, SwarmError> {
        Ok(self.default_branch_name.lock().clone())
    }

    async fn default_branch(&self, _repo_path: &Path) -> Result<String, SwarmError> {
        Ok(self.default_branch_name.lock().clone())
    }

    async fn changed_files_since(&self, _repo_path: &Path, branch: &str, _base: &str) -> Result<Vec<String>, SwarmError> {
        Ok(self.changed_files.lock().get(branch).cloned().unwrap_or_default())
    }

    async fn merge_no_ff(&self, _repo_path: &Path, _branch: &str) -> Result<(), SwarmError> {
        use std::sync::atomic::Ordering;
        if self.fail_merge.load(Ordering::SeqCst) {
            return Err(SwarmError::MergeConflict("conflicting hunks".into()));
        }
        Ok(())
    }

    async fn merge_base(&self, _repo_path: &Path, _a: &str, _b: &str) -> Result<String, SwarmError> {
        Ok("basehash".into())
    }

    async fn checkout(&self, _repo_path: &Path, _branch: &str) -> Result<(), SwarmError> {
        Ok(())
    }
}
