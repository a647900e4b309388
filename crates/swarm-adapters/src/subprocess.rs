// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded-timeout subprocess execution shared by the VCS adapter and the
//! worker lifecycle's agent-profile generation step.

use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct Output {
    pub status_ok: bool,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Run `program args...` in `cwd`, killing it if it outruns `timeout`.
pub async fn run_with_timeout(
    program: &str,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> Result<Output, RunError> {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(cwd).kill_on_drop(true);
    let child = cmd.output();

    match tokio::time::timeout(timeout, child).await {
        Ok(Ok(output)) => Ok(Output {
            status_ok: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(e)) => Err(RunError::Spawn(e)),
        Err(_) => Err(RunError::Timeout(timeout)),
    }
}
