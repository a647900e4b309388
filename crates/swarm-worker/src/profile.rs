// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-profile generation (spec.md §4.E step 7): best-effort, subject to
//! the 120-second hard timeout from §5 Cancellation & Timeouts. Failure or
//! timeout never aborts worker spawn — it falls back to a static default.

use std::path::Path;
use std::time::Duration;
use swarm_adapters::subprocess::{run_with_timeout, RunError};

pub const AGENT_PROFILE_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_PROFILE: &str = "# default agent profile\n\nNo project-specific profile could be generated; proceeding with defaults.\n";

/// Best-effort: run `command` (if given) in `sandbox_path` to produce an
/// agent-profile file, falling back to [`DEFAULT_PROFILE`] on failure,
/// nonzero exit, or timeout. Never returns `Err` — a profile file is
/// always written.
pub async fn generate(sandbox_path: &Path, profile_path: &Path, command: Option<(&str, &[&str])>) {
    generate_with_timeout(sandbox_path, profile_path, command, AGENT_PROFILE_TIMEOUT).await
}

async fn generate_with_timeout(sandbox_path: &Path, profile_path: &Path, command: Option<(&str, &[&str])>, timeout: Duration) {
    let contents = match command {
        None => DEFAULT_PROFILE.to_string(),
        Some((program, args)) => match run_with_timeout(program, args, sandbox_path, timeout).await {
            Ok(out) if out.status_ok => out.stdout,
            Ok(_) => {
                tracing::debug!("agent-profile command exited nonzero; using default profile");
                DEFAULT_PROFILE.to_string()
            }
            Err(RunError::Timeout(_)) => {
                tracing::warn!("agent-profile generation timed out after {:?}; using default profile", timeout);
                DEFAULT_PROFILE.to_string()
            }
            Err(e) => {
                tracing::debug!(error = %e, "agent-profile generation failed; using default profile");
                DEFAULT_PROFILE.to_string()
            }
        },
    };

    if let Err(e) = tokio::fs::write(profile_path, contents).await {
        tracing::debug!(error = %e, "failed to write agent-profile file (non-fatal)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_command_writes_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile_path = dir.path().join("PROFILE.md");
        generate(dir.path(), &profile_path, None).await;
        let contents = tokio::fs::read_to_string(&profile_path).await.unwrap();
        assert!(contents.contains("default agent profile"));
    }

    #[tokio::test]
    async fn timing_out_command_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let profile_path = dir.path().join("PROFILE.md");
        generate_with_timeout(dir.path(), &profile_path, Some(("sleep", &["5"])), Duration::from_millis(50)).await;
        let contents = tokio::fs::read_to_string(&profile_path).await.unwrap();
        assert!(contents.contains("default agent profile"));
    }

    #[tokio::test]
    async fn successful_command_output_is_used_as_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile_path = dir.path().join("PROFILE.md");
        generate(dir.path(), &profile_path, Some(("echo", &["custom profile"]))).await;
        let contents = tokio::fs::read_to_string(&profile_path).await.unwrap();
        assert!(contents.contains("custom profile"));
    }
}
