// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Third-party code-hosting API integration (spec.md §1 out-of-scope:
//! "PR creation, issue listing"). Specified only as an external
//! collaborator through its interface — no HTTP client ships in this core;
//! `NullCodeHost` always reports `tool_failure` since no network
//! integration is implemented here.

use async_trait::async_trait;
use parking_lot::Mutex;
use swarm_core::SwarmError;

#[async_trait]
pub trait CodeHost: Send + Sync {
    async fn open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String, SwarmError>;
}

/// No code-host network client is implemented in this core (Non-goal); any
/// attempt to open a PR fails with `tool_failure`, which the sandbox
/// manager's `pr` merge-back policy surfaces via a signal to the overseer.
pub struct NullCodeHost;

#[async_trait]
impl CodeHost for NullCodeHost {
    async fn open_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
        _base: &str,
        _title: &str,
        _body: &str,
    ) -> Result<String, SwarmError> {
        Err(SwarmError::ToolFailure("no code-host integration configured".into()))
    }
}

/// Test double recording calls and returning a canned URL or failure.
#[derive(Default)]
pub struct FakeCodeHost {
    pub should_fail: Mutex<bool>,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl CodeHost for FakeCodeHost {
    async fn open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        _base: &str,
        title: &str,
        _body: &str,
    ) -> Result<String, SwarmError> {
        self.calls.lock().push((owner.to_string(), repo.to_string(), branch.to_string()));
        if *self.should_fail.lock() {
            return Err(SwarmError::ToolFailure("code host rejected PR".into()));
        }
        Ok(format!("https://example.invalid/{owner}/{repo}/pull/1?title={title}"))
    }
}
