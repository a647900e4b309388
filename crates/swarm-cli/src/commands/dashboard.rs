// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm dashboard`: the HTTP dashboard is explicitly out of scope for
//! this build (spec.md §1 Non-goal). Present for CLI surface completeness.

pub fn run() -> anyhow::Result<()> {
    anyhow::bail!("not implemented in this build")
}
