// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-adapters: external collaborators specified only through their
//! interfaces (spec.md §6) — the version-control tool and third-party
//! code-host API — plus the shared bounded-timeout subprocess helper.

pub mod codehost;
pub mod subprocess;
pub mod vcs;

pub use codehost::{CodeHost, NullCodeHost};
pub use vcs::{GitCli, Vcs};

#[cfg(any(test, feature = "test-support"))]
pub use codehost::FakeCodeHost;
#[cfg(any(test, feature = "test-support"))]
pub use vcs::FakeVcs;
