// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit-boundary error rendering (spec.md §6): every command returns
//! `anyhow::Result<()>`; `main` renders the chain and exits 1. When the
//! root cause is a [`swarm_core::SwarmError`] we render its severity tag
//! and hint the same way the core's own doc comment promises, otherwise
//! we fall back to a plain `ERROR:` line.

use swarm_core::SwarmError;

/// Renders `err` to stderr the way the CLI boundary is specified to: a
/// `SEVERITY: message` line, an optional `Hint: ...` line, then exit 1.
pub fn render(err: &anyhow::Error) -> i32 {
    if let Some(swarm_err) = err.downcast_ref::<SwarmError>() {
        eprintln!("{}: {swarm_err}", swarm_err.severity());
        if let Some(hint) = swarm_err.hint() {
            eprintln!("Hint: {hint}");
        }
    } else {
        eprintln!("ERROR: {err:#}");
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcasts_swarm_error_for_rendering() {
        let err = anyhow::Error::new(SwarmError::NotInWorkspace("no .swarm dir".into()));
        assert_eq!(render(&err), 1);
    }

    #[test]
    fn renders_opaque_errors_too() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(render(&err), 1);
    }
}
