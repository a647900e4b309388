// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wrapper-script materialization (spec.md §4.E step 8): a shell script
//! that runs the LLM CLI non-interactively in the sandbox and calls back
//! into the orchestrator binary on exit, decoupling the worker's lifetime
//! from the orchestrator process's lifetime.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};
use swarm_core::SwarmError;

const TEMPLATE: &str = include_str!("templates/wrapper.sh.hbs");
const TEMPLATE_NAME: &str = "wrapper";

#[derive(Serialize)]
struct WrapperContext {
    worker_id: String,
    sandbox_path: String,
    log_path: String,
    cli_path: String,
    llm_command: String,
    llm_args: Vec<String>,
}

/// Render the wrapper script body for `worker_id`. Pure string work; the
/// caller is responsible for writing it to disk with mode `0755`.
pub fn render(
    worker_id: &str,
    sandbox_path: &Path,
    log_path: &Path,
    cli_path: &str,
    llm_command: &str,
    llm_args: &[String],
) -> Result<String, SwarmError> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.register_template_string(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| SwarmError::ToolFailure(format!("wrapper template registration failed: {e}")))?;

    let ctx = WrapperContext {
        worker_id: worker_id.to_string(),
        sandbox_path: sandbox_path.display().to_string(),
        log_path: log_path.display().to_string(),
        cli_path: cli_path.to_string(),
        llm_command: llm_command.to_string(),
        llm_args: llm_args.to_vec(),
    };
    hb.render(TEMPLATE_NAME, &ctx)
        .map_err(|e| SwarmError::ToolFailure(format!("wrapper template render failed: {e}")))
}

/// Where the wrapper script and its companion log live for a worker, per
/// the workspace layout in spec.md §6: `<workspace>/.swarm/run/<id>.{sh,log}`.
pub fn script_path(run_dir: &Path, worker_id: &str) -> PathBuf {
    run_dir.join(format!("{worker_id}.sh"))
}

pub fn log_path(run_dir: &Path, worker_id: &str) -> PathBuf {
    run_dir.join(format!("{worker_id}.log"))
}
