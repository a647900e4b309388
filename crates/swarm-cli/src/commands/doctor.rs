// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm doctor`: runs the diagnostic battery once, optionally fixing.

use crate::context::Context;
use crate::output::OutputFormat;
use swarm_overseer::{diagnostics, DiagnosticStatus};

pub async fn run(ctx: &Context, fix: bool, format: OutputFormat) -> anyhow::Result<()> {
    let diag_ctx = ctx.diagnostic_context();
    let now = ctx.store.now_secs();
    let results = diagnostics::run_all(&diag_ctx, now, fix).await;

    let worst = results.iter().map(|r| r.status).max_by_key(|s| match s {
        DiagnosticStatus::Ok => 0,
        DiagnosticStatus::Warn => 1,
        DiagnosticStatus::Error => 2,
    });

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results.iter().map(|r| {
            serde_json::json!({
                "name": r.name,
                "status": format!("{:?}", r.status),
                "message": r.message,
                "fixable": r.fixable,
            })
        }).collect::<Vec<_>>())?),
        OutputFormat::Text => {
            for r in &results {
                let tag = match r.status {
                    DiagnosticStatus::Ok => "OK",
                    DiagnosticStatus::Warn => "WARN",
                    DiagnosticStatus::Error => "ERROR",
                };
                println!("{tag}: {} - {}", r.name, r.message);
            }
        }
    }

    if matches!(worst, Some(DiagnosticStatus::Error)) {
        anyhow::bail!("one or more diagnostics reported an error");
    }
    Ok(())
}
