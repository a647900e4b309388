// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm signal {send,list,show}`.

use crate::cli::SignalCommand;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use swarm_bus::SignalFilter;
use swarm_core::Signal;

pub async fn run(ctx: &Context, command: SignalCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        SignalCommand::Send { from, to, subject, body } => {
            let signal = ctx.bus.send(&from, &to, &subject, &body, None)?;
            output::print_one(&serde_json::to_value(&signal)?, format)?;
        }
        SignalCommand::List { to } => {
            let signals = ctx.bus.list(SignalFilter { to: to.as_deref(), ..Default::default() })?;
            output::print_list(&signals, format, |s| format!("{} {} -> {} [{}] {}", s.id, s.from, s.to, s.subject, s.body))?;
        }
        SignalCommand::Show { id } => {
            let signal: Signal = ctx.store.fetch(&id)?;
            output::print_one(&serde_json::to_value(&signal)?, format)?;
        }
    }
    Ok(())
}
