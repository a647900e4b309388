// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level argument grammar (spec.md §6 CLI subcommand surface).

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use swarm_core::MergePolicy;

#[derive(Debug, Parser)]
#[command(name = "swarm", version, about = "Multi-agent coding-assistant orchestrator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize the `.swarm/` workspace in the current directory.
    Init {
        #[arg(long)]
        force: bool,
        #[arg(long)]
        quick: bool,
    },
    /// Run the diagnostic battery, optionally applying fixable repairs.
    Doctor {
        #[arg(long)]
        fix: bool,
    },
    #[command(subcommand)]
    Codebase(CodebaseCommand),
    #[command(subcommand)]
    Goal(GoalCommand),
    #[command(subcommand)]
    Item(ItemCommand),
    #[command(subcommand)]
    Worker(WorkerCommand),
    #[command(subcommand)]
    Signal(SignalCommand),
    #[command(subcommand)]
    Costs(CostsCommand),
    #[command(subcommand)]
    Sandbox(SandboxCommand),
    /// Show spend and remaining budget for a goal.
    Budget {
        #[arg(long)]
        goal: String,
    },
    /// Check a sandbox's working-tree branch for conflicts against main.
    Conflict(ConflictArgs),
    /// Run a codebase's configured validation command against a sandbox.
    Validate {
        #[arg(long)]
        worker: String,
    },
    /// Run the overseer control loop in the foreground.
    Overseer,
    /// Run one health-patrol cycle.
    Patrol {
        #[arg(long)]
        no_fix: bool,
    },
    /// Stub: the HTTP dashboard is out of scope for this build.
    Dashboard,
}

#[derive(Debug, Args)]
pub struct ConflictArgs {
    #[command(subcommand)]
    pub command: ConflictCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConflictCommand {
    Check {
        #[arg(long)]
        worker: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CodebaseCommand {
    Add {
        path_or_url: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        merge_policy: Option<MergePolicyArg>,
        #[arg(long)]
        validation_command: Option<String>,
        #[arg(long)]
        code_host_owner: Option<String>,
        #[arg(long)]
        code_host_repo: Option<String>,
    },
    List,
    Remove {
        name: String,
    },
    /// Sets `[session] current_codebase` for commands whose `--codebase` is omitted.
    Use {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MergePolicyArg {
    Manual,
    Auto,
    Pr,
}

impl From<MergePolicyArg> for MergePolicy {
    fn from(value: MergePolicyArg) -> Self {
        match value {
            MergePolicyArg::Manual => MergePolicy::Manual,
            MergePolicyArg::Auto => MergePolicy::Auto,
            MergePolicyArg::Pr => MergePolicy::Pr,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    New {
        goal_text: String,
        #[arg(long)]
        codebase: Option<String>,
    },
    List,
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Merges every `done` work item's sandbox back per the codebase's merge policy.
    Merge {
        id: String,
    },
    /// Prints the goal's cost summary and work-item breakdown.
    Report {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    List {
        #[arg(long)]
        goal: Option<String>,
        #[arg(long)]
        codebase: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        goal: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        codebase: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Reset {
        id: String,
    },
    #[command(subcommand)]
    Deps(ItemDepsCommand),
}

#[derive(Debug, Subcommand)]
pub enum ItemDepsCommand {
    Add {
        #[arg(long)]
        item: String,
        #[arg(long)]
        depends_on: String,
    },
    Remove {
        #[arg(long)]
        item: String,
        #[arg(long)]
        depends_on: String,
    },
    List {
        #[arg(long)]
        item: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    List,
    Spawn {
        #[arg(long)]
        item: String,
        #[arg(long)]
        codebase: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Runs the worker in-process rather than as a detached daemon.
        #[arg(long)]
        attached: bool,
    },
    Stop {
        #[arg(long)]
        id: String,
    },
    /// Wrapper-script callback: marks a detached worker's item `done`.
    Complete {
        id: String,
    },
    /// Wrapper-script callback: marks a detached worker's item `failed`.
    Fail {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SignalCommand {
    Send {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },
    List {
        #[arg(long)]
        to: Option<String>,
    },
    Show {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CostsCommand {
    Summary {
        #[arg(long)]
        goal: String,
    },
    Record {
        #[arg(long)]
        worker: String,
        #[arg(long)]
        input: u64,
        #[arg(long)]
        output: u64,
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SandboxCommand {
    List,
    /// Reconciles orphaned sandboxes (dead or absent worker).
    Clean,
}
