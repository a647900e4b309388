// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `swarm codebase {add,list,remove,use}`.

use std::path::PathBuf;

use crate::cli::CodebaseCommand;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use swarm_core::{Codebase, SwarmError};

pub async fn run(ctx: &mut Context, command: CodebaseCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        CodebaseCommand::Add { path_or_url, name, merge_policy, validation_command, code_host_owner, code_host_repo } => {
            let is_url = path_or_url.contains("://") || path_or_url.starts_with("git@");
            let name = name.unwrap_or_else(|| {
                path_or_url
                    .rsplit('/')
                    .next()
                    .unwrap_or(&path_or_url)
                    .trim_end_matches(".git")
                    .to_string()
            });

            if ctx.store.find_one::<Codebase>(|c| c.name == name)?.is_some() {
                return Err(SwarmError::NameTaken(name).into());
            }

            let codebase = Codebase {
                id: Default::default(),
                name: name.clone(),
                path: if is_url { None } else { Some(PathBuf::from(&path_or_url)) },
                origin_url: if is_url { Some(path_or_url) } else { None },
                merge_policy: merge_policy.map(Into::into).unwrap_or_default(),
                validation_command,
                code_host_owner,
                code_host_repo,
                default_branch: None,
                created_at: 0,
                updated_at: 0,
            };
            let codebase = ctx.store.insert(codebase)?;
            output::print_one(&serde_json::to_value(&codebase)?, format)?;
        }
        CodebaseCommand::List => {
            let mut codebases = ctx.store.all::<Codebase>()?;
            codebases.sort_by(|a, b| a.name.cmp(&b.name));
            output::print_list(&codebases, format, |c| format!("{} {} ({:?})", c.id, c.name, c.merge_policy))?;
        }
        CodebaseCommand::Remove { name } => {
            let codebase = ctx
                .store
                .find_one::<Codebase>(|c| c.name == name)?
                .ok_or_else(|| SwarmError::not_found("codebases", name.clone()))?;
            ctx.store.delete::<Codebase>(codebase.id.as_str())?;
            println!("OK: removed codebase {name}");
        }
        CodebaseCommand::Use { name } => {
            let codebase = ctx
                .store
                .find_one::<Codebase>(|c| c.name == name)?
                .ok_or_else(|| SwarmError::not_found("codebases", name.clone()))?;
            ctx.config.session.current_codebase = Some(codebase.id.as_str().to_string());
            ctx.config.save(&ctx.config_path())?;
            println!("OK: current codebase set to {name}");
        }
    }
    Ok(())
}
