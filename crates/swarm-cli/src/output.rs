// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation helpers shared by every command module. `OutputFormat`
//! mirrors the teacher's own `ValueEnum`-backed text/json switch; `NO_COLOR`
//! is honored trivially by never emitting ANSI codes in the first place.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints a single serializable value, json-encoded or via its `Display`.
pub fn print_one<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{value}"),
    }
    Ok(())
}

/// Prints a list, json-encoded as an array or line-by-line via `render`.
pub fn print_list<T: Serialize>(items: &[T], format: OutputFormat, render: impl Fn(&T) -> String) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Text => {
            if items.is_empty() {
                println!("(none)");
            }
            for item in items {
                println!("{}", render(item));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_list_handles_empty_text_output() {
        let items: Vec<i32> = vec![];
        print_list(&items, OutputFormat::Text, |i| i.to_string()).unwrap();
    }

    #[test]
    fn print_list_json_round_trips() {
        let items = vec![1, 2, 3];
        print_list(&items, OutputFormat::Json, |i| i.to_string()).unwrap();
    }
}
