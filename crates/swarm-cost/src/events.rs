// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured-event log shapes (spec.md §4.F) and the newline-delimited
//! JSON parser. Malformed lines are dropped silently — streams commonly
//! contain partial trailing lines at flush boundaries.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_tokens: u64,
    #[serde(default)]
    pub cache_write_tokens: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    System {
        session_id: String,
        model: String,
    },
    Assistant {},
    Result {
        #[serde(default)]
        usage: Usage,
        model: String,
        #[serde(default)]
        cost_usd: Option<f64>,
    },
}

/// Split `chunk` on `\n` and decode each line independently. Order is
/// preserved; lines that fail to parse (including an empty trailing line)
/// are dropped without error.
pub fn parse_chunk(chunk: &str) -> Vec<Event> {
    chunk.split('\n').filter(|line| !line.trim().is_empty()).filter_map(|line| serde_json::from_str(line).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_system_and_result_events() {
        let chunk = concat!(
            r#"{"type":"system","session_id":"s1","model":"M"}"#,
            "\n",
            r#"{"type":"result","usage":{"input_tokens":1000,"output_tokens":500,"cache_read_tokens":0,"cache_write_tokens":0},"model":"M"}"#,
            "\n",
        );
        let events = parse_chunk(chunk);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::System { .. }));
        assert!(matches!(events[1], Event::Result { .. }));
    }

    #[test]
    fn malformed_and_empty_lines_are_dropped_silently() {
        let chunk = "not json\n\n{\"type\":\"assistant\"}\n{truncat";
        let events = parse_chunk(chunk);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::Assistant {}));
    }

    #[test]
    fn missing_usage_fields_default_to_zero() {
        let chunk = r#"{"type":"result","usage":{},"model":"M"}"#;
        let events = parse_chunk(chunk);
        let Event::Result { usage, .. } = &events[0] else { panic!("expected result event") };
        assert_eq!(usage.input_tokens, 0);
        assert_eq!(usage.cache_write_tokens, 0);
    }
}
