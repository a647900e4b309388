// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extraction of recordable cost attributes from parsed events (spec.md §4.F).

use crate::events::Event;

#[derive(Debug, Clone, PartialEq)]
pub struct CostAttrs {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
    pub model: String,
    pub cost_usd: Option<f64>,
}

/// `None` for every event kind except `result`.
pub fn extract_cost(event: &Event) -> Option<CostAttrs> {
    match event {
        Event::Result { usage, model, cost_usd } => Some(CostAttrs {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cache_read_tokens: usage.cache_read_tokens,
            cache_write_tokens: usage.cache_write_tokens,
            model: model.clone(),
            cost_usd: *cost_usd,
        }),
        _ => None,
    }
}

pub fn extract_costs(events: &[Event]) -> Vec<CostAttrs> {
    events.iter().filter_map(extract_cost).collect()
}
