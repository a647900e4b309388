// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pricing table and cost formula (spec.md §4.F). Loaded from
//! `[costs.pricing.<model>]` TOML sections by the config layer
//! (SPEC_FULL.md §6 ambient) — a Non-goal ("we do not own the LLM's
//! pricing") means this crate never hardcodes rates, only the formula.

use crate::extract::CostAttrs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// USD per million tokens for one model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
    pub cache_read_per_million: f64,
    pub cache_write_per_million: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    pub models: HashMap<String, ModelPricing>,
    pub default_model: String,
}

impl PricingTable {
    pub fn rate_for(&self, model: &str) -> Option<&ModelPricing> {
        self.models.get(model).or_else(|| self.models.get(&self.default_model))
    }
}

/// `(I·p_in + O·p_out + R·p_cache_read + W·p_cache_write) / 1,000,000`,
/// rounded to 6 decimal places. Returns `0.0` if neither the model nor the
/// default model has a configured rate.
pub fn calculate_cost(attrs: &CostAttrs, table: &PricingTable) -> f64 {
    let Some(rate) = table.rate_for(&attrs.model) else {
        return 0.0;
    };
    let raw = (attrs.input_tokens as f64 * rate.input_per_million
        + attrs.output_tokens as f64 * rate.output_per_million
        + attrs.cache_read_tokens as f64 * rate.cache_read_per_million
        + attrs.cache_write_tokens as f64 * rate.cache_write_per_million)
        / 1_000_000.0;
    (raw * 1_000_000.0).round() / 1_000_000.0
}
