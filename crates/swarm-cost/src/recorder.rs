// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording extracted cost attributes as durable [`CostEntry`] rows
//! (spec.md §4.F), plus a best-effort publication on the cost-update topic
//! (SPEC_FULL.md §9: treated as unstable, no shipped consumer).

use crate::extract::CostAttrs;
use crate::pricing::{calculate_cost, PricingTable};
use std::sync::Arc;
use swarm_bus::MessageBus;
use swarm_core::{CostEntry, SwarmError, Worker, WorkerId};
use swarm_store::Store;

/// Topic on which every recorded CostEntry is (best-effort) published.
pub const COST_TOPIC: &str = "swarm:costs";

pub struct CostRecorder {
    store: Arc<Store>,
    bus: Arc<MessageBus>,
    pricing: PricingTable,
}

impl CostRecorder {
    pub fn new(store: Arc<Store>, bus: Arc<MessageBus>, pricing: PricingTable) -> Self {
        Self { store, bus, pricing }
    }

    pub fn record(&self, worker_id: WorkerId, attrs: CostAttrs) -> Result<CostEntry, SwarmError> {
        let cost_usd = attrs.cost_usd.unwrap_or_else(|| calculate_cost(&attrs, &self.pricing));
        let entry = CostEntry {
            id: Default::default(),
            worker_id,
            input_tokens: attrs.input_tokens,
            output_tokens: attrs.output_tokens,
            cache_read_tokens: attrs.cache_read_tokens,
            cache_write_tokens: attrs.cache_write_tokens,
            cost_usd,
            model: attrs.model,
            recorded_at: 0,
            created_at: 0,
            updated_at: 0,
        };
        let entry = self.store.insert(entry).map_err(SwarmError::from)?;

        if let Ok(body) = serde_json::to_string(&entry) {
            if let Err(e) = self.bus.send("cost_pipeline", COST_TOPIC, "cost_recorded", &body, None) {
                tracing::debug!(error = %e, "best-effort cost-update publish failed");
            }
        }
        Ok(entry)
    }

    /// Stamps `last_heartbeat_at` on the worker whose log the tailer just
    /// read new bytes from, regardless of whether any cost event was
    /// extracted. Feeds the overseer's stale-worker diagnostic.
    pub fn stamp_heartbeat(&self, worker_id: WorkerId) -> Result<(), SwarmError> {
        let now = self.store.now_secs();
        self.store
            .update_matching::<Worker>(|w| w.id == worker_id, |w| w.last_heartbeat_at = Some(now))
            .map_err(SwarmError::from)?;
        Ok(())
    }
}
