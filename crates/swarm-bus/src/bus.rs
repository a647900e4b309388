// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message bus (spec.md §4.B): persists every Signal to the Store,
//! then best-effort publishes it on `signals:<to>` for live subscribers.
//! Signals are append-only — only `read` ever mutates after creation.

use crate::registry::{topic, TopicRegistry};
use std::sync::Arc;
use swarm_core::{Signal, SwarmError};
use swarm_store::Store;
use tokio::sync::broadcast;

const DEFAULT_LIST_CAP: usize = 50;

pub struct MessageBus {
    store: Arc<Store>,
    registry: Arc<TopicRegistry>,
}

/// Filter for [`MessageBus::list`]; any combination of fields may be set.
#[derive(Default, Clone)]
pub struct SignalFilter<'a> {
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub read: Option<bool>,
    pub limit: Option<usize>,
}

impl MessageBus {
    pub fn new(store: Arc<Store>, registry: Arc<TopicRegistry>) -> Self {
        Self { store, registry }
    }

    /// Persist then publish. Persistence happens-before publication so a
    /// subscriber that misses the broadcast can still recover the Signal
    /// from `list_unread` (spec.md §5 ordering guarantees).
    pub fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
        metadata: Option<String>,
    ) -> Result<Signal, SwarmError> {
        let signal = Signal {
            id: Default::default(),
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            read: false,
            metadata,
            created_at: 0,
            updated_at: 0,
        };
        let signal = self.store.insert(signal).map_err(SwarmError::from)?;
        self.registry.publish(&topic("", to), &signal);
        Ok(signal)
    }

    /// Filter persisted signals; default cap of 50, most-recent first.
    pub fn list(&self, filter: SignalFilter<'_>) -> Result<Vec<Signal>, SwarmError> {
        let mut signals = self
            .store
            .filter::<Signal>(|s| {
                filter.from.map(|f| s.from == f).unwrap_or(true)
                    && filter.to.map(|t| s.to == t).unwrap_or(true)
                    && filter.read.map(|r| s.read == r).unwrap_or(true)
            })
            .map_err(SwarmError::from)?;
        signals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        signals.truncate(filter.limit.unwrap_or(DEFAULT_LIST_CAP));
        Ok(signals)
    }

    pub fn list_unread(&self, recipient: &str) -> Result<Vec<Signal>, SwarmError> {
        self.list(SignalFilter { to: Some(recipient), read: Some(false), ..Default::default() })
    }

    /// Idempotent: flipping an already-read signal is a no-op, not an error.
    pub fn mark_read(&self, id: &str) -> Result<(), SwarmError> {
        self.store.fetch::<Signal>(id).map_err(SwarmError::from)?;
        self.store
            .update_matching::<Signal>(|s| s.id_matches(id), |s| s.read = true)
            .map_err(SwarmError::from)?;
        Ok(())
    }

    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Signal> {
        self.registry.subscribe(topic)
    }

    pub fn topic(&self, kind: &str, id: &str) -> String {
        topic(kind, id)
    }
}

trait SignalIdMatch {
    fn id_matches(&self, id: &str) -> bool;
}
impl SignalIdMatch for Signal {
    fn id_matches(&self, id: &str) -> bool {
        self.id.as_str() == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swarm_core::ids::RandomIdGen;
    use swarm_core::SystemClock;

    fn bus() -> (MessageBus, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(dir.path(), Arc::new(SystemClock), Arc::new(RandomIdGen)));
        (MessageBus::new(store, Arc::new(TopicRegistry::new())), dir)
    }

    #[test]
    fn send_persists_and_list_unread_sees_it() {
        let (bus, _dir) = bus();
        bus.send("overseer", "bee-1", "job_complete", "", None).unwrap();
        let unread = bus.list_unread("bee-1").unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].subject, "job_complete");
    }

    #[test]
    fn mark_read_is_idempotent() {
        let (bus, _dir) = bus();
        let signal = bus.send("overseer", "bee-1", "job_complete", "", None).unwrap();
        bus.mark_read(signal.id.as_str()).unwrap();
        bus.mark_read(signal.id.as_str()).unwrap();
        let unread = bus.list_unread("bee-1").unwrap();
        assert!(unread.is_empty());
    }

    #[test]
    fn list_defaults_to_cap_50_most_recent_first() {
        let (bus, _dir) = bus();
        for i in 0..60 {
            bus.send("overseer", "bee-1", &format!("s{i}"), "", None).unwrap();
        }
        let all = bus.list(SignalFilter { to: Some("bee-1"), ..Default::default() }).unwrap();
        assert_eq!(all.len(), 50);
    }

    #[test]
    fn subscribe_receives_live_publication() {
        let (bus, _dir) = bus();
        let mut rx = bus.subscribe(&bus.topic("", "bee-1"));
        bus.send("overseer", "bee-1", "job_complete", "", None).unwrap();
        let received = rx.try_recv().unwrap();
        assert_eq!(received.subject, "job_complete");
    }

    #[test]
    fn missed_publication_still_recoverable_from_store() {
        let (bus, _dir) = bus();
        // No subscriber registered before send: publish is a silent no-op.
        bus.send("overseer", "bee-1", "job_complete", "", None).unwrap();
        let unread = bus.list_unread("bee-1").unwrap();
        assert_eq!(unread.len(), 1);
    }
}
