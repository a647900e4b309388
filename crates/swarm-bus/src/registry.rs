// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process topic registry: a map from bus topic name to a
//! `tokio::sync::broadcast` channel of live subscribers. Created lazily per
//! topic on first `subscribe` (spec.md §9 DESIGN NOTES: "topic-keyed
//! one-to-many at-most-once delivery to live subscribers").

use parking_lot::Mutex;
use std::collections::HashMap;
use swarm_core::Signal;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Default)]
pub struct TopicRegistry {
    topics: Mutex<HashMap<String, broadcast::Sender<Signal>>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a topic, creating its channel if this is the
    /// first subscriber.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Signal> {
        let mut topics = self.topics.lock();
        let sender = topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Publish to a topic. A send with no live subscribers (or one that
    /// races a concurrent `subscribe`) is dropped silently — best-effort
    /// only. The persisted Signal is the durable record of truth.
    pub fn publish(&self, topic: &str, signal: &Signal) {
        let topics = self.topics.lock();
        if let Some(sender) = topics.get(topic) {
            // `send` errors only when there are zero receivers; that's the
            // expected no-subscriber case, not a failure worth logging.
            let _ = sender.send(signal.clone());
        }
    }
}

/// Canonicalize topic names: `signals:overseer`, `signals:worker:<id>`,
/// `signals:codebase:<name>`.
pub fn topic(kind: &str, id: &str) -> String {
    if kind.is_empty() {
        format!("signals:{id}")
    } else {
        format!("signals:{kind}:{id}")
    }
}
