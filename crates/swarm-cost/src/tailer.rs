// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log tailing (spec.md §4.F): a single poller tracking per-worker
//! `{path, offset}` pairs, reading and recording only newly-appended,
//! complete lines on each tick.

use crate::events::parse_chunk;
use crate::extract::extract_costs;
use crate::recorder::CostRecorder;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use swarm_core::{SwarmError, WorkerId};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

struct Watched {
    path: PathBuf,
    offset: u64,
}

pub struct Tailer {
    recorder: Arc<CostRecorder>,
    watched: Mutex<HashMap<WorkerId, Watched>>,
}

impl Tailer {
    pub fn new(recorder: Arc<CostRecorder>) -> Self {
        Self { recorder, watched: Mutex::new(HashMap::new()) }
    }

    pub fn watch(&self, worker_id: WorkerId, path: PathBuf) {
        self.watched.lock().insert(worker_id, Watched { path, offset: 0 });
    }

    pub fn unwatch(&self, worker_id: &WorkerId) {
        self.watched.lock().remove(worker_id);
    }

    /// One poll across every watched worker. Returns the number of cost
    /// entries recorded this tick.
    pub async fn tick(&self) -> usize {
        let targets: Vec<(WorkerId, PathBuf, u64)> =
            self.watched.lock().iter().map(|(id, w)| (*id, w.path.clone(), w.offset)).collect();

        let mut recorded = 0;
        for (worker_id, path, offset) in targets {
            match read_new_complete_lines(&path, offset).await {
                Ok(Some((text, new_offset))) => {
                    recorded += self.parse_and_record(worker_id, &text);
                    if let Some(w) = self.watched.lock().get_mut(&worker_id) {
                        w.offset = new_offset;
                    }
                    if let Err(e) = self.recorder.stamp_heartbeat(worker_id) {
                        tracing::debug!(error = %e, "heartbeat stamp failed");
                    }
                }
                Ok(None) => {}
                Err(_) => {} // missing file: ignore, try again next tick
            }
        }
        recorded
    }

    /// One-shot full-file parse, used after a worker exits (spec.md §4.F).
    pub async fn final_parse(&self, worker_id: WorkerId, path: &Path) -> Result<usize, SwarmError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| SwarmError::StorageError(e.to_string()))?;
        if let Err(e) = self.recorder.stamp_heartbeat(worker_id) {
            tracing::debug!(error = %e, "heartbeat stamp failed");
        }
        Ok(self.parse_and_record(worker_id, &contents))
    }

    fn parse_and_record(&self, worker_id: WorkerId, text: &str) -> usize {
        let events = parse_chunk(text);
        let costs = extract_costs(&events);
        let mut recorded = 0;
        for attrs in costs {
            if self.recorder.record(worker_id, attrs).is_ok() {
                recorded += 1;
            }
        }
        recorded
    }

    pub async fn run(&self, interval: Duration) {
        loop {
            self.tick().await;
            tokio::time::sleep(interval).await;
        }
    }
}

/// Reads bytes appended since `offset`, but only up to the last complete
/// (`\n`-terminated) line — a trailing partial line is left unconsumed for
/// the next tick. A shrunk file (rotation) resets to offset 0 and re-reads
/// from the start. Returns `Ok(None)` if the file is missing or unchanged.
async fn read_new_complete_lines(path: &Path, offset: u64) -> std::io::Result<Option<(String, u64)>> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let len = metadata.len();
    let read_from = if len < offset { 0 } else { offset };
    if len <= read_from {
        return Ok(None);
    }

    let mut file = tokio::fs::File::open(path).await?;
    file.seek(SeekFrom::Start(read_from)).await?;
    let mut buf = Vec::with_capacity((len - read_from) as usize);
    file.read_to_end(&mut buf).await?;

    let text = String::from_utf8_lossy(&buf);
    let Some(last_newline) = text.rfind('\n') else {
        return Ok(None);
    };
    let consumed = &text[..=last_newline];
    let new_offset = read_from + consumed.len() as u64;
    Ok(Some((consumed.to_string(), new_offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{ModelPricing, PricingTable};
    use std::collections::HashMap as StdHashMap;
    use swarm_bus::{MessageBus, TopicRegistry};
    use swarm_core::ids::RandomIdGen;
    use swarm_core::{CostEntry, SystemClock, Worker, WorkerStatus};
    use swarm_store::Store;

    fn tailer() -> (Tailer, Arc<Store>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(dir.path(), Arc::new(SystemClock), Arc::new(RandomIdGen)));
        let bus = Arc::new(MessageBus::new(store.clone(), Arc::new(TopicRegistry::new())));
        let mut models = StdHashMap::new();
        models.insert("M".to_string(), ModelPricing { input_per_million: 3.0, output_per_million: 15.0, cache_read_per_million: 0.3, cache_write_per_million: 3.75 });
        let pricing = PricingTable { models, default_model: "M".to_string() };
        let recorder = Arc::new(CostRecorder::new(store.clone(), bus, pricing));
        (Tailer::new(recorder), store, dir)
    }

    #[tokio::test]
    async fn tick_reads_only_complete_lines_and_advances_offset() {
        let (tailer, store, dir) = tailer();
        let log_path = dir.path().join("worker.log");
        let worker_id = WorkerId::from_string("bee-000001");
        tokio::fs::write(&log_path, r#"{"type":"result","usage":{"input_tokens":10,"output_tokens":0,"cache_read_tokens":0,"cache_write_tokens":0},"model":"M"}"#).await.unwrap();
        tailer.watch(worker_id, log_path.clone());

        // No trailing newline yet: nothing should be consumed.
        assert_eq!(tailer.tick().await, 0);
        assert_eq!(store.count::<CostEntry>().unwrap(), 0);

        tokio::fs::write(
            &log_path,
            format!(
                "{}\n",
                r#"{"type":"result","usage":{"input_tokens":10,"output_tokens":0,"cache_read_tokens":0,"cache_write_tokens":0},"model":"M"}"#
            ),
        )
        .await
        .unwrap();
        assert_eq!(tailer.tick().await, 1);
        assert_eq!(store.count::<CostEntry>().unwrap(), 1);

        // Nothing new appended: second tick is a no-op.
        assert_eq!(tailer.tick().await, 0);
    }

    #[tokio::test]
    async fn missing_file_is_ignored() {
        let (tailer, _store, dir) = tailer();
        let worker_id = WorkerId::from_string("bee-000002");
        tailer.watch(worker_id, dir.path().join("does-not-exist.log"));
        assert_eq!(tailer.tick().await, 0);
    }

    #[tokio::test]
    async fn shrunk_file_resets_offset_to_zero() {
        let (tailer, store, dir) = tailer();
        let log_path = dir.path().join("worker.log");
        let worker_id = WorkerId::from_string("bee-000003");
        let line = r#"{"type":"result","usage":{"input_tokens":10,"output_tokens":0,"cache_read_tokens":0,"cache_write_tokens":0},"model":"M"}"#;
        tokio::fs::write(&log_path, format!("{line}\n{line}\n")).await.unwrap();
        tailer.watch(worker_id, log_path.clone());
        tailer.tick().await;
        assert_eq!(store.count::<CostEntry>().unwrap(), 2);

        // Rotated: file replaced with a single, shorter fresh line.
        tokio::fs::write(&log_path, format!("{line}\n")).await.unwrap();
        tailer.tick().await;
        assert_eq!(store.count::<CostEntry>().unwrap(), 3);
    }

    #[tokio::test]
    async fn tick_stamps_worker_heartbeat_on_new_bytes() {
        let (tailer, store, dir) = tailer();
        let log_path = dir.path().join("worker.log");
        let worker = store
            .insert(Worker {
                id: Default::default(),
                name: "w".into(),
                status: WorkerStatus::Working,
                work_item_id: None,
                sandbox_path: None,
                pid: None,
                last_heartbeat_at: None,
                created_at: 0,
                updated_at: 0,
            })
            .unwrap();
        tokio::fs::write(&log_path, "not json\n").await.unwrap();
        tailer.watch(worker.id, log_path.clone());

        tailer.tick().await;
        let refreshed: Worker = store.fetch(worker.id.as_str()).unwrap();
        assert!(refreshed.last_heartbeat_at.is_some());
    }

    #[tokio::test]
    async fn final_parse_records_everything_in_one_shot() {
        let (tailer, store, dir) = tailer();
        let log_path = dir.path().join("worker.log");
        let worker_id = WorkerId::from_string("bee-000004");
        let line = r#"{"type":"result","usage":{"input_tokens":10,"output_tokens":0,"cache_read_tokens":0,"cache_write_tokens":0},"model":"M"}"#;
        tokio::fs::write(&log_path, format!("{line}\n{line}\n")).await.unwrap();

        let recorded = tailer.final_parse(worker_id, &log_path).await.unwrap();
        assert_eq!(recorded, 2);
        assert_eq!(store.count::<CostEntry>().unwrap(), 2);
    }
}
