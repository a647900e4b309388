// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The embedded key-value store (spec.md §4.A): collections of JSON
//! records behind a single state file, guarded by the directory-create
//! advisory lock in [`crate::lock`]. Reads are lock-free; writes follow
//! read-mutate-write-under-lock with an atomic rename into place so a
//! reader never observes a torn file.

use crate::error::StoreError;
use crate::lock;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swarm_core::ids::IdGen;
use swarm_core::{Clock, Record};

/// `{collection -> {id -> json record}}`. A loose `HashMap<String, Value>`
/// at the storage boundary (rather than one Rust enum of all entities) so
/// new collections never require a schema migration; typed (de)serialization
/// happens at each call site via `Record`.
pub type State = HashMap<String, HashMap<String, Value>>;

pub struct Store {
    state_path: PathBuf,
    lock_dir: PathBuf,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGen>,
}

impl Store {
    pub fn new(workspace_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>, id_gen: Arc<dyn IdGen>) -> Self {
        let workspace_dir = workspace_dir.into();
        Self {
            state_path: workspace_dir.join("state.json"),
            lock_dir: workspace_dir.join(".lock"),
            clock,
            id_gen,
        }
    }

    /// Lock-free read of the complete state snapshot. A missing file means
    /// "empty state"; a present-but-corrupt file is a fatal decode error.
    fn load(&self) -> Result<State, StoreError> {
        match std::fs::read(&self.state_path) {
            Ok(bytes) if bytes.is_empty() => Ok(State::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(State::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Acquire the lock, load current state, run `mutate`, then write the
    /// result to a sibling temp file and atomically rename it into place.
    fn commit<R>(&self, mutate: impl FnOnce(&mut State) -> R) -> Result<R, StoreError> {
        let _guard = lock::acquire(&self.lock_dir)?;
        let mut state = self.load()?;
        let result = mutate(&mut state);

        let tmp_path = self.state_path.with_extension("json.tmp");
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&state)?;
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, &self.state_path)?;
        Ok(result)
    }

    /// Insert a new record: stamps `created_at`/`updated_at` and fills a
    /// missing identifier from the collection's prefix.
    pub fn insert<T: Record>(&self, mut record: T) -> Result<T, StoreError> {
        record.ensure_id(self.id_gen.as_ref());
        let now = self.clock.now_secs();
        record.set_created_at(now);
        record.set_updated_at(now);
        let id = record.id_str();
        let value = serde_json::to_value(&record)?;
        self.commit(|state| {
            state.entry(T::COLLECTION.to_string()).or_default().insert(id, value);
        })?;
        Ok(record)
    }

    pub fn get<T: Record>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let state = self.load()?;
        let Some(raw) = state.get(T::COLLECTION).and_then(|c| c.get(id)) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(raw.clone())?))
    }

    pub fn fetch<T: Record>(&self, id: &str) -> Result<T, StoreError> {
        self.get(id)?.ok_or_else(|| StoreError::NotFound { collection: T::COLLECTION, id: id.to_string() })
    }

    /// Upsert: stamps `updated_at` (does not touch `created_at` if the
    /// record already existed with one; callers that want to preserve the
    /// original `created_at` should `fetch` first and copy it over).
    pub fn put<T: Record>(&self, mut record: T) -> Result<T, StoreError> {
        record.set_updated_at(self.clock.now_secs());
        let id = record.id_str();
        let value = serde_json::to_value(&record)?;
        self.commit(|state| {
            state.entry(T::COLLECTION.to_string()).or_default().insert(id, value);
        })?;
        Ok(record)
    }

    pub fn delete<T: Record>(&self, id: &str) -> Result<(), StoreError> {
        self.commit(|state| {
            if let Some(collection) = state.get_mut(T::COLLECTION) {
                collection.remove(id);
            }
        })
    }

    pub fn all<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let state = self.load()?;
        let Some(collection) = state.get(T::COLLECTION) else {
            return Ok(Vec::new());
        };
        collection.values().map(|v| Ok(serde_json::from_value(v.clone())?)).collect()
    }

    pub fn filter<T: Record>(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        Ok(self.all::<T>()?.into_iter().filter(pred).collect())
    }

    pub fn find_one<T: Record>(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, StoreError> {
        Ok(self.all::<T>()?.into_iter().find(pred))
    }

    pub fn count<T: Record>(&self) -> Result<usize, StoreError> {
        let state = self.load()?;
        Ok(state.get(T::COLLECTION).map(|c| c.len()).unwrap_or(0))
    }

    /// Filter + transform over all matching records in a single commit
    /// (one lock acquisition, one rename) instead of read-modify-write per
    /// record. Returns the number of records updated.
    pub fn update_matching<T: Record>(
        &self,
        pred: impl Fn(&T) -> bool,
        transform: impl Fn(&mut T),
    ) -> Result<usize, StoreError> {
        let now = self.clock.now_secs();
        self.commit(|state| -> Result<usize, StoreError> {
            let Some(collection) = state.get_mut(T::COLLECTION) else {
                return Ok(0);
            };
            let mut updated = 0;
            for value in collection.values_mut() {
                let mut record: T = serde_json::from_value(value.clone())?;
                if pred(&record) {
                    transform(&mut record);
                    record.set_updated_at(now);
                    *value = serde_json::to_value(&record)?;
                    updated += 1;
                }
            }
            Ok(updated)
        })?
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn now_secs(&self) -> u64 {
        self.clock.now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::ids::RandomIdGen;
    use swarm_core::test_support::{fake_codebase, fake_goal};
    use swarm_core::SystemClock;

    fn store(dir: &Path) -> Store {
        Store::new(dir, Arc::new(SystemClock), Arc::new(RandomIdGen))
    }

    #[test]
    fn insert_then_get_round_trips_with_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let codebase = fake_codebase("demo");
        let inserted = store.insert(codebase).unwrap();
        assert!(inserted.created_at > 0);
        assert_eq!(inserted.updated_at, inserted.created_at);

        let fetched: swarm_core::Codebase = store.fetch(inserted.id.as_str()).unwrap();
        assert_eq!(fetched.name, "demo");
    }

    #[test]
    fn fetch_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let err = store.fetch::<swarm_core::Codebase>("cmb-000000").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn put_upserts_and_count_reflects_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let codebase = store.insert(fake_codebase("a")).unwrap();
        assert_eq!(store.count::<swarm_core::Codebase>().unwrap(), 1);

        let mut updated = codebase.clone();
        updated.name = "renamed".into();
        store.put(updated).unwrap();
        assert_eq!(store.count::<swarm_core::Codebase>().unwrap(), 1);
        let fetched: swarm_core::Codebase = store.fetch(codebase.id.as_str()).unwrap();
        assert_eq!(fetched.name, "renamed");
    }

    #[test]
    fn delete_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let codebase = store.insert(fake_codebase("a")).unwrap();
        store.delete::<swarm_core::Codebase>(codebase.id.as_str()).unwrap();
        assert_eq!(store.count::<swarm_core::Codebase>().unwrap(), 0);
    }

    #[test]
    fn filter_and_find_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let cb = store.insert(fake_codebase("cb")).unwrap();
        let g1 = store.insert(fake_goal(cb.id)).unwrap();
        let mut g2 = fake_goal(cb.id);
        g2.name = "other".into();
        store.insert(g2).unwrap();

        let found = store.find_one::<swarm_core::Goal>(|g| g.id == g1.id).unwrap();
        assert!(found.is_some());
        let all = store.filter::<swarm_core::Goal>(|_| true).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn update_matching_transforms_all_hits_in_one_commit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let cb = store.insert(fake_codebase("cb")).unwrap();
        store.insert(fake_goal(cb.id)).unwrap();
        store.insert(fake_goal(cb.id)).unwrap();

        let updated = store
            .update_matching::<swarm_core::Goal>(|_| true, |g| g.status = swarm_core::GoalStatus::Active)
            .unwrap();
        assert_eq!(updated, 2);
        let all = store.all::<swarm_core::Goal>().unwrap();
        assert!(all.iter().all(|g| g.status == swarm_core::GoalStatus::Active));
    }

    #[test]
    fn concurrent_writers_never_corrupt_state() {
        use std::thread;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let path = path.clone();
                thread::spawn(move || {
                    let store = Store::new(&path, Arc::new(SystemClock), Arc::new(RandomIdGen));
                    for _ in 0..25 {
                        store.insert(fake_codebase("cb")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let store = store(&path);
        assert_eq!(store.count::<swarm_core::Codebase>().unwrap(), 100);
    }
}
