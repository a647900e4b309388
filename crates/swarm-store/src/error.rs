// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not found: {collection} {id}")]
    NotFound { collection: &'static str, id: String },

    #[error("lock acquisition timed out")]
    LockTimeout,
}

impl From<StoreError> for swarm_core::SwarmError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { collection, id } => swarm_core::SwarmError::not_found(collection, id),
            StoreError::LockTimeout => swarm_core::SwarmError::StorageError("lock acquisition timed out".into()),
            other => swarm_core::SwarmError::StorageError(other.to_string()),
        }
    }
}
