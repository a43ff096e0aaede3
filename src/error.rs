// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Rejected before any state change; the message is meant for the user.
    #[error("{0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("failed to persist changes: {0}")]
    Storage(#[from] StoreError),
    #[error("invalid backup: {0}")]
    InvalidBackup(String),
    /// A batch was rejected because of the entry at `index`.
    #[error("entry {index}: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<TrackerError>,
    },
}

impl TrackerError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        match self {
            TrackerError::Validation(_) => true,
            TrackerError::Batch { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
