// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod query;
pub mod records;
pub mod report;
pub mod utils;

pub use db::{KeyValueStore, MemoryStore, SqliteStore};
pub use error::{StoreError, TrackerError};
pub use records::RecordStore;
