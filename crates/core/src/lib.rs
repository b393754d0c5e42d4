//! Core types for cindex, a registry of cached identifiers.
//!
//! This crate provides:
//! - The cache index registry and its backend contract
//! - In-memory, CSV and SQLite backends
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod index;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use index::{
    Backend, BackendKind, CacheEntry, CacheIndex, Clock, CsvIndex, IndexBackend, ManualClock, MemoryIndex,
    SqliteIndex, SystemClock,
};
