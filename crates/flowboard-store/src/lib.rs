//! Flowboard Store
//!
//! This crate provides the persistence boundary for sequence layouts. The
//! [`LayoutStore`] trait defines the three collaborator operations the
//! editor depends on:
//!
//! - fetching the persisted layout for a sequence
//! - saving a layout keyed by sequence id
//! - regenerating a layout server-side from the sequence's structure
//!
//! Two implementations ship here: [`MemoryStore`] (tests, demos) and
//! [`FsStore`] (JSON documents under a data directory).

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use flowboard_model::LayoutMap;

/// Error type for store operations.
///
/// Every variant is treated as a transport-level failure by the layout
/// loader (retry-eligible, never fatal); save/regenerate callers surface
/// them to the user instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// Network-level failure reaching the persistence collaborator.
  #[error("transport error: {0}")]
  Transport(String),

  /// Filesystem failure in a file-backed store.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The stored document could not be parsed.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Regeneration was requested for a sequence the store has never seen.
  #[error("unknown sequence: {0}")]
  UnknownSequence(String),
}

/// Persistence boundary for sequence layouts.
///
/// An empty returned map means "no layout persisted yet" - callers decide
/// whether that warrants a retry or a synthesized default.
#[async_trait]
pub trait LayoutStore: Send + Sync {
  /// Fetch the persisted layout for a sequence.
  async fn fetch_layout(&self, sequence_id: &str) -> Result<LayoutMap, StoreError>;

  /// Persist a layout keyed by sequence id.
  async fn save_layout(&self, sequence_id: &str, layout: &LayoutMap) -> Result<(), StoreError>;

  /// Compute and persist a fresh arrangement for the sequence.
  async fn regenerate_layout(&self, sequence_id: &str) -> Result<LayoutMap, StoreError>;
}
