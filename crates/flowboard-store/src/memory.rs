//! In-memory layout store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use flowboard_model::{LayoutMap, Sequence, arrange};

use crate::{LayoutStore, StoreError};

/// In-memory [`LayoutStore`] for tests and demos.
///
/// Sequences registered via [`MemoryStore::put_sequence`] can have their
/// layout regenerated; fetching a never-saved layout yields an empty map.
#[derive(Debug, Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
  layouts: HashMap<String, LayoutMap>,
  sequences: HashMap<String, Sequence>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a sequence so `regenerate_layout` can arrange its steps.
  pub fn put_sequence(&self, sequence: Sequence) {
    let mut inner = self.inner.lock().expect("memory store poisoned");
    inner
      .sequences
      .insert(sequence.metadata.id.clone(), sequence);
  }
}

#[async_trait]
impl LayoutStore for MemoryStore {
  async fn fetch_layout(&self, sequence_id: &str) -> Result<LayoutMap, StoreError> {
    let inner = self.inner.lock().expect("memory store poisoned");
    Ok(inner.layouts.get(sequence_id).cloned().unwrap_or_default())
  }

  async fn save_layout(&self, sequence_id: &str, layout: &LayoutMap) -> Result<(), StoreError> {
    let mut inner = self.inner.lock().expect("memory store poisoned");
    inner.layouts.insert(sequence_id.to_string(), layout.clone());
    Ok(())
  }

  async fn regenerate_layout(&self, sequence_id: &str) -> Result<LayoutMap, StoreError> {
    let mut inner = self.inner.lock().expect("memory store poisoned");
    let steps = inner
      .sequences
      .get(sequence_id)
      .map(|s| s.steps.clone())
      .ok_or_else(|| StoreError::UnknownSequence(sequence_id.to_string()))?;

    let layout = arrange(&steps);
    inner.layouts.insert(sequence_id.to_string(), layout.clone());
    Ok(layout)
  }
}
