//! Filesystem-based layout store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flowboard_model::{LayoutMap, Sequence, arrange};
use tokio::fs;
use tracing::debug;

use crate::{LayoutStore, StoreError};

/// Filesystem-based [`LayoutStore`].
///
/// Documents are stored per sequence under a root directory:
/// ```text
/// {root}/
/// ├── invoice-processing.layout.json
/// └── invoice-processing.sequence.json
/// ```
///
/// The sequence document is optional; it is only needed for
/// `regenerate_layout`, which arranges the stored step list.
pub struct FsStore {
  root: PathBuf,
}

impl FsStore {
  /// Create a new filesystem store at the given root path.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory of the store.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Register the sequence document used by `regenerate_layout`.
  pub async fn put_sequence(&self, sequence: &Sequence) -> Result<(), StoreError> {
    fs::create_dir_all(&self.root).await?;
    let path = self.sequence_path(&sequence.metadata.id);
    let content = serde_json::to_string_pretty(sequence)?;
    fs::write(&path, content).await?;
    Ok(())
  }

  fn layout_path(&self, sequence_id: &str) -> PathBuf {
    self.root.join(format!("{}.layout.json", sequence_id))
  }

  fn sequence_path(&self, sequence_id: &str) -> PathBuf {
    self.root.join(format!("{}.sequence.json", sequence_id))
  }
}

#[async_trait]
impl LayoutStore for FsStore {
  async fn fetch_layout(&self, sequence_id: &str) -> Result<LayoutMap, StoreError> {
    let path = self.layout_path(sequence_id);
    if !path.exists() {
      debug!(sequence_id = %sequence_id, "no layout document, returning empty");
      return Ok(LayoutMap::new());
    }

    let content = fs::read_to_string(&path).await?;
    let layout: LayoutMap = serde_json::from_str(&content)?;
    Ok(layout)
  }

  async fn save_layout(&self, sequence_id: &str, layout: &LayoutMap) -> Result<(), StoreError> {
    fs::create_dir_all(&self.root).await?;
    let path = self.layout_path(sequence_id);
    let content = serde_json::to_string_pretty(layout)?;
    fs::write(&path, content).await?;
    debug!(sequence_id = %sequence_id, nodes = layout.len(), "layout saved");
    Ok(())
  }

  async fn regenerate_layout(&self, sequence_id: &str) -> Result<LayoutMap, StoreError> {
    let path = self.sequence_path(sequence_id);
    if !path.exists() {
      return Err(StoreError::UnknownSequence(sequence_id.to_string()));
    }

    let content = fs::read_to_string(&path).await?;
    let sequence: Sequence = serde_json::from_str(&content)?;
    let layout = arrange(&sequence.steps);

    self.save_layout(sequence_id, &layout).await?;
    Ok(layout)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flowboard_model::{Position, SequenceMeta, Step};

  fn sequence(id: &str, step_ids: &[&str]) -> Sequence {
    Sequence {
      metadata: SequenceMeta {
        id: id.to_string(),
        name: id.to_string(),
      },
      steps: step_ids.iter().map(|s| Step::new(*s, *s)).collect(),
    }
  }

  #[tokio::test]
  async fn fetch_without_document_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    let layout = store.fetch_layout("seq").await.unwrap();
    assert!(layout.is_empty());
  }

  #[tokio::test]
  async fn save_then_fetch_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    let mut layout = LayoutMap::new();
    layout.insert("a".to_string(), Position::new(3.0, 4.0));
    store.save_layout("seq", &layout).await.unwrap();

    assert_eq!(store.fetch_layout("seq").await.unwrap(), layout);
  }

  #[tokio::test]
  async fn corrupt_document_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    tokio::fs::write(dir.path().join("seq.layout.json"), "not json")
      .await
      .unwrap();

    let err = store.fetch_layout("seq").await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
  }

  #[tokio::test]
  async fn regenerate_arranges_the_stored_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    let err = store.regenerate_layout("seq").await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownSequence(_)));

    store.put_sequence(&sequence("seq", &["a", "b"])).await.unwrap();
    let layout = store.regenerate_layout("seq").await.unwrap();

    assert_eq!(layout.len(), 2);
    assert_eq!(store.fetch_layout("seq").await.unwrap(), layout);
  }
}
