//! Editor error types.

use flowboard_store::StoreError;

/// Errors surfaced by user-initiated editor operations.
///
/// Loader-level transport failures never appear here - they are absorbed by
/// the retry chain and, at worst, end in a synthesized default layout.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
  /// An operation requiring a sequence id was invoked without one.
  #[error("no sequence selected")]
  MissingIdentity,

  /// A save or regenerate call to the persistence collaborator failed.
  /// Prior layout state and the dirty flag are left unchanged.
  #[error("layout persistence failed: {source}")]
  Persistence {
    #[source]
    source: StoreError,
  },

  /// Regeneration returned no usable layout.
  #[error("regenerated layout was empty")]
  EmptyRegeneration,
}
