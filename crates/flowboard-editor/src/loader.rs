//! Bounded-retry layout loading.
//!
//! [`LayoutLoader::load`] drives the retry chain for one sequence:
//! `Loading → {success, empty, failed}`, with empty responses and transport
//! errors treated identically (retry-eligible, logged, never propagated).
//! After the attempt cap the chain settles as [`LoadOutcome::GaveUp`] and
//! the caller synthesizes a default layout downstream.
//!
//! The loader itself is stateless between calls; re-entrancy and staleness
//! guards live in the editor, which owns the epoch token.

use std::sync::Arc;

use flowboard_model::LayoutMap;
use flowboard_store::LayoutStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::attempts::{LoadAttempts, RetryPolicy};

/// How a load chain settled.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
  /// A non-empty layout was fetched.
  Loaded(LayoutMap),
  /// Every attempt came back empty or failed.
  GaveUp,
  /// The cancellation token fired before the chain settled.
  Cancelled,
}

/// Drives bounded-retry layout fetches against a [`LayoutStore`].
pub struct LayoutLoader<S> {
  store: Arc<S>,
  policy: RetryPolicy,
}

impl<S: LayoutStore> LayoutLoader<S> {
  /// Create a loader with the given store and retry policy.
  pub fn new(store: Arc<S>, policy: RetryPolicy) -> Self {
    Self { store, policy }
  }

  /// Run the full retry chain for one sequence id.
  ///
  /// Attempts are strictly sequential: a retry never starts before the
  /// prior attempt's outcome is observed, and the backoff sleep races the
  /// cancellation token.
  #[instrument(name = "layout_load", skip(self, cancel), fields(sequence_id = %sequence_id))]
  pub async fn load(&self, sequence_id: &str, cancel: &CancellationToken) -> LoadOutcome {
    let mut attempts = LoadAttempts::new(self.policy.max_attempts);

    loop {
      if cancel.is_cancelled() {
        return LoadOutcome::Cancelled;
      }

      info!(
        attempt = attempts.used() + 1,
        max_attempts = self.policy.max_attempts,
        "loading layout"
      );

      match self.store.fetch_layout(sequence_id).await {
        Ok(layout) if !layout.is_empty() => {
          attempts.reset();
          info!(nodes = layout.len(), "layout loaded");
          return LoadOutcome::Loaded(layout);
        }
        Ok(_) => {
          warn!("no layout data returned, or empty layout");
        }
        Err(e) => {
          // Transport and parse failures are absorbed here; for retry
          // purposes they are indistinguishable from an empty response.
          warn!(error = %e, "layout fetch failed");
        }
      }

      attempts.record_failure();
      if attempts.exhausted() {
        info!("max load attempts reached, continuing without layout");
        return LoadOutcome::GaveUp;
      }

      info!(
        delay_ms = self.policy.retry_delay.as_millis() as u64,
        used = attempts.used(),
        max_attempts = self.policy.max_attempts,
        "retrying after delay"
      );

      tokio::select! {
        _ = tokio::time::sleep(self.policy.retry_delay) => {}
        _ = cancel.cancelled() => return LoadOutcome::Cancelled,
      }
    }
  }
}
