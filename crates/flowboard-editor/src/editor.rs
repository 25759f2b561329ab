//! Editor session.
//!
//! The [`Editor`] owns all per-sequence layout state and coordinates the
//! collaborators: the layout loader, the persistence store, and (through
//! events) the rendering host. State lives behind a mutex that is never
//! held across an await; every suspension point re-checks the epoch token
//! so results that resolve after a sequence switch are abandoned instead
//! of being applied to the new sequence's state.

use std::sync::{Arc, Mutex};

use flowboard_model::{FlowGraph, LayoutMap, PositionEdit, Sequence, connect_steps, to_graph};
use flowboard_store::LayoutStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::attempts::RetryPolicy;
use crate::error::EditorError;
use crate::events::{EditorEvent, EditorNotifier, NoopNotifier};
use crate::loader::{LayoutLoader, LoadOutcome};
use crate::state::LayoutState;

/// Editor behavior flags.
#[derive(Debug, Clone, Copy)]
pub struct EditorOptions {
  /// Presentation mode: position edits, saves, and auto-connection are
  /// disabled.
  pub read_only: bool,
  /// Repair missing sequential links on render. Only applies to editable
  /// sessions with at least two steps.
  pub auto_connect: bool,
}

impl Default for EditorOptions {
  fn default() -> Self {
    Self {
      read_only: false,
      auto_connect: true,
    }
  }
}

/// What the view should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewPhase {
  /// No sequence selected - placeholder.
  NoSequence,
  /// A load chain is pending or running - blocking spinner, no render.
  Loading,
  /// Layout settled (loaded, defaulted, or absent) - render away.
  Ready,
}

struct EditorState {
  sequence: Option<Sequence>,
  layout: LayoutState,
  phase: ViewPhase,
  /// Generation token; bumped on every sequence identity change. A load or
  /// save that settles under a different epoch is abandoned.
  epoch: u64,
  /// Re-entrant guard: at most one load chain per sequence.
  in_flight: bool,
  /// Whether fit-to-view was already requested for this sequence.
  fitted: bool,
  /// Positions from the most recent render; seeds the local layout when the
  /// first edit arrives.
  rendered: LayoutMap,
  /// Cancels the current sequence's load chain on identity change.
  cancel: CancellationToken,
}

impl EditorState {
  fn new() -> Self {
    Self {
      sequence: None,
      layout: LayoutState::Unset,
      phase: ViewPhase::NoSequence,
      epoch: 0,
      in_flight: false,
      fitted: false,
      rendered: LayoutMap::new(),
      cancel: CancellationToken::new(),
    }
  }

  fn sequence_id(&self) -> Option<String> {
    self.sequence.as_ref().map(|s| s.metadata.id.clone())
  }
}

/// The flow editor core.
///
/// Generic over the persistence store and `N: EditorNotifier` to allow
/// different notification strategies. Use [`Editor::new`] for a default
/// editor with no-op notifications, or [`Editor::with_notifier`] to observe
/// events.
pub struct Editor<S, N: EditorNotifier = NoopNotifier> {
  store: Arc<S>,
  loader: LayoutLoader<S>,
  notifier: N,
  options: EditorOptions,
  state: Mutex<EditorState>,
}

impl<S: LayoutStore> Editor<S, NoopNotifier> {
  /// Create an editor with no-op notifications.
  pub fn new(store: Arc<S>, options: EditorOptions) -> Self {
    Self::with_notifier(store, options, NoopNotifier)
  }
}

impl<S: LayoutStore, N: EditorNotifier> Editor<S, N> {
  /// Create an editor with a custom notifier and the default retry policy.
  pub fn with_notifier(store: Arc<S>, options: EditorOptions, notifier: N) -> Self {
    Self::with_policy(store, options, notifier, RetryPolicy::default())
  }

  /// Create an editor with a custom retry policy.
  pub fn with_policy(
    store: Arc<S>,
    options: EditorOptions,
    notifier: N,
    policy: RetryPolicy,
  ) -> Self {
    Self {
      loader: LayoutLoader::new(store.clone(), policy),
      store,
      notifier,
      options,
      state: Mutex::new(EditorState::new()),
    }
  }

  /// Select the sequence to edit.
  ///
  /// A change of sequence identity (`metadata.id`) invalidates everything:
  /// layout views, attempt accounting, the fit flag, and any in-flight load
  /// (cancelled and epoch-fenced). Re-selecting the same identity only
  /// refreshes the step list.
  pub fn select_sequence(&self, sequence: Option<Sequence>) {
    let mut state = self.lock();

    let new_id = sequence.as_ref().map(|s| s.metadata.id.clone());
    if new_id == state.sequence_id() {
      state.sequence = sequence;
      return;
    }

    state.cancel.cancel();
    state.cancel = CancellationToken::new();
    state.epoch += 1;
    state.layout = LayoutState::Unset;
    state.in_flight = false;
    state.fitted = false;
    state.rendered.clear();
    state.phase = if new_id.is_some() {
      ViewPhase::Loading
    } else {
      ViewPhase::NoSequence
    };
    state.sequence = sequence;

    info!(
      sequence_id = new_id.as_deref().unwrap_or("<none>"),
      epoch = state.epoch,
      "sequence selected, layout state reset"
    );
  }

  /// Drive the load chain for the selected sequence to completion.
  ///
  /// Only the first trigger per sequence runs the chain; duplicate
  /// concurrent triggers return immediately. A sequence without an id
  /// short-circuits out of the blocking phase with nothing loaded. On
  /// exhaustion with no layout present, the default layout is synthesized
  /// from the current steps - no error surfaces.
  #[instrument(name = "editor_load_layout", skip(self))]
  pub async fn load_layout(&self) {
    let (sequence_id, epoch, cancel) = {
      let mut state = self.lock();

      if state.in_flight {
        debug!("load already in flight, ignoring duplicate trigger");
        return;
      }
      if state.phase != ViewPhase::Loading {
        return;
      }

      let id = state.sequence_id().filter(|id| !id.is_empty());
      let Some(id) = id else {
        warn!("sequence has no id, continuing without layout");
        state.phase = ViewPhase::Ready;
        return;
      };

      state.in_flight = true;
      (id, state.epoch, state.cancel.clone())
    };

    let outcome = self.loader.load(&sequence_id, &cancel).await;

    let mut state = self.lock();
    if state.epoch != epoch {
      info!(
        sequence_id = %sequence_id,
        "sequence changed mid-load, abandoning stale result"
      );
      return;
    }

    state.in_flight = false;
    match outcome {
      LoadOutcome::Loaded(map) => state.layout.install_remote(map),
      LoadOutcome::GaveUp | LoadOutcome::Cancelled => {
        let EditorState {
          layout, sequence, ..
        } = &mut *state;
        if let Some(sequence) = sequence {
          layout.fall_back_to_default(&sequence.steps);
        }
      }
    }
    state.phase = ViewPhase::Ready;
  }

  /// Adapt the selected sequence and effective layout into renderable node
  /// and edge lists.
  ///
  /// Returns `None` while the loader is pending or no sequence is selected,
  /// so an incomplete or default layout never flashes before the
  /// authoritative one arrives. Editable sessions with auto-connection
  /// enabled get missing sequential links repaired here; an
  /// [`EditorEvent::AutoConnected`] fires only when something changed.
  pub fn render(&self) -> Option<FlowGraph> {
    let mut state = self.lock();
    if state.phase != ViewPhase::Ready {
      return None;
    }
    state.sequence.as_ref()?;

    if self.options.auto_connect && !self.options.read_only {
      if let Some(sequence) = state.sequence.as_mut() {
        if sequence.steps.len() >= 2 {
          let connected = connect_steps(&sequence.steps);
          if connected != sequence.steps {
            sequence.steps = connected;
            let sequence_id = sequence.metadata.id.clone();
            info!(sequence_id = %sequence_id, "steps auto-connected into logical flow");
            self.notifier.notify(EditorEvent::AutoConnected { sequence_id });
          }
        }
      }
    }

    let graph = {
      let sequence = state.sequence.as_ref()?;
      to_graph(sequence, state.layout.effective())
    };

    state.rendered = graph
      .nodes
      .iter()
      .map(|n| (n.id.clone(), n.position))
      .collect();

    if !state.fitted {
      state.fitted = true;
      self.notifier.notify(EditorEvent::FitRequested);
    }

    Some(graph)
  }

  /// Merge position changes from the rendering collaborator into the local
  /// layout and mark it dirty.
  ///
  /// Batched multi-node updates merge without loss. Edits are ignored in
  /// read-only sessions and while the loader is still pending.
  pub fn record_position_edits(&self, edits: &[PositionEdit]) {
    if self.options.read_only || edits.is_empty() {
      return;
    }

    let mut state = self.lock();
    if state.phase != ViewPhase::Ready {
      debug!("ignoring position edits while layout is loading");
      return;
    }

    let EditorState {
      layout, rendered, ..
    } = &mut *state;
    layout.record_edits(edits, rendered);
    debug!(edits = edits.len(), "position edits recorded");
  }

  /// Commit the current effective layout to the store.
  ///
  /// On success both layout views equal the committed map and the dirty
  /// flag clears. On failure nothing changes, so the user can retry.
  pub async fn save_layout(&self) -> Result<(), EditorError> {
    if self.options.read_only {
      return Ok(());
    }

    let (sequence_id, layout, epoch) = {
      let state = self.lock();

      let Some(id) = state.sequence_id().filter(|id| !id.is_empty()) else {
        let err = EditorError::MissingIdentity;
        self.notifier.notify(EditorEvent::SaveFailed {
          error: err.to_string(),
        });
        return Err(err);
      };
      let Some(layout) = state.layout.effective().cloned() else {
        debug!(sequence_id = %id, "no layout to save");
        return Ok(());
      };
      (id, layout, state.epoch)
    };

    match self.store.save_layout(&sequence_id, &layout).await {
      Ok(()) => {
        {
          let mut state = self.lock();
          if state.epoch == epoch {
            state.layout.committed(layout);
          }
        }
        info!(sequence_id = %sequence_id, "layout saved");
        self.notifier.notify(EditorEvent::LayoutSaved { sequence_id });
        Ok(())
      }
      Err(e) => {
        error!(sequence_id = %sequence_id, error = %e, "failed to save layout");
        self.notifier.notify(EditorEvent::SaveFailed {
          error: e.to_string(),
        });
        Err(EditorError::Persistence { source: e })
      }
    }
  }

  /// Request a freshly computed arrangement from the store and install it.
  ///
  /// On success both layout views are replaced, the dirty flag clears, and
  /// a fit-to-view is requested. On failure (or an empty result) no layout
  /// state changes.
  pub async fn auto_layout(&self) -> Result<(), EditorError> {
    let (sequence_id, epoch) = {
      let state = self.lock();
      let Some(id) = state.sequence_id().filter(|id| !id.is_empty()) else {
        let err = EditorError::MissingIdentity;
        self.notifier.notify(EditorEvent::RegenerateFailed {
          error: err.to_string(),
        });
        return Err(err);
      };
      (id, state.epoch)
    };

    self.notifier.notify(EditorEvent::RegenerateStarted {
      sequence_id: sequence_id.clone(),
    });

    match self.store.regenerate_layout(&sequence_id).await {
      Ok(map) if !map.is_empty() => {
        {
          let mut state = self.lock();
          if state.epoch == epoch {
            state.layout.regenerated(map);
            state.fitted = true;
          }
        }
        info!(sequence_id = %sequence_id, "layout regenerated");
        self.notifier.notify(EditorEvent::LayoutRegenerated { sequence_id });
        self.notifier.notify(EditorEvent::FitRequested);
        Ok(())
      }
      Ok(_) => {
        let err = EditorError::EmptyRegeneration;
        warn!(sequence_id = %sequence_id, "regeneration returned an empty layout");
        self.notifier.notify(EditorEvent::RegenerateFailed {
          error: err.to_string(),
        });
        Err(err)
      }
      Err(e) => {
        error!(sequence_id = %sequence_id, error = %e, "failed to regenerate layout");
        self.notifier.notify(EditorEvent::RegenerateFailed {
          error: e.to_string(),
        });
        Err(EditorError::Persistence { source: e })
      }
    }
  }

  /// Ask the rendering collaborator to recenter/zoom to the content.
  pub fn fit_view(&self) {
    let mut state = self.lock();
    state.fitted = true;
    self.notifier.notify(EditorEvent::FitRequested);
  }

  /// Identity of the selected sequence, if any.
  pub fn sequence_id(&self) -> Option<String> {
    self.lock().sequence_id()
  }

  /// True while the load chain for the selected sequence is pending.
  pub fn is_loading(&self) -> bool {
    self.lock().phase == ViewPhase::Loading
  }

  /// True while unsaved local position edits exist.
  pub fn is_dirty(&self) -> bool {
    self.lock().layout.is_dirty()
  }

  /// A copy of the layout currently effective for rendering.
  pub fn effective_layout(&self) -> Option<LayoutMap> {
    self.lock().layout.effective().cloned()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, EditorState> {
    self.state.lock().expect("editor state poisoned")
  }
}
