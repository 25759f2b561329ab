//! Layout view state.
//!
//! Three logical layouts exist for a sequence: the remote-confirmed map, a
//! local working copy with unsaved edits, and a synthesized default used
//! when loading was exhausted without data. [`LayoutState`] models them as
//! one tagged union so the precedence rule (local when dirty, else remote,
//! else default) falls out of a single match and invalid combinations
//! (e.g. "dirty but no local map") cannot exist.

use flowboard_model::{LayoutMap, Position, PositionEdit, Step};

/// Default-synthesis constants: a vertical stack at a fixed x.
const DEFAULT_X: f64 = 250.0;
const DEFAULT_Y_START: f64 = 100.0;
const DEFAULT_Y_SPACING: f64 = 150.0;

/// The layout views for the current sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LayoutState {
  /// Nothing loaded or edited yet.
  #[default]
  Unset,
  /// Remote layout installed, no unsaved edits.
  Remote(LayoutMap),
  /// Local working copy with unsaved edits, plus the last-known remote
  /// baseline (kept so a failed save loses nothing).
  Edited {
    local: LayoutMap,
    remote: Option<LayoutMap>,
  },
  /// Synthesized default after load attempts were exhausted.
  Fallback(LayoutMap),
}

impl LayoutState {
  /// The layout the renderer should use right now, per the precedence rule.
  /// `None` means the renderer falls back to its implicit arrangement.
  pub fn effective(&self) -> Option<&LayoutMap> {
    match self {
      LayoutState::Unset => None,
      LayoutState::Remote(map) => Some(map),
      LayoutState::Edited { local, .. } => Some(local),
      LayoutState::Fallback(map) => Some(map),
    }
  }

  /// The remote-confirmed baseline, if any.
  pub fn remote(&self) -> Option<&LayoutMap> {
    match self {
      LayoutState::Remote(map) => Some(map),
      LayoutState::Edited { remote, .. } => remote.as_ref(),
      _ => None,
    }
  }

  /// True while unsaved local edits exist.
  pub fn is_dirty(&self) -> bool {
    matches!(self, LayoutState::Edited { .. })
  }

  /// Install a freshly fetched remote layout.
  ///
  /// Empty maps are ignored: a non-empty key set is never replaced by an
  /// empty one. When local edits exist only the baseline is refreshed, so
  /// a successful re-load never overwrites an initialized local layout.
  pub fn install_remote(&mut self, map: LayoutMap) {
    if map.is_empty() {
      return;
    }
    match self {
      LayoutState::Edited { remote, .. } => *remote = Some(map),
      _ => *self = LayoutState::Remote(map),
    }
  }

  /// Merge a batch of position edits into the local layout, creating it
  /// from the currently rendered positions when it does not exist yet.
  ///
  /// Every edit in the batch lands in the merged result; for repeated ids
  /// the last write wins.
  pub fn record_edits(&mut self, edits: &[PositionEdit], rendered: &LayoutMap) {
    if edits.is_empty() {
      return;
    }

    if !matches!(self, LayoutState::Edited { .. }) {
      let local = if rendered.is_empty() {
        self.effective().cloned().unwrap_or_default()
      } else {
        rendered.clone()
      };
      let remote = match std::mem::take(self) {
        LayoutState::Remote(map) => Some(map),
        _ => None,
      };
      *self = LayoutState::Edited { local, remote };
    }

    if let LayoutState::Edited { local, .. } = self {
      for edit in edits {
        local.insert(edit.id.clone(), edit.position);
      }
    }
  }

  /// A commit succeeded: remote and local both equal the committed map and
  /// the dirty flag clears.
  pub fn committed(&mut self, map: LayoutMap) {
    *self = LayoutState::Remote(map);
  }

  /// A regeneration succeeded: both views are replaced by the new map.
  pub fn regenerated(&mut self, map: LayoutMap) {
    *self = LayoutState::Remote(map);
  }

  /// Synthesize the default layout for `steps` if no layout exists at all.
  /// Invoked only after load attempts are exhausted.
  pub fn fall_back_to_default(&mut self, steps: &[Step]) {
    if matches!(self, LayoutState::Unset) {
      *self = LayoutState::Fallback(synthesize_default(steps));
    }
  }
}

/// Deterministic default layout: a vertical stack, `x = 250`,
/// `y = 100 + 150 * index` for the index-th step in list order.
pub fn synthesize_default(steps: &[Step]) -> LayoutMap {
  steps
    .iter()
    .enumerate()
    .map(|(index, step)| {
      (
        step.id.clone(),
        Position::new(DEFAULT_X, DEFAULT_Y_START + DEFAULT_Y_SPACING * index as f64),
      )
    })
    .collect()
}
