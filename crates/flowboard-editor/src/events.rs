//! Editor events and notifiers.
//!
//! Events are emitted for everything the host surfaces to the user (toasts)
//! or forwards to the rendering collaborator (fit-to-view requests). The
//! editor calls `notify` for each event - implementations decide what to do
//! with them (show, forward, log, ignore).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
  /// Steps lacking forward connections were linked into a logical flow.
  AutoConnected { sequence_id: String },

  /// The current layout was committed to the store.
  LayoutSaved { sequence_id: String },

  /// Committing the layout failed; state was left unchanged.
  SaveFailed { error: String },

  /// Layout regeneration was requested from the store.
  RegenerateStarted { sequence_id: String },

  /// A regenerated layout replaced the current views.
  LayoutRegenerated { sequence_id: String },

  /// Regeneration failed; state was left unchanged.
  RegenerateFailed { error: String },

  /// The rendering collaborator should recenter/zoom to the content.
  FitRequested,
}

/// Trait for receiving editor events.
pub trait EditorNotifier: Send + Sync {
  /// Called when an editor event occurs.
  fn notify(&self, event: EditorEvent);
}

/// A no-op notifier that discards all events.
///
/// Useful for tests or headless use where event observation is not needed.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl EditorNotifier for NoopNotifier {
  fn notify(&self, _event: EditorEvent) {
    // Intentionally empty
  }
}

/// A notifier that sends events to an unbounded channel.
///
/// Use this when the consumer runs elsewhere (e.g. a UI task turning events
/// into toasts and viewport calls). Unbounded so the editor never blocks on
/// a slow consumer; event volume is low.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<EditorEvent>,
}

impl ChannelNotifier {
  /// Create a new channel notifier.
  pub fn new(sender: mpsc::UnboundedSender<EditorEvent>) -> Self {
    Self { sender }
  }
}

impl EditorNotifier for ChannelNotifier {
  fn notify(&self, event: EditorEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
