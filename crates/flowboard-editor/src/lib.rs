//! Flowboard Editor
//!
//! This crate provides the flow-editing core: the layout synchronization and
//! auto-connection engine behind the visual sequence editor.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Editor                              │
//! │  - select_sequence() resets per-sequence state (epoch)      │
//! │  - load_layout() drives the bounded retry chain             │
//! │  - render() adapts sequence + effective layout to a graph   │
//! │  - record_position_edits() / save_layout() / auto_layout()  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LayoutLoader                           │
//! │  - load(sequence_id, cancel) → Loaded | GaveUp | Cancelled  │
//! │  - 3 attempts, 1.5s spacing, errors == empty results        │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  LayoutStore (trait)                        │
//! │  - fetch_layout / save_layout / regenerate_layout           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three layout views (remote, local, synthesized default) live in a
//! single [`LayoutState`] tagged union so that invalid combinations cannot
//! be represented. Stale async results are abandoned via an epoch token the
//! editor compares when a load settles.

mod attempts;
mod editor;
mod error;
mod events;
mod loader;
mod state;

pub use attempts::{LoadAttempts, RetryPolicy};
pub use editor::{Editor, EditorOptions};
pub use error::EditorError;
pub use events::{ChannelNotifier, EditorEvent, EditorNotifier, NoopNotifier};
pub use loader::{LayoutLoader, LoadOutcome};
pub use state::{LayoutState, synthesize_default};
