//! Layout position types.
//!
//! A layout is a mapping from step id to a 2D canvas position. Three logical
//! layout instances exist at runtime (remote, local, default); this module
//! only defines the shared map type - the precedence policy lives in the
//! editor crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A 2D canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Mapping from step id to canvas position.
pub type LayoutMap = HashMap<String, Position>;

/// A single position change reported by the rendering collaborator, e.g.
/// one entry of a (possibly multi-select) drag operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEdit {
  pub id: String,
  pub position: Position,
}

impl PositionEdit {
  pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
    Self {
      id: id.into(),
      position: Position::new(x, y),
    }
  }
}
