use serde::{Deserialize, Serialize};

/// Category of a step, used by the host to pick an icon/visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
  Prompt,
  Tool,
  Condition,
  Data,
  Loop,
  Api,
  Notification,
  Input,
  #[default]
  Other,
}

/// A single step in a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
  pub id: String,
  pub label: String,
  #[serde(default)]
  pub kind: StepKind,
  /// Explicit successor step ids. Empty means the connection is inferred
  /// positionally (see [`crate::connect_steps`]).
  #[serde(default)]
  pub next: Vec<String>,
  /// Step-specific configuration, opaque to the editor.
  #[serde(default)]
  pub payload: serde_json::Value,
}

impl Step {
  /// Create a step with the given id and label and no explicit links.
  pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      label: label.into(),
      kind: StepKind::default(),
      next: Vec::new(),
      payload: serde_json::Value::Null,
    }
  }
}

/// Identity and display metadata for a sequence.
///
/// `id` is the stable identity: when it changes, all cached layout state
/// for the previous sequence is invalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceMeta {
  pub id: String,
  pub name: String,
}

/// An identified, ordered collection of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
  pub metadata: SequenceMeta,
  #[serde(default)]
  pub steps: Vec<Step>,
}

impl Sequence {
  /// Get a step by id.
  pub fn get_step(&self, step_id: &str) -> Option<&Step> {
    self.steps.iter().find(|s| s.id == step_id)
  }
}
