//! Sequence → graph adaptation.
//!
//! [`to_graph`] maps a sequence and an optional layout into the node/edge
//! lists consumed by the rendering collaborator. The mapping is pure and
//! idempotent: identical inputs yield structurally identical output, so a
//! re-render never causes spurious graph churn.

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutMap, Position};
use crate::sequence::{Sequence, StepKind};

/// Fallback placement used when the layout map has no entry for a step:
/// a vertical stack at a fixed x, matching the synthesized default.
const FALLBACK_X: f64 = 250.0;
const FALLBACK_Y_START: f64 = 100.0;
const FALLBACK_Y_SPACING: f64 = 150.0;

/// A renderable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
  pub id: String,
  pub label: String,
  pub kind: StepKind,
  pub position: Position,
}

/// A renderable edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
  pub id: String,
  pub source: String,
  pub target: String,
}

/// Node and edge lists for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
  pub nodes: Vec<GraphNode>,
  pub edges: Vec<GraphEdge>,
}

/// Adapt a sequence into renderable nodes and edges.
///
/// Node positions come from `layout` when it has an entry for the step id,
/// otherwise from the deterministic fallback stack. Edges are produced for
/// every explicit link whose target exists in the sequence.
pub fn to_graph(sequence: &Sequence, layout: Option<&LayoutMap>) -> FlowGraph {
  let nodes = sequence
    .steps
    .iter()
    .enumerate()
    .map(|(index, step)| {
      let position = layout
        .and_then(|l| l.get(&step.id))
        .copied()
        .unwrap_or_else(|| {
          Position::new(
            FALLBACK_X,
            FALLBACK_Y_START + FALLBACK_Y_SPACING * index as f64,
          )
        });

      GraphNode {
        id: step.id.clone(),
        label: step.label.clone(),
        kind: step.kind,
        position,
      }
    })
    .collect();

  let edges = sequence
    .steps
    .iter()
    .flat_map(|step| {
      step.next.iter().filter_map(|target| {
        sequence.get_step(target).map(|_| GraphEdge {
          id: format!("{}-{}", step.id, target),
          source: step.id.clone(),
          target: target.clone(),
        })
      })
    })
    .collect();

  FlowGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sequence::{SequenceMeta, Step};

  fn sequence(ids: &[&str]) -> Sequence {
    Sequence {
      metadata: SequenceMeta {
        id: "seq".to_string(),
        name: "Sequence".to_string(),
      },
      steps: ids.iter().map(|id| Step::new(*id, *id)).collect(),
    }
  }

  #[test]
  fn uses_layout_positions_when_present() {
    let seq = sequence(&["a", "b"]);
    let mut layout = LayoutMap::new();
    layout.insert("a".to_string(), Position::new(10.0, 20.0));

    let graph = to_graph(&seq, Some(&layout));

    assert_eq!(graph.nodes[0].position, Position::new(10.0, 20.0));
    // "b" missing from the layout falls back to the stack placement
    assert_eq!(graph.nodes[1].position, Position::new(250.0, 250.0));
  }

  #[test]
  fn fallback_stack_without_layout() {
    let graph = to_graph(&sequence(&["a", "b", "c"]), None);

    let ys: Vec<f64> = graph.nodes.iter().map(|n| n.position.y).collect();
    assert_eq!(ys, vec![100.0, 250.0, 400.0]);
    assert!(graph.nodes.iter().all(|n| n.position.x == 250.0));
  }

  #[test]
  fn edges_skip_unknown_targets() {
    let mut seq = sequence(&["a", "b"]);
    seq.steps[0].next = vec!["b".to_string(), "ghost".to_string()];

    let graph = to_graph(&seq, None);

    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].id, "a-b");
  }

  #[test]
  fn adapter_is_idempotent() {
    let mut seq = sequence(&["a", "b", "c"]);
    seq.steps[0].next = vec!["b".to_string()];
    seq.steps[1].next = vec!["c".to_string()];

    let first = to_graph(&seq, None);
    let second = to_graph(&seq, None);

    assert_eq!(first, second);
  }
}
