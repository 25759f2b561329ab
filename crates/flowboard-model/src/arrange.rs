//! Depth-ranked layout arrangement.
//!
//! [`arrange`] computes a fresh layout for a step list: steps are ranked by
//! breadth-first depth from the entry steps (those with no incoming links),
//! one row per depth, columns within a row. This backs the store's
//! `regenerate_layout` operation.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::layout::{LayoutMap, Position};
use crate::sequence::Step;

const ORIGIN_X: f64 = 250.0;
const ORIGIN_Y: f64 = 100.0;
const ROW_SPACING: f64 = 150.0;
const COLUMN_SPACING: f64 = 300.0;

/// Compute a depth-ranked arrangement for `steps`.
///
/// Deterministic: depth assignment follows list order at each level, so the
/// same step list always produces the same layout.
pub fn arrange(steps: &[Step]) -> LayoutMap {
  let known: HashSet<&str> = steps.iter().map(|s| s.id.as_str()).collect();

  // Steps that no other step links to are entry points.
  let mut has_incoming: HashSet<&str> = HashSet::new();
  for step in steps {
    for target in &step.next {
      if known.contains(target.as_str()) {
        has_incoming.insert(target.as_str());
      }
    }
  }

  let mut depths: HashMap<&str, usize> = HashMap::new();
  let mut queue: VecDeque<&str> = steps
    .iter()
    .map(|s| s.id.as_str())
    .filter(|id| !has_incoming.contains(id))
    .collect();
  for id in &queue {
    depths.insert(*id, 0);
  }

  while let Some(id) = queue.pop_front() {
    let depth = depths[id];
    let Some(step) = steps.iter().find(|s| s.id == id) else {
      continue;
    };
    for target in &step.next {
      if !known.contains(target.as_str()) {
        continue;
      }
      // First visit wins; breadth-first order keeps ranks minimal.
      if !depths.contains_key(target.as_str()) {
        depths.insert(target.as_str(), depth + 1);
        queue.push_back(target.as_str());
      }
    }
  }

  // Steps unreachable from any entry (cycles) keep their list position.
  for (index, step) in steps.iter().enumerate() {
    depths.entry(step.id.as_str()).or_insert(index);
  }

  let mut columns: HashMap<usize, usize> = HashMap::new();
  let mut layout = LayoutMap::new();
  for step in steps {
    let depth = depths[step.id.as_str()];
    let column = columns.entry(depth).or_insert(0);
    layout.insert(
      step.id.clone(),
      Position::new(
        ORIGIN_X + COLUMN_SPACING * *column as f64,
        ORIGIN_Y + ROW_SPACING * depth as f64,
      ),
    );
    *column += 1;
  }

  layout
}

#[cfg(test)]
mod tests {
  use super::*;

  fn step(id: &str, next: &[&str]) -> Step {
    let mut s = Step::new(id, id);
    s.next = next.iter().map(|n| n.to_string()).collect();
    s
  }

  #[test]
  fn linear_chain_stacks_vertically() {
    let steps = vec![step("a", &["b"]), step("b", &["c"]), step("c", &[])];
    let layout = arrange(&steps);

    assert_eq!(layout["a"], Position::new(250.0, 100.0));
    assert_eq!(layout["b"], Position::new(250.0, 250.0));
    assert_eq!(layout["c"], Position::new(250.0, 400.0));
  }

  #[test]
  fn branches_share_a_row() {
    let steps = vec![
      step("root", &["left", "right"]),
      step("left", &[]),
      step("right", &[]),
    ];
    let layout = arrange(&steps);

    assert_eq!(layout["left"].y, layout["right"].y);
    assert_ne!(layout["left"].x, layout["right"].x);
  }

  #[test]
  fn deterministic_for_equal_input() {
    let steps = vec![step("a", &["b"]), step("b", &[])];
    assert_eq!(arrange(&steps), arrange(&steps));
  }
}
