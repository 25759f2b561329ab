//! Auto-connection of sequential steps.
//!
//! Sequences authored step-by-step often lack explicit links between steps.
//! [`connect_steps`] infers the default linear chain: any step without a
//! forward connection is linked to its immediate successor in list order.
//! Explicit links are never touched and list order is preserved, so applying
//! the function twice is a no-op.

use crate::sequence::Step;

/// Return a copy of `steps` where every step lacking a forward connection
/// (except the last) is linked to its immediate successor.
///
/// The input is not mutated. Callers compare the result against the input
/// (`PartialEq`) to decide whether anything changed.
pub fn connect_steps(steps: &[Step]) -> Vec<Step> {
  let mut connected = steps.to_vec();

  for i in 0..connected.len().saturating_sub(1) {
    if connected[i].next.is_empty() {
      let successor = connected[i + 1].id.clone();
      connected[i].next.push(successor);
    }
  }

  connected
}

#[cfg(test)]
mod tests {
  use super::*;

  fn steps(ids: &[&str]) -> Vec<Step> {
    ids.iter().map(|id| Step::new(*id, *id)).collect()
  }

  #[test]
  fn links_each_step_to_its_successor() {
    let input = steps(&["a", "b", "c"]);
    let connected = connect_steps(&input);

    assert_eq!(connected[0].next, vec!["b".to_string()]);
    assert_eq!(connected[1].next, vec!["c".to_string()]);
    assert!(connected[2].next.is_empty());
    // Input untouched
    assert!(input[0].next.is_empty());
  }

  #[test]
  fn preserves_explicit_links() {
    let mut input = steps(&["a", "b", "c"]);
    input[0].next = vec!["c".to_string()];

    let connected = connect_steps(&input);

    assert_eq!(connected[0].next, vec!["c".to_string()]);
    assert_eq!(connected[1].next, vec!["c".to_string()]);
  }

  #[test]
  fn second_application_is_a_no_op() {
    let input = steps(&["a", "b", "c"]);
    let once = connect_steps(&input);
    let twice = connect_steps(&once);

    assert_eq!(once, twice);
  }

  #[test]
  fn single_step_unchanged() {
    let input = steps(&["only"]);
    assert_eq!(connect_steps(&input), input);
  }

  #[test]
  fn empty_list_unchanged() {
    assert!(connect_steps(&[]).is_empty());
  }
}
