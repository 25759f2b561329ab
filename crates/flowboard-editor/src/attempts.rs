//! Load attempt accounting and retry policy.
//!
//! The attempt counter is an explicit value object rather than an ambient
//! mutable cell, so the retry policy can be unit-tested in isolation. It is
//! created fresh for every load chain (and thus for every sequence change)
//! and resets on a successful non-empty fetch.

use std::time::Duration;

/// Retry policy for layout loading.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  /// Maximum number of empty/failed attempts before giving up.
  pub max_attempts: u32,
  /// Delay between attempts.
  pub retry_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      retry_delay: Duration::from_millis(1500),
    }
  }
}

/// Per-load-chain attempt counter, bounded by a maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadAttempts {
  used: u32,
  max: u32,
}

impl LoadAttempts {
  pub fn new(max: u32) -> Self {
    Self { used: 0, max }
  }

  /// Attempts consumed so far.
  pub fn used(&self) -> u32 {
    self.used
  }

  /// Record an empty or failed outcome. The counter never exceeds the
  /// maximum.
  pub fn record_failure(&mut self) {
    self.used = (self.used + 1).min(self.max);
  }

  /// True once the maximum number of attempts has been consumed.
  pub fn exhausted(&self) -> bool {
    self.used >= self.max
  }

  /// Reset after a successful non-empty fetch.
  pub fn reset(&mut self) {
    self.used = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counter_is_bounded_by_the_maximum() {
    let mut attempts = LoadAttempts::new(3);

    for _ in 0..10 {
      attempts.record_failure();
    }

    assert_eq!(attempts.used(), 3);
    assert!(attempts.exhausted());
  }

  #[test]
  fn reset_clears_consumed_attempts() {
    let mut attempts = LoadAttempts::new(3);
    attempts.record_failure();
    attempts.record_failure();

    attempts.reset();

    assert_eq!(attempts.used(), 0);
    assert!(!attempts.exhausted());
  }

  #[test]
  fn default_policy_matches_the_loader_contract() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.retry_delay, Duration::from_millis(1500));
  }
}
