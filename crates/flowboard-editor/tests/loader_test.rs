//! Tests for the bounded-retry layout loader.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use flowboard_editor::{LayoutLoader, LoadOutcome, RetryPolicy};
use flowboard_model::{LayoutMap, Position};
use flowboard_store::{LayoutStore, StoreError};
use tokio_util::sync::CancellationToken;

/// One scripted fetch response.
enum Fetch {
  Empty,
  Fail(&'static str),
  Layout(LayoutMap),
}

/// Store whose fetch responses follow a script; exhausted scripts return
/// empty maps. Save/regenerate are unused here.
#[derive(Default)]
struct ScriptedStore {
  script: Mutex<VecDeque<Fetch>>,
  fetch_count: AtomicU32,
}

impl ScriptedStore {
  fn with_script(script: Vec<Fetch>) -> Arc<Self> {
    Arc::new(Self {
      script: Mutex::new(script.into()),
      fetch_count: AtomicU32::new(0),
    })
  }

  fn fetch_count(&self) -> u32 {
    self.fetch_count.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl LayoutStore for ScriptedStore {
  async fn fetch_layout(&self, _sequence_id: &str) -> Result<LayoutMap, StoreError> {
    self.fetch_count.fetch_add(1, Ordering::SeqCst);
    match self.script.lock().unwrap().pop_front() {
      Some(Fetch::Layout(map)) => Ok(map),
      Some(Fetch::Fail(message)) => Err(StoreError::Transport(message.to_string())),
      Some(Fetch::Empty) | None => Ok(LayoutMap::new()),
    }
  }

  async fn save_layout(&self, _sequence_id: &str, _layout: &LayoutMap) -> Result<(), StoreError> {
    unimplemented!("not used by loader tests")
  }

  async fn regenerate_layout(&self, _sequence_id: &str) -> Result<LayoutMap, StoreError> {
    unimplemented!("not used by loader tests")
  }
}

fn layout(entries: &[(&str, f64, f64)]) -> LayoutMap {
  entries
    .iter()
    .map(|(id, x, y)| (id.to_string(), Position::new(*x, *y)))
    .collect()
}

#[tokio::test]
async fn first_attempt_success_settles_immediately() {
  let map = layout(&[("s1", 10.0, 20.0)]);
  let store = ScriptedStore::with_script(vec![Fetch::Layout(map.clone())]);
  let loader = LayoutLoader::new(store.clone(), RetryPolicy::default());

  let outcome = loader.load("seq", &CancellationToken::new()).await;

  assert_eq!(outcome, LoadOutcome::Loaded(map));
  assert_eq!(store.fetch_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn success_on_the_third_attempt() {
  let map = layout(&[("s1", 1.0, 2.0)]);
  let store = ScriptedStore::with_script(vec![
    Fetch::Empty,
    Fetch::Fail("connection reset"),
    Fetch::Layout(map.clone()),
  ]);
  let loader = LayoutLoader::new(store.clone(), RetryPolicy::default());
  let start = tokio::time::Instant::now();

  let outcome = loader.load("seq", &CancellationToken::new()).await;

  assert_eq!(outcome, LoadOutcome::Loaded(map));
  assert_eq!(store.fetch_count(), 3);
  // Two backoff sleeps at 1.5s each
  assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_three_failed_attempts() {
  let store = ScriptedStore::with_script(vec![
    Fetch::Fail("timeout"),
    Fetch::Empty,
    Fetch::Fail("timeout"),
  ]);
  let loader = LayoutLoader::new(store.clone(), RetryPolicy::default());
  let start = tokio::time::Instant::now();

  let outcome = loader.load("seq", &CancellationToken::new()).await;

  assert_eq!(outcome, LoadOutcome::GaveUp);
  assert_eq!(store.fetch_count(), 3);
  // No sleep after the final attempt
  assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn transport_errors_and_empty_results_retry_identically() {
  let store = ScriptedStore::with_script(vec![Fetch::Empty, Fetch::Empty, Fetch::Empty]);
  let errors = ScriptedStore::with_script(vec![
    Fetch::Fail("a"),
    Fetch::Fail("b"),
    Fetch::Fail("c"),
  ]);
  let policy = RetryPolicy::default();

  let empty_outcome = LayoutLoader::new(store.clone(), policy)
    .load("seq", &CancellationToken::new())
    .await;
  let error_outcome = LayoutLoader::new(errors.clone(), policy)
    .load("seq", &CancellationToken::new())
    .await;

  assert_eq!(empty_outcome, LoadOutcome::GaveUp);
  assert_eq!(error_outcome, LoadOutcome::GaveUp);
  assert_eq!(store.fetch_count(), errors.fetch_count());
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_backoff() {
  let store = ScriptedStore::with_script(vec![]);
  let loader = Arc::new(LayoutLoader::new(store.clone(), RetryPolicy::default()));
  let cancel = CancellationToken::new();

  let handle = {
    let loader = loader.clone();
    let cancel = cancel.clone();
    tokio::spawn(async move { loader.load("seq", &cancel).await })
  };

  // Let the first (empty) fetch happen and the backoff start
  tokio::task::yield_now().await;
  assert_eq!(store.fetch_count(), 1);

  cancel.cancel();
  let outcome = handle.await.unwrap();

  assert_eq!(outcome, LoadOutcome::Cancelled);
  assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn pre_cancelled_token_never_fetches() {
  let store = ScriptedStore::with_script(vec![]);
  let loader = LayoutLoader::new(store.clone(), RetryPolicy::default());
  let cancel = CancellationToken::new();
  cancel.cancel();

  let outcome = loader.load("seq", &cancel).await;

  assert_eq!(outcome, LoadOutcome::Cancelled);
  assert_eq!(store.fetch_count(), 0);
}
