use std::time::Duration;

use tokio::{task::JoinHandle, time};

/// A scheduled door transition.
///
/// Wraps the spawned task so the controller can cancel it when a new open
/// cycle supersedes the pending one.
#[derive(Debug)]
pub struct TransitionTimer {
  handle: JoinHandle<()>,
}

impl TransitionTimer {
  /// Run `transition` after `delay`.
  pub fn spawn<F>(delay: Duration, transition: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = tokio::spawn(async move {
      time::sleep(delay).await;
      transition();
    });
    TransitionTimer { handle }
  }

  /// Cancel the scheduled transition.
  ///
  /// Idempotent: cancelling an already-fired or already-cancelled timer is
  /// a no-op.
  pub fn cancel(&self) {
    self.handle.abort();
  }
}

impl Drop for TransitionTimer {
  fn drop(&mut self) {
    self.handle.abort();
  }
}
