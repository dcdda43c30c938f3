//! Structured-concurrency scope for view-model work.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Owns every task a view-model spawns.
///
/// Dropping the scope cancels them all: in-flight work is abandoned at its
/// next await point, partial results are discarded, and no state update
/// runs afterwards (updates are synchronous transforms, so cancellation
/// cannot interleave one).
pub struct TaskScope {
    tracker: TaskTracker,
    token: CancellationToken,
}

impl TaskScope {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
            token: CancellationToken::new(),
        }
    }

    /// Mint a token that dies with this scope. Used for sub-lifetimes such
    /// as cancel-prior-fetch.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Spawn work tied to the scope's lifetime.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_guarded(self.token.child_token(), fut);
    }

    /// Spawn work additionally guarded by `token` (a child of this scope):
    /// cancelling the token abandons the future early.
    pub fn spawn_guarded<F>(&self, token: CancellationToken, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(async move {
            let _ = token.run_until_cancelled(fut).await;
        });
    }

    /// Cancel everything and wait for the tasks to wind down.
    pub async fn shutdown(&self) {
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
