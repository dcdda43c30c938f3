//! Observable state container.

use tokio::sync::watch;

/// Single-writer observable snapshot of what a screen currently shows.
///
/// [`update`](Self::update) applies a transform to the live snapshot under
/// the channel's internal lock: concurrent updates serialize, and the final
/// state is the left-fold of every transform applied. A transform never
/// operates on a stale captured read, so interleavings cannot lose updates.
pub struct StateContainer<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone + Send + Sync + 'static> StateContainer<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current snapshot.
    pub fn read(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Apply `transform` to the live snapshot atomically and notify every
    /// subscriber with the result.
    pub fn update(&self, transform: impl FnOnce(&mut S)) {
        self.tx.send_modify(transform);
    }

    /// Subscribe. The watcher yields the latest snapshot immediately, then
    /// every subsequent one. A slow consumer may skip intermediate
    /// snapshots but never misses the latest.
    pub fn watch(&self) -> StateWatcher<S> {
        StateWatcher {
            rx: self.tx.subscribe(),
            replayed: false,
        }
    }
}

/// Subscription handle produced by [`StateContainer::watch`].
pub struct StateWatcher<S> {
    rx: watch::Receiver<S>,
    replayed: bool,
}

impl<S: Clone> StateWatcher<S> {
    /// Next snapshot. The first call returns the current snapshot without
    /// waiting; later calls wait for a change. Returns `None` once the
    /// container is gone.
    pub async fn next(&mut self) -> Option<S> {
        if !self.replayed {
            self.replayed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Wait until a snapshot satisfies `pred` (checking the current one
    /// first) and return it. Returns `None` once the container is gone.
    pub async fn wait_for(&mut self, pred: impl FnMut(&S) -> bool) -> Option<S> {
        self.replayed = true;
        match self.rx.wait_for(pred).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        }
    }
}
