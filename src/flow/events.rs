//! One-shot event channel.
//!
//! Carries transient instructions (navigation, permission prompts) from a
//! view-model to its view. Unlike state, events are never replayed: each is
//! delivered exactly once, in send order, to the single receiver. Events
//! sent before the receiver starts draining are buffered, not lost.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

/// What `send` does when the queue is full. Every channel construction site
/// documents which policy it picked and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Suspend the sender until the receiver frees a slot.
    Block,
    /// Discard the oldest queued event to make room; never suspends.
    DropOldest,
}

struct Shared<E> {
    queue: Mutex<VecDeque<E>>,
    capacity: usize,
    policy: OverflowPolicy,
    /// Free slots; only consulted under the `Block` policy.
    slots: Semaphore,
    notify: Notify,
    senders: AtomicUsize,
}

/// Create a bounded single-consumer event channel.
pub fn channel<E>(capacity: usize, policy: OverflowPolicy) -> (EventSender<E>, EventReceiver<E>) {
    assert!(capacity > 0, "event channel capacity must be at least 1");
    let shared = Arc::new(Shared {
        queue: Mutex::new(VecDeque::with_capacity(capacity)),
        capacity,
        policy,
        slots: Semaphore::new(capacity),
        notify: Notify::new(),
        senders: AtomicUsize::new(1),
    });
    (
        EventSender {
            shared: Arc::clone(&shared),
        },
        EventReceiver { shared },
    )
}

pub struct EventSender<E> {
    shared: Arc<Shared<E>>,
}

impl<E> EventSender<E> {
    /// Enqueue an event. With [`OverflowPolicy::Block`] this suspends while
    /// the queue is full; with [`OverflowPolicy::DropOldest`] it discards
    /// the oldest queued event instead and returns immediately.
    pub async fn send(&self, event: E) {
        match self.shared.policy {
            OverflowPolicy::Block => {
                let permit = self
                    .shared
                    .slots
                    .acquire()
                    .await
                    .expect("event channel semaphore closed");
                permit.forget();
                self.shared.queue.lock().push_back(event);
                self.shared.notify.notify_one();
            }
            OverflowPolicy::DropOldest => {
                let _ = self.try_send(event);
            }
        }
    }

    /// Enqueue without suspending. With [`OverflowPolicy::Block`] this
    /// fails when the queue is full and hands the event back; with
    /// [`OverflowPolicy::DropOldest`] it always succeeds.
    pub fn try_send(&self, event: E) -> Result<(), E> {
        match self.shared.policy {
            OverflowPolicy::Block => match self.shared.slots.try_acquire() {
                Ok(permit) => {
                    permit.forget();
                    self.shared.queue.lock().push_back(event);
                }
                Err(_) => return Err(event),
            },
            OverflowPolicy::DropOldest => {
                let mut queue = self.shared.queue.lock();
                if queue.len() == self.shared.capacity {
                    queue.pop_front();
                }
                queue.push_back(event);
            }
        }
        self.shared.notify.notify_one();
        Ok(())
    }
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        self.shared.senders.fetch_add(1, Ordering::Relaxed);
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E> Drop for EventSender<E> {
    fn drop(&mut self) {
        if self.shared.senders.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Last sender gone; wake the receiver so it can observe closure.
            self.shared.notify.notify_one();
        }
    }
}

/// The single consumer. Not `Clone`: exactly-once delivery across all
/// consumers collectively is enforced by ownership.
pub struct EventReceiver<E> {
    shared: Arc<Shared<E>>,
}

impl<E> EventReceiver<E> {
    /// Next event in send order. Returns `None` once every sender is gone
    /// and the queue is drained.
    pub async fn recv(&mut self) -> Option<E> {
        // Hold a separate handle to the shared state so the `Notified` future
        // borrows it rather than `*self`, leaving `pop` free to borrow `self`
        // mutably.
        let shared = Arc::clone(&self.shared);
        loop {
            // Subscribe before checking the queue so a send landing between
            // the check and the await cannot be missed.
            let notified = shared.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(event) = self.pop() {
                return Some(event);
            }
            if shared.senders.load(Ordering::Acquire) == 0 {
                // A sender may have pushed right before dropping.
                return self.pop();
            }
            notified.await;
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<E> {
        self.pop()
    }

    fn pop(&mut self) -> Option<E> {
        let event = self.shared.queue.lock().pop_front();
        if event.is_some() && self.shared.policy == OverflowPolicy::Block {
            self.shared.slots.add_permits(1);
        }
        event
    }
}
