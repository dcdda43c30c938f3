//! Reactive primitives underneath the view-models.
//!
//! ```text
//! intent ──→ view-model ──→ use-cases
//!                │
//!                ├──→ StateContainer ──(replayed)──→ view
//!                └──→ event channel ──(one-shot)──→ view
//! ```
//!
//! - [`StateContainer`]: observable, single-writer snapshot of what a
//!   screen currently shows; updates are atomic transforms.
//! - [`events`]: bounded single-consumer queue for transient instructions
//!   that must never be replayed.
//! - [`Zip`]: paired combine of two fallible streams.
//! - [`TaskScope`]: structured-concurrency scope tied to a screen's
//!   lifetime.

pub mod events;
mod scope;
mod state;
mod zip;

pub use events::{EventReceiver, EventSender, OverflowPolicy};
pub use scope::TaskScope;
pub use state::{StateContainer, StateWatcher};
pub use zip::Zip;
