//! Seven-day forecast screen.

mod event;
mod state;
mod viewmodel;

pub use event::SevenDaysEvent;
pub use state::SevenDaysViewState;
pub use viewmodel::SevenDaysViewModel;
