//! Common utilities and abstractions for services

/// Time source used for action timestamps
pub mod clock;
/// Reactive property system for fine-grained state updates
pub mod property;

pub use clock::{Clock, ManualClock, SystemClock};
pub use property::Property;
