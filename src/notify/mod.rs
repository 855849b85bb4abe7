//! Notification module - result reporting
//!
//! Formats step and run results into readable messages and pushes them
//! through PushPlus.

pub mod pushplus;
pub mod templates;

pub use pushplus::PushPlusNotifier;
pub use templates::PushMessage;
