//! Daily Check-in - automated check-in and lottery draw
//!
//! Restores a saved login session in a headless browser, performs the daily
//! check-in, tries the free lottery draw, and reports both outcomes through
//! PushPlus.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Browser**: Browser session capability with an agent-browser implementation
//! - **Notify**: PushPlus dispatcher and message formatting
//! - **Automation**: The run sequencer (check-in, lottery, finalization)
//!
//! # Usage
//!
//! ```rust,no_run
//! use daily_checkin::browser::AgentBrowserLauncher;
//! use daily_checkin::{Config, PushPlusNotifier, Sequencer};
//!
//! #[tokio::main]
//! async fn main() -> daily_checkin::Result<()> {
//!     let config = Config::load(None);
//!     let notifier = PushPlusNotifier::new(config.pushplus.clone())?;
//!     let sequencer = Sequencer::new(&config, notifier);
//!
//!     let launcher = AgentBrowserLauncher::new(config.browser.clone());
//!     let summary = sequencer.run(&launcher, &config.browser.auth_state).await?;
//!     println!("{:?}", summary);
//!     Ok(())
//! }
//! ```

pub mod automation;
pub mod browser;
pub mod core;
pub mod notify;

// Re-export commonly used items
pub use automation::Sequencer;
pub use crate::core::{CheckinError, Config, Result, RunSummary, StepOutcome, StepStatus};
pub use notify::PushPlusNotifier;
