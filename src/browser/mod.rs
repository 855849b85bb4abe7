//! Browser automation module
//!
//! The session capability consumed by the sequencer, plus its
//! agent-browser CLI implementation.

mod executor;
mod session;

pub use executor::{AgentBrowserLauncher, BrowserExecutor};
pub use session::{BrowserLauncher, BrowserSession, Locator};
