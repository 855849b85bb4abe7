//! Browser session capability
//!
//! The sequencer only talks to these traits, so the automation engine can be
//! swapped (or scripted in tests) without touching the step logic.

use async_trait::async_trait;
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use crate::core::Result;

/// Opens a browser session from a saved login state
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn open(&self, saved_state: &Path) -> Result<Box<dyn BrowserSession>>;
}

/// A live, single-page browser session
///
/// Every bounded wait must fail with `CheckinError::Timeout` when it expires.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate the page to `url`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait until the network has been idle
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()>;

    /// Wait until an element matching `selector` is visible
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Whether the first element matching `selector` is visible
    ///
    /// Later matches are reached with `Locator::nth`.
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Text content of the first element matching `selector`
    async fn text(&self, selector: &str) -> Result<String>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> Result<()>;

    /// Current page title
    async fn title(&self) -> Result<String>;

    /// Save a full-page screenshot
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Release the session
    async fn close(&self) -> Result<()>;
}

/// Handle on the elements matching one selector
///
/// Actions apply to the first match; `nth` narrows the handle to a later one.
#[derive(Clone)]
pub struct Locator<'a> {
    session: &'a dyn BrowserSession,
    selector: Cow<'a, str>,
}

impl<'a> Locator<'a> {
    pub fn new(session: &'a dyn BrowserSession, selector: impl Into<Cow<'a, str>>) -> Self {
        Self {
            session,
            selector: selector.into(),
        }
    }

    /// The match at `index` (zero-based) among the elements this handle matches
    pub fn nth(&self, index: usize) -> Locator<'a> {
        if index == 0 {
            return self.clone();
        }
        Locator::new(self.session, format!("{} >> nth={}", self.selector, index))
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub async fn count(&self) -> Result<usize> {
        self.session.count(&self.selector).await
    }

    pub async fn is_visible(&self) -> Result<bool> {
        self.session.is_visible(&self.selector).await
    }

    pub async fn text(&self) -> Result<String> {
        self.session.text(&self.selector).await
    }

    pub async fn click(&self) -> Result<()> {
        self.session.click(&self.selector).await
    }
}

impl std::fmt::Debug for Locator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("selector", &self.selector)
            .finish()
    }
}
