//! Fallback control lookup
//!
//! Candidate selectors are tried in priority order; the first one with a
//! visible match wins. This absorbs small UI changes on the remote site.

use crate::browser::{BrowserSession, Locator};
use crate::core::Result;

/// What a single candidate selector resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlReport {
    pub selector: String,
    pub count: usize,
    /// Index of the first visible match
    pub visible_at: Option<usize>,
}

impl ControlReport {
    pub fn is_actionable(&self) -> bool {
        self.count > 0 && self.visible_at.is_some()
    }
}

/// Resolve one candidate: how many matches, and which is the first visible one
pub async fn inspect(locator: &Locator<'_>) -> Result<ControlReport> {
    let count = locator.count().await?;

    let mut visible_at = None;
    for index in 0..count {
        if locator.nth(index).is_visible().await? {
            visible_at = Some(index);
            break;
        }
    }

    if count > 0 {
        // Text is diagnostic only
        let text = locator.text().await.unwrap_or_default();
        tracing::debug!(selector = locator.selector(), count, ?visible_at, text = %text.trim(), "inspected control");
    } else {
        tracing::debug!(selector = locator.selector(), count, "inspected control");
    }

    Ok(ControlReport {
        selector: locator.selector().to_string(),
        count,
        visible_at,
    })
}

/// Visible match of the first candidate that has one, or `None` when nothing is actionable
pub async fn first_actionable<'a>(
    session: &'a dyn BrowserSession,
    candidates: &'a [String],
) -> Result<Option<Locator<'a>>> {
    for selector in candidates {
        let locator = Locator::new(session, selector);
        let report = inspect(&locator).await?;
        if let Some(index) = report.visible_at {
            return Ok(Some(locator.nth(index)));
        }
    }
    Ok(None)
}
