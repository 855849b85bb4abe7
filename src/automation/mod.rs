//! Automation module - the daily run sequencer
//!
//! Opens one browser session, performs the check-in and then the lottery
//! draw on it, and always closes the session and sends the daily summary.
//!
//! Both steps are best-effort: each resolves to a `StepOutcome` on its own and
//! a failure in one never stops the other. A step that finds nothing to do is
//! reported as a soft failure ("probably already done"), not as an error.

pub mod checkin;
pub mod controls;
pub mod lottery;

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::browser::BrowserLauncher;
use crate::core::config::{Config, SiteConfig, TimingConfig};
use crate::core::{Result, RunSummary, StepOutcome};
use crate::notify::PushPlusNotifier;

pub use checkin::classify_check_in_error;
pub use lottery::classify_lottery_error;

/// Drives one run against the target site
pub struct Sequencer {
    site: SiteConfig,
    timings: TimingConfig,
    debug_screenshot: Option<PathBuf>,
    notifier: PushPlusNotifier,
}

impl Sequencer {
    pub fn new(config: &Config, notifier: PushPlusNotifier) -> Self {
        Self {
            site: config.site.clone(),
            timings: config.timings.clone(),
            debug_screenshot: config.browser.debug_screenshot.clone(),
            notifier,
        }
    }

    /// Execute the full run
    ///
    /// Only a failure to open the session is returned as an error. Once the
    /// session exists, the run always yields a complete summary, the session is
    /// closed, and the daily summary is sent, whatever the steps did.
    pub async fn run(&self, launcher: &dyn BrowserLauncher, saved_state: &Path) -> Result<RunSummary> {
        let started = Instant::now();
        let session = launcher.open(saved_state).await?;

        let sign_in = self.run_check_in(session.as_ref()).await;
        let lottery = self.run_lottery(session.as_ref()).await;

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close browser session");
        }
        drop(session);

        let summary = RunSummary::new(sign_in, lottery, rounded_secs(started.elapsed()));
        tracing::info!(
            sign_in = summary.sign_in.success,
            lottery = summary.lottery.success,
            duration = %summary.duration,
            "run finished"
        );

        self.notifier.send_daily_summary(&summary).await;
        Ok(summary)
    }
}

/// Run a step attempt, turning a panic inside it into a failed outcome
pub(crate) async fn guard_step<F>(attempt: F, error_prefix: &str) -> Result<StepOutcome>
where
    F: Future<Output = Result<StepOutcome>>,
{
    match AssertUnwindSafe(attempt).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(%message, "step panicked");
            Ok(StepOutcome::failed(format!("{}: {}", error_prefix, message)))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Elapsed time rounded to the nearest whole second
fn rounded_secs(elapsed: Duration) -> u64 {
    let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    millis.saturating_add(500) / 1000
}
