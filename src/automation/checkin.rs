//! Daily check-in step

use crate::automation::{controls, guard_step, Sequencer};
use crate::browser::BrowserSession;
use crate::core::{CheckinError, Result, StepOutcome};

pub const SIGN_IN_DONE: &str = "签到成功";
pub const SIGN_IN_NO_CONTROL: &str = "未找到签到按钮，可能已经签到过了";
pub const SIGN_IN_TIMEOUT: &str = "签到超时，可能已经签到过了";
pub const SIGN_IN_ERROR_PREFIX: &str = "签到出现错误";

/// Map an error that escaped the check-in attempt to its outcome
pub fn classify_check_in_error(err: &CheckinError) -> StepOutcome {
    if err.is_timeout() {
        StepOutcome::timed_out(SIGN_IN_TIMEOUT)
    } else {
        StepOutcome::failed(format!("{}: {}", SIGN_IN_ERROR_PREFIX, err))
    }
}

impl Sequencer {
    /// Perform the check-in and report it; never fails
    pub async fn run_check_in(&self, session: &dyn BrowserSession) -> StepOutcome {
        tracing::info!(url = %self.site.signin_url, "attempting check-in");

        let outcome = match guard_step(self.attempt_check_in(session), SIGN_IN_ERROR_PREFIX).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "check-in aborted");
                classify_check_in_error(&e)
            }
        };

        tracing::info!(status = %outcome.status, detail = %outcome.detail, "check-in resolved");
        self.notifier
            .send_sign_in_notification(outcome.success(), &outcome.detail)
            .await;
        outcome
    }

    async fn attempt_check_in(&self, session: &dyn BrowserSession) -> Result<StepOutcome> {
        session
            .navigate(&self.site.signin_url, self.timings.navigation())
            .await?;
        tokio::time::sleep(self.timings.signin_settle()).await;
        session
            .wait_for_network_idle(self.timings.network_idle())
            .await?;

        // Advisory: a checked-in page may never show the signal
        match session
            .wait_for_selector(&self.site.readiness_selector, self.timings.readiness())
            .await
        {
            Ok(()) => tracing::debug!(selector = %self.site.readiness_selector, "readiness signal found"),
            Err(e) if e.is_timeout() => {
                tracing::info!(error = %e, "readiness signal missing, check-in may already be done")
            }
            Err(e) => return Err(e),
        }

        self.log_page_diagnostics(session).await;

        match controls::first_actionable(session, &self.site.signin_selectors).await? {
            Some(control) => {
                control.click().await?;
                tracing::info!(selector = control.selector(), "clicked check-in control");
                Ok(StepOutcome::completed(SIGN_IN_DONE))
            }
            None => Ok(StepOutcome::already_done(SIGN_IN_NO_CONTROL)),
        }
    }

    async fn log_page_diagnostics(&self, session: &dyn BrowserSession) {
        match session.title().await {
            Ok(title) => tracing::debug!(%title, "check-in page loaded"),
            Err(e) => tracing::debug!(error = %e, "could not read page title"),
        }

        if let Some(path) = &self.debug_screenshot {
            if let Err(e) = session.screenshot(path).await {
                tracing::warn!(path = %path.display(), error = %e, "debug screenshot failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_and_error_details_differ() {
        let timed_out = classify_check_in_error(&CheckinError::timeout("wait --load networkidle", 50));
        let failed = classify_check_in_error(&CheckinError::browser("page crashed"));

        assert_eq!(timed_out.detail, SIGN_IN_TIMEOUT);
        assert_eq!(failed.detail, "签到出现错误: Browser error: page crashed");
        assert_ne!(timed_out.status, failed.status);
        assert!(!timed_out.success() && !failed.success());
    }
}
