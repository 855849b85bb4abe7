//! Free lottery draw step

use crate::automation::{guard_step, Sequencer};
use crate::browser::{BrowserSession, Locator};
use crate::core::{CheckinError, Result, StepOutcome};

pub const LOTTERY_NO_CONTROL: &str = "未找到抽奖按钮，可能没有抽奖次数";
pub const LOTTERY_TIMEOUT: &str = "抽奖超时，可能没有抽奖次数了";
pub const LOTTERY_ERROR_PREFIX: &str = "抽奖出现错误";

/// Map an error that escaped the draw attempt to its outcome
pub fn classify_lottery_error(err: &CheckinError) -> StepOutcome {
    if err.is_timeout() {
        StepOutcome::timed_out(LOTTERY_TIMEOUT)
    } else {
        StepOutcome::failed(format!("{}: {}", LOTTERY_ERROR_PREFIX, err))
    }
}

impl Sequencer {
    /// Draw once and report the prize; never fails
    pub async fn run_lottery(&self, session: &dyn BrowserSession) -> StepOutcome {
        tracing::info!(url = %self.site.lottery_url, "attempting lottery draw");

        let outcome = match guard_step(self.attempt_lottery(session), LOTTERY_ERROR_PREFIX).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "lottery draw aborted");
                classify_lottery_error(&e)
            }
        };

        tracing::info!(status = %outcome.status, detail = %outcome.detail, "lottery resolved");
        self.notifier
            .send_lottery_notification(outcome.success(), &outcome.detail)
            .await;
        outcome
    }

    async fn attempt_lottery(&self, session: &dyn BrowserSession) -> Result<StepOutcome> {
        session
            .navigate(&self.site.lottery_url, self.timings.navigation())
            .await?;
        tokio::time::sleep(self.timings.lottery_settle()).await;

        let draw = Locator::new(session, &self.site.draw_selector);
        if !draw.is_visible().await? {
            return Ok(StepOutcome::not_available(LOTTERY_NO_CONTROL));
        }

        draw.click().await?;
        tracing::debug!(selector = draw.selector(), "clicked draw control");

        session
            .wait_for_selector(&self.site.result_selector, self.timings.result())
            .await?;
        let prize = Locator::new(session, &self.site.result_selector)
            .text()
            .await?
            .trim()
            .to_string();

        Ok(StepOutcome::completed(prize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepStatus;

    #[test]
    fn test_classify_lottery_error() {
        let timed_out = classify_lottery_error(&CheckinError::timeout("wait .lottery-modal", 10_000));
        assert_eq!(timed_out.status, StepStatus::TimedOut);
        assert_eq!(timed_out.detail, LOTTERY_TIMEOUT);

        let failed = classify_lottery_error(&CheckinError::AgentBrowserNotFound);
        assert_eq!(failed.status, StepStatus::Failed);
        assert!(failed.detail.starts_with("抽奖出现错误: agent-browser not found"));
    }
}
