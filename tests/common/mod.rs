//! Scripted browser session for driving the sequencer without a browser

#![allow(dead_code)]

use async_trait::async_trait;
use daily_checkin::browser::{BrowserLauncher, BrowserSession};
use daily_checkin::core::config::{SiteConfig, TimingConfig};
use daily_checkin::{CheckinError, Config, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake site behaves
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    /// Check-in selectors that match, with the visibility of each match
    pub checkin_controls: Vec<(String, Vec<bool>)>,
    pub draw_visible: bool,
    /// Result text shown after a draw; `None` means the result never appears
    pub prize: Option<String>,
    /// Navigation to a URL containing this fragment fails
    pub fail_navigation_to: Option<String>,
    pub network_idle_times_out: bool,
    pub panic_on_checkin_click: bool,
}

impl PageScript {
    /// Both actions available, draw yields `prize`
    pub fn fresh_day(prize: &str) -> Self {
        Self {
            checkin_controls: vec![(r#"button:has-text("立即签到")"#.to_string(), vec![true])],
            draw_visible: true,
            prize: Some(prize.to_string()),
            ..Default::default()
        }
    }

    /// Both actions already used up
    pub fn already_done() -> Self {
        Self::default()
    }
}

/// Everything the session saw, shared with the test
#[derive(Debug, Default)]
pub struct SessionLog {
    pub calls: Mutex<Vec<String>>,
    pub closed: AtomicBool,
    pub opened: AtomicUsize,
}

impl SessionLog {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct ScriptedSession {
    script: PageScript,
    site: SiteConfig,
    log: Arc<SessionLog>,
    draw_clicked: AtomicBool,
}

/// Split `sel >> nth=i` into its base selector and match index
fn split_nth(selector: &str) -> (&str, usize) {
    match selector.split_once(" >> nth=") {
        Some((base, index)) => (base, index.parse().unwrap()),
        None => (selector, 0),
    }
}

impl ScriptedSession {
    /// Visibility of every element the base selector matches
    fn matches(&self, selector: &str) -> Vec<bool> {
        if selector == self.site.draw_selector {
            return vec![self.draw_visible()];
        }
        self.script
            .checkin_controls
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, visible)| visible.clone())
            .unwrap_or_default()
    }

    fn control(&self, selector: &str) -> Option<bool> {
        let (base, index) = split_nth(selector);
        self.matches(base).get(index).copied()
    }

    fn draw_visible(&self) -> bool {
        self.script.draw_visible
    }

    fn result_shown(&self) -> bool {
        self.draw_clicked.load(Ordering::SeqCst) && self.script.prize.is_some()
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.log.record(format!("navigate {}", url));
        match &self.script.fail_navigation_to {
            Some(fragment) if url.contains(fragment.as_str()) => {
                Err(CheckinError::browser("net::ERR_CONNECTION_RESET"))
            }
            _ => Ok(()),
        }
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()> {
        if self.script.network_idle_times_out {
            return Err(CheckinError::timeout(
                "wait --load networkidle",
                timeout.as_millis() as u64,
            ));
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.log.record(format!("wait {}", selector));
        let present = if selector == self.site.result_selector {
            self.result_shown()
        } else if selector == self.site.readiness_selector {
            !self.script.checkin_controls.is_empty()
        } else {
            self.matches(selector).contains(&true)
        };

        if present {
            Ok(())
        } else {
            Err(CheckinError::timeout(selector, timeout.as_millis() as u64))
        }
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.matches(split_nth(selector).0).len())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.control(selector).unwrap_or(false))
    }

    async fn text(&self, selector: &str) -> Result<String> {
        if selector == self.site.result_selector && self.result_shown() {
            return Ok(format!("\n  {}  \n", self.script.prize.clone().unwrap_or_default()));
        }
        match self.control(selector) {
            Some(_) => Ok("签到".to_string()),
            None => Err(CheckinError::browser(format!("no element for {}", selector))),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.log.record(format!("click {}", selector));
        if selector == self.site.draw_selector {
            self.draw_clicked.store(true, Ordering::SeqCst);
        } else if self.script.panic_on_checkin_click {
            panic!("click handler crashed");
        }
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok("掘金 - 签到".to_string())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.log.record(format!("screenshot {}", path.display()));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.log.record("close".to_string());
        self.log.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out scripted sessions and keeps their log
pub struct ScriptedLauncher {
    pub script: PageScript,
    pub site: SiteConfig,
    pub log: Arc<SessionLog>,
    pub fail_open: bool,
}

impl ScriptedLauncher {
    pub fn new(script: PageScript) -> Self {
        Self {
            script,
            site: SiteConfig::default(),
            log: Arc::new(SessionLog::default()),
            fail_open: false,
        }
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedLauncher {
    async fn open(&self, _saved_state: &Path) -> Result<Box<dyn BrowserSession>> {
        if self.fail_open {
            return Err(CheckinError::AgentBrowserNotFound);
        }
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        self.log.closed.store(false, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            site: self.site.clone(),
            log: Arc::clone(&self.log),
            draw_clicked: AtomicBool::new(false),
        }))
    }
}

/// Default config with instant timings; PushPlus pointed at `endpoint` when given
pub fn test_config(endpoint: Option<String>) -> Config {
    let mut config = Config::default();
    config.timings = TimingConfig::instant();
    if let Some(endpoint) = endpoint {
        config.pushplus.enabled = true;
        config.pushplus.token = Some("test-token".to_string());
        config.pushplus.endpoint = endpoint;
        config.pushplus.timeout_secs = 5;
    }
    config
}
