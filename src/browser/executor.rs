//! Browser executor - wraps agent-browser CLI
//!
//! Provides the `BrowserSession` capability on top of agent-browser commands.
//! Each command is bounded by a timeout; an expired bound surfaces as
//! `CheckinError::Timeout` so callers can treat it as a soft signal.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::browser::session::{BrowserLauncher, BrowserSession};
use crate::core::config::BrowserConfig;
use crate::core::{CheckinError, Result};

/// Bound for commands that do not carry their own timeout
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Executor for browser automation via agent-browser CLI
pub struct BrowserExecutor {
    /// agent-browser executable
    binary: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Storage state loaded when the browser starts
    state: Option<PathBuf>,
}

impl BrowserExecutor {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            binary: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
            state: None,
        }
    }

    /// Create an executor from browser configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            session_name: config.session_name.clone(),
            headed: config.headed,
            state: None,
        }
    }

    /// Load this storage state (cookies, local storage) on launch
    pub fn with_state(mut self, path: impl Into<PathBuf>) -> Self {
        self.state = Some(path.into());
        self
    }

    /// Check if agent-browser is installed
    pub async fn is_available(binary: &str) -> bool {
        Command::new(binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn build_command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        if let Some(state) = &self.state {
            cmd.arg("--state").arg(state);
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Run an agent-browser command, killing it once `limit` elapses
    async fn run_command(&self, args: &[&str], limit: Duration) -> Result<String> {
        let operation = args.join(" ");
        let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        let mut cmd = self.build_command(args);

        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| CheckinError::timeout(operation.clone(), timeout_ms))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CheckinError::AgentBrowserNotFound
                } else {
                    CheckinError::browser(format!("Failed to run agent-browser: {}", e))
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_timeout_message(&stderr) {
                return Err(CheckinError::timeout(operation, timeout_ms));
            }
            Err(CheckinError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Set the viewport size
    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        let (w, h) = (width.to_string(), height.to_string());
        self.run_command(&["set", "viewport", &w, &h], COMMAND_TIMEOUT)
            .await
            .map(|_| ())
    }
}

/// agent-browser reports Playwright timeouts on stderr
fn is_timeout_message(stderr: &str) -> bool {
    stderr.contains("TimeoutError") || stderr.contains("Timeout ") || stderr.contains("timed out")
}

#[async_trait]
impl BrowserSession for BrowserExecutor {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.run_command(&["open", url], timeout).await.map(|_| ())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()> {
        self.run_command(&["wait", "--load", "networkidle"], timeout)
            .await
            .map(|_| ())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.run_command(&["wait", selector], timeout)
            .await
            .map(|_| ())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let output = self
            .run_command(&["get", "count", selector], COMMAND_TIMEOUT)
            .await?;
        output.trim().parse().map_err(|_| {
            CheckinError::browser(format!(
                "unexpected count for '{}': {}",
                selector,
                output.trim()
            ))
        })
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let output = self
            .run_command(&["is", "visible", selector], COMMAND_TIMEOUT)
            .await?;
        Ok(output.trim().eq_ignore_ascii_case("true"))
    }

    async fn text(&self, selector: &str) -> Result<String> {
        self.run_command(&["get", "text", selector], COMMAND_TIMEOUT)
            .await
            .map(|s| s.trim_end_matches('\n').to_string())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.run_command(&["click", selector], COMMAND_TIMEOUT)
            .await
            .map(|_| ())
    }

    async fn title(&self) -> Result<String> {
        self.run_command(&["get", "title"], COMMAND_TIMEOUT)
            .await
            .map(|s| s.trim().to_string())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run_command(&["screenshot", &path, "--full"], COMMAND_TIMEOUT)
            .await
            .map(|_| ())
    }

    async fn close(&self) -> Result<()> {
        self.run_command(&["close"], COMMAND_TIMEOUT).await.map(|_| ())
    }
}

/// Launches agent-browser sessions
pub struct AgentBrowserLauncher {
    config: BrowserConfig,
}

impl AgentBrowserLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for AgentBrowserLauncher {
    async fn open(&self, saved_state: &Path) -> Result<Box<dyn BrowserSession>> {
        if !BrowserExecutor::is_available(&self.config.binary).await {
            return Err(CheckinError::AgentBrowserNotFound);
        }

        let executor = BrowserExecutor::from_config(&self.config).with_state(saved_state);
        // The first command starts the browser, so a failure here still leaves one running
        if let Err(e) = executor.set_viewport(1920, 1080).await {
            if let Err(close_err) = executor.close().await {
                tracing::warn!(error = %close_err, "failed to close browser after setup error");
            }
            return Err(e);
        }

        tracing::debug!(session = %self.config.session_name, "browser session opened");
        Ok(Box::new(executor))
    }
}
