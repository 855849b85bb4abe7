//! Configuration management for the check-in runner
//!
//! Supports environment variables, config files, and runtime overrides.
//! Every section falls back to defaults, so an absent file simply means
//! notifications stay disabled.
//!
//! Config file lookup: `./config.json`, then `~/.config/daily-checkin/config.toml`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{CheckinError, Result};
use crate::core::types::PushTemplate;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// PushPlus notification configuration
    #[serde(default)]
    pub pushplus: PushPlusConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Target site pages and selectors
    #[serde(default)]
    pub site: SiteConfig,
    /// Bounded waits and settle delays
    #[serde(default)]
    pub timings: TimingConfig,
}

/// PushPlus push endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushPlusConfig {
    /// Whether notifications are sent at all
    pub enabled: bool,
    /// PushPlus user token
    pub token: Option<String>,
    /// Template used when a send does not name one
    pub template: PushTemplate,
    /// Send endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Saved login state (cookies and storage)
    pub auth_state: PathBuf,
    /// agent-browser executable
    pub binary: String,
    /// Full-page screenshot of the check-in page, for diagnosing UI drift
    pub debug_screenshot: Option<PathBuf>,
}

/// Pages and selectors of the target site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub signin_url: String,
    pub lottery_url: String,
    /// Signal that the check-in page has rendered
    pub readiness_selector: String,
    /// Candidate check-in controls, highest priority first
    pub signin_selectors: Vec<String>,
    pub draw_selector: String,
    pub result_selector: String,
}

/// Timeouts and delays, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub navigation_ms: u64,
    pub network_idle_ms: u64,
    pub readiness_ms: u64,
    pub result_ms: u64,
    pub signin_settle_ms: u64,
    pub lottery_settle_ms: u64,
}

impl Default for PushPlusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
            template: PushTemplate::default(),
            endpoint: "http://www.pushplus.plus/send".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            session_name: "daily-checkin".to_string(),
            headed: false,
            auth_state: PathBuf::from("auth.json"),
            binary: "agent-browser".to_string(),
            debug_screenshot: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            signin_url: "https://juejin.cn/user/center/signin".to_string(),
            lottery_url: "https://juejin.cn/user/center/lottery".to_string(),
            readiness_selector: "text=签到".to_string(),
            signin_selectors: vec![
                r#"button:has-text("立即签到")"#.to_string(),
                r#"button:has-text("签到")"#.to_string(),
                ".signin-btn".to_string(),
                ".check-in-btn".to_string(),
            ],
            draw_selector: "#turntable-item-0".to_string(),
            result_selector: ".lottery-modal .byte-modal__body".to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            navigation_ms: 60_000,
            network_idle_ms: 30_000,
            readiness_ms: 10_000,
            result_ms: 10_000,
            signin_settle_ms: 5_000,
            lottery_settle_ms: 3_000,
        }
    }
}

impl PushPlusConfig {
    /// Notifications go out only when enabled and a token is present
    pub fn is_active(&self) -> bool {
        self.enabled && self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TimingConfig {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn readiness(&self) -> Duration {
        Duration::from_millis(self.readiness_ms)
    }

    pub fn result(&self) -> Duration {
        Duration::from_millis(self.result_ms)
    }

    pub fn signin_settle(&self) -> Duration {
        Duration::from_millis(self.signin_settle_ms)
    }

    pub fn lottery_settle(&self) -> Duration {
        Duration::from_millis(self.lottery_settle_ms)
    }

    /// All waits and delays shrunk to a few milliseconds, for tests
    pub fn instant() -> Self {
        Self {
            navigation_ms: 50,
            network_idle_ms: 50,
            readiness_ms: 50,
            result_ms: 50,
            signin_settle_ms: 0,
            lottery_settle_ms: 0,
        }
    }
}

impl Config {
    /// Get the user config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daily-checkin")
    }

    /// Candidate config files, in lookup order
    pub fn default_locations() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config.json"),
            Self::config_dir().join("config.toml"),
        ]
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    ///
    /// Never fails: an unreadable file is logged and replaced by defaults.
    pub fn load(path: Option<&Path>) -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = Self::resolve_path(path)
            .and_then(|p| match Self::load_from_file(&p) {
                Ok(config) => {
                    tracing::debug!(path = %p.display(), "loaded config file");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "config file unusable, using defaults");
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env();
        config
    }

    /// The config file to read: the requested one, or the first default that exists
    fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => {
                tracing::warn!(path = %p.display(), "config file not found, using defaults");
                None
            }
            None => Self::default_locations().into_iter().find(|p| p.exists()),
        }
    }

    /// Load configuration from a single file
    ///
    /// `.toml` files are parsed as TOML, anything else as JSON.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CheckinError::config(format!("Failed to read config: {}", e)))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config: Config = if is_toml {
            toml::from_str(&content)
                .map_err(|e| CheckinError::config(format!("Failed to parse config: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| CheckinError::config(format!("Failed to parse config: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(token) = env::var("PUSHPLUS_TOKEN") {
            if !token.trim().is_empty() {
                self.pushplus.token = Some(token);
            }
        }
        if let Ok(v) = env::var("PUSHPLUS_ENABLED") {
            self.pushplus.enabled = v == "true" || v == "1";
        }
        if let Ok(v) = env::var("PUSHPLUS_TEMPLATE") {
            match v.parse() {
                Ok(template) => self.pushplus.template = template,
                Err(e) => tracing::warn!(error = %e, "ignoring PUSHPLUS_TEMPLATE"),
            }
        }
        if let Ok(path) = env::var("CHECKIN_AUTH_STATE") {
            self.browser.auth_state = PathBuf::from(path);
        }
        if let Ok(v) = env::var("CHECKIN_HEADED") {
            self.browser.headed = v == "true" || v == "1";
        }
    }

    /// Check that every configured URL parses
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("pushplus.endpoint", &self.pushplus.endpoint),
            ("site.signin_url", &self.site.signin_url),
            ("site.lottery_url", &self.site.lottery_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| CheckinError::config(format!("Invalid {} '{}': {}", name, value, e)))?;
        }

        if self.site.signin_selectors.is_empty() {
            return Err(CheckinError::config(
                "site.signin_selectors must list at least one selector",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.pushplus.enabled);
        assert!(!config.pushplus.is_active());
        assert_eq!(config.pushplus.template, PushTemplate::Plain);
        assert_eq!(config.pushplus.timeout_secs, 10);
        assert_eq!(config.timings.navigation_ms, 60_000);
        assert_eq!(config.site.signin_selectors.len(), 4);
        assert_eq!(config.browser.auth_state, PathBuf::from("auth.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_without_token_is_inactive() {
        let mut pushplus = PushPlusConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(!pushplus.is_active());

        pushplus.token = Some("   ".to_string());
        assert!(!pushplus.is_active());

        pushplus.token = Some("abc".to_string());
        assert!(pushplus.is_active());
    }

    #[test]
    fn test_load_json_pushplus_section() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"pushplus": {{"enabled": true, "token": "t0k", "template": "markdown"}}}}"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert!(config.pushplus.is_active());
        assert_eq!(config.pushplus.template, PushTemplate::Markdown);
        assert_eq!(config.pushplus.endpoint, "http://www.pushplus.plus/send");
        assert_eq!(config.timings.lottery_settle_ms, 3_000);
    }

    #[test]
    fn test_load_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "[pushplus]\nenabled = true\ntoken = \"x\"\ntemplate = \"html\"\n\n[timings]\nresult_ms = 2500\n"
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.pushplus.template, PushTemplate::Html);
        assert_eq!(config.timings.result_ms, 2_500);
        assert_eq!(config.timings.readiness_ms, 10_000);
    }

    #[test]
    fn test_unreadable_config_falls_back_to_disabled() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(Config::load_from_file(file.path()).is_err());

        let config = Config::load(Some(file.path()));
        assert_eq!(config.site.draw_selector, "#turntable-item-0");
    }

    #[test]
    fn test_missing_requested_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert_eq!(Config::resolve_path(Some(&missing)), None);

        let config = Config::load(Some(&missing));
        assert_eq!(config.site.draw_selector, "#turntable-item-0");
        assert_eq!(config.timings.navigation_ms, 60_000);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = Config::default();
        config.pushplus.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(CheckinError::Config(_))));
    }
}
