//! Daily Check-in
//!
//! Main entry point for the CLI application.

use clap::Parser;
use daily_checkin::browser::AgentBrowserLauncher;
use daily_checkin::{CheckinError, Config, PushPlusNotifier, Sequencer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Daily check-in and lottery draw with PushPlus reports
#[derive(Parser, Debug)]
#[command(name = "daily-checkin")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (JSON, or TOML with a .toml extension)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Saved login state file
    #[arg(long, short = 'a')]
    auth_state: Option<PathBuf>,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("daily_checkin={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.debug);

    // Build configuration
    let mut config = Config::load(args.config.as_deref());

    // Apply CLI overrides
    if let Some(ref path) = args.auth_state {
        config.browser.auth_state = path.clone();
    }

    if args.headed {
        config.browser.headed = true;
    }

    if !config.browser.auth_state.exists() {
        let err = CheckinError::SessionStateMissing(config.browser.auth_state.clone());
        tracing::error!("{}", err);
        eprintln!("错误：找不到 {} 文件。", config.browser.auth_state.display());
        eprintln!("请先登录一次并保存浏览器登录状态到该文件。");
        return Ok(ExitCode::FAILURE);
    }

    let notifier = PushPlusNotifier::new(config.pushplus.clone())?;
    let sequencer = Sequencer::new(&config, notifier);
    let launcher = AgentBrowserLauncher::new(config.browser.clone());

    let summary = sequencer.run(&launcher, &config.browser.auth_state).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(ExitCode::SUCCESS)
}
