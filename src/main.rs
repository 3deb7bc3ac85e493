//! testdeck - Entry Point

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// testdeck - TUI for discovering and running pytest tests
#[derive(Parser, Debug)]
#[command(name = "testdeck")]
#[command(version)]
#[command(about = "TUI dashboard for discovering and running pytest tests")]
pub struct Args {
    /// Test framework program to invoke (default: pytest)
    #[arg(long)]
    pub command: Option<String>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = testdeck::logging::init(&config.log_file_path) {
        eprintln!("Warning: logging disabled: {err}");
    }

    info!(config = ?config, "Configuration loaded and resolved");

    // Discovery runs before the terminal is taken over, so its error lands
    // on a normal screen.
    let tree = match testdeck::discovery::discover_tree(&config.framework()) {
        Ok(tree) => tree,
        Err(err) => {
            let err = testdeck::model::AppError::from(err);
            error!(error = %err, "Test discovery failed");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = testdeck::view::run_dashboard(tree, &config) {
        error!(error = %err, "Dashboard failed");
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn resolve_config(
    args: &Args,
) -> Result<testdeck::config::ResolvedConfig, testdeck::config::ConfigError> {
    // 1. Load config file (or None if missing)
    let config_file = testdeck::config::load_config_with_precedence(args.config.clone())?;

    // 2. Merge with defaults
    let merged = testdeck::config::merge_config(config_file)?;

    // 3. Apply environment variable overrides
    let with_env = testdeck::config::apply_env_overrides(merged);

    // 4. Apply CLI argument overrides; --no-color only overrides when set
    let no_color_override = if args.no_color { Some(true) } else { None };
    Ok(testdeck::config::apply_cli_overrides(
        with_env,
        args.command.clone(),
        no_color_override,
    ))
}
