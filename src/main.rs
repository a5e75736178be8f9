//! orguser-manager binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal in
//! raw mode, runs the TUI event loop, and restores the terminal state on exit.
//!
use anyhow::{Context as _, Result, bail};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orguser_manager::api::Directory;
use orguser_manager::api::fixture::FixtureDirectory;
use orguser_manager::api::graphql::GraphqlDirectory;
use orguser_manager::app::{self, AppState};

#[derive(Parser, Debug)]
#[command(
    name = "orguser-manager",
    version,
    about = "Add users to an organization from the terminal",
    long_about = "Opens a TUI with an add-user dialog. Roles and cost centers are read from a GraphQL endpoint (--endpoint) or from a JSON fixture file (--fixtures)."
)]
struct Cli {
    /// Organization the new users belong to.
    #[arg(long, env = "ORGUSER_ORGANIZATION_ID")]
    organization_id: String,

    /// Use the operator view (operator cost-center query and `admin` labels).
    #[arg(long, env = "ORGUSER_ADMIN")]
    admin: bool,

    /// GraphQL endpoint URL.
    #[arg(long, env = "ORGUSER_ENDPOINT", conflicts_with = "fixtures")]
    endpoint: Option<String>,

    /// Bearer token sent with GraphQL requests.
    #[arg(long, env = "ORGUSER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// JSON fixture file used instead of a GraphQL endpoint.
    #[arg(long, env = "ORGUSER_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// Log file; the terminal itself is owned by the UI.
    #[arg(long, env = "ORGUSER_LOG", default_value = "orguser-manager.log")]
    log_file: PathBuf,

    /// Directory holding theme.conf, keybinds.conf and messages.conf.
    #[arg(long, env = "ORGUSER_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,
}

/// Send `tracing` output to `path`, filtered by `RUST_LOG` (default `info`).
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_directory(cli: &Cli) -> Result<(Arc<dyn Directory>, String)> {
    match (&cli.endpoint, &cli.fixtures) {
        (Some(endpoint), None) => {
            let dir: Arc<dyn Directory> = Arc::new(
                GraphqlDirectory::new(endpoint.clone(), cli.token.clone())
                    .map_err(|e| anyhow::anyhow!("{e}"))?,
            );
            Ok((dir, endpoint.clone()))
        }
        (None, Some(path)) => {
            let dir: Arc<dyn Directory> = Arc::new(
                FixtureDirectory::from_file(path).map_err(|e| anyhow::anyhow!("{e}"))?,
            );
            Ok((dir, format!("fixtures {}", path.display())))
        }
        _ => bail!("pass exactly one of --endpoint or --fixtures"),
    }
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    let (directory, source) = build_directory(&cli)?;
    info!(organization = %cli.organization_id, admin = cli.admin, %source, "starting");

    let mut state =
        AppState::with_config_dir(&cli.organization_id, cli.admin, source, &cli.config_dir);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, directory);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
