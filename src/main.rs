//! MovieMagic - terminal movie browser backed by TMDB
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! moviemagic
//!
//! # CLI mode (for automation)
//! moviemagic list --filter upcoming
//! moviemagic search "blade runner" --json
//! moviemagic info 78
//! ```

use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use moviemagic::app::App;
use moviemagic::cli::{Cli, Command, ExitCode, Output};
use moviemagic::commands;
use moviemagic::config::Config;
use moviemagic::runtime::Runtime;
use moviemagic::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                let output = Output::new(&cli);
                let code = output.error(format!("{}: {}", path.display(), e), ExitCode::ConfigError);
                std::process::exit(code.into());
            }
        },
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_stderr_logging();
        let exit_code = run_cli(cli, config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        init_file_logging(&config);
        run_tui(config).await
    }
}

// =============================================================================
// Logging
// =============================================================================

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// CLI mode: warnings and errors on stderr, stdout stays machine-readable
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// TUI mode owns the terminal, so logs go to a file in the data dir
fn init_file_logging(config: &Config) {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(log = %path.display(), "moviemagic starting");
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);
    let client = commands::client(&config);

    let Some(command) = cli.command else {
        // Handled by is_cli_mode check
        return ExitCode::Success;
    };

    // Favorites can be listed and removed without an API key
    if let Command::Favorites(cmd) = command {
        let mut favorites = commands::favorites_store(&config);
        return commands::favorites_cmd(cmd, client.as_ref().ok(), &mut favorites, &output).await;
    }

    let client = match client {
        Ok(client) => client,
        Err(e) => return output.error(e.to_string(), ExitCode::ConfigError),
    };

    match command {
        Command::List(cmd) => commands::list_cmd(cmd, &config, &client, &output).await,

        Command::Search(cmd) => commands::search_cmd(cmd, &client, &output).await,

        Command::Info(cmd) => {
            let favorites = commands::favorites_store(&config);
            commands::info_cmd(cmd, &client, favorites, &output).await
        }

        Command::Suggest(cmd) => {
            let favorites = commands::favorites_store(&config);
            commands::suggest_cmd(cmd, &client, favorites, &output).await
        }

        Command::Favorites(_) => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    // Fail before touching the terminal if there is no key
    let client = commands::client(&config).context("Cannot start MovieMagic")?;

    let favorites = commands::favorites_store(&config);
    let mut app = App::new(favorites)
        .with_filter(config.filter())
        .with_quiet_interval(config.quiet_interval());
    let mut runtime = Runtime::new(client);

    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut runtime).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "event loop failed");
    }
    result
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, runtime: &mut Runtime) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(50);

    let initial = app.start();
    runtime.dispatch(initial);

    while app.running {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so completions and timers keep flowing
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    let effects = app.handle_key(key, Instant::now());
                    runtime.dispatch(effects);
                }
            }
        }

        // Debounce and blur timers
        let due = app.tick(Instant::now());
        runtime.dispatch(due);

        // Completed network requests
        runtime.pump(app);
    }

    tracing::info!(in_flight = runtime.in_flight(), "moviemagic exiting");
    Ok(())
}
