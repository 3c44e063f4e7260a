//! MOSAIC launch terminal entry point
//!
//! Usage:
//!   mosaic-tui [OPTIONS]
//!
//! Run with `--help` for the full option list. `--headless` replays commands
//! from stdin without a terminal and prints scene messages as JSON lines.

use std::fs::File;
use std::io;
use std::panic;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mosaic_conductor::LaunchConfig;
use mosaic_tui::cli::Args;
use mosaic_tui::{headless, App};

/// Log file for the full-screen mode
const LOG_FILE_ENV: &str = "MOSAIC_LOG_FILE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.headless {
        // stdout carries the JSON lines, so logs go to stderr.
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .with(EnvFilter::from_default_env())
            .init();

        let config = args.load_config().context("loading configuration")?;
        let report = headless::run(&config).await?;
        tracing::info!(
            lines = report.lines_read,
            messages = report.messages_written,
            state = %report.final_state,
            "headless run finished"
        );
        return Ok(());
    }

    // The alternate screen owns stdout; log to a file or not at all.
    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        let file = File::create(&path)
            .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }

    let config = args.load_config().context("loading configuration")?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: mosaic-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("To replay commands without a terminal:");
        eprintln!("  echo 'start: mosaic-2025' | mosaic-tui --headless");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    terminal.hide_cursor()?;

    // Run the app
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    let goodbye = result?;
    if let Some(goodbye) = goodbye {
        println!("\n\x1b[36mMOSAIC:\x1b[0m {goodbye}\n");
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &LaunchConfig,
) -> anyhow::Result<Option<String>> {
    let mut app = App::new(config)?;
    app.run(terminal).await?;
    Ok(app.goodbye().map(str::to_string))
}
