use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use zcalc::display::{DisplayRenderer, OutputFormat, RecordingRenderer, TerminalRenderer};
use zcalc::{Config, Session, input};

/// Keypad calculator for the terminal.
///
/// Keys are digits, `.`, `+ - * /`, `=`, `%` and the names `Enter`,
/// `Backspace`, `Escape`, `sign`. Without KEYS, lines are read from stdin.
#[derive(Parser, Debug)]
#[command(name = "zcalc", version, about)]
struct Cli {
    /// Path to a config file (defaults to $XDG_CONFIG_HOME/zcalc/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print frames as JSON lines
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Keys to press, e.g. `12+3=`
    keys: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    if cli.keys.is_empty() {
        run_interactive(config, format)
    } else {
        run_batch(config, format, &cli.keys.join(" "))
    }
}

/// Press every key, print the last rendered frame, then let any pending
/// reset run.
fn run_batch(config: Config, format: OutputFormat, keys: &str) -> anyhow::Result<()> {
    let inputs = input::tokenize(keys).context("Invalid keys")?;

    let mut session = Session::new(config, RecordingRenderer::default());
    session.dispatch_all(inputs);

    let frame = session
        .renderer()
        .last()
        .cloned()
        .unwrap_or_else(|| session.frame());
    TerminalRenderer::new(std::io::stdout().lock(), format).render(&frame);

    let ran = session.flush();
    debug!(ran, now_ms = session.now_ms(), "Flushed deferred actions");
    Ok(())
}

/// Read lines from stdin, advancing the session clock by real elapsed time
/// before each one.
fn run_interactive(config: Config, format: OutputFormat) -> anyhow::Result<()> {
    let renderer = TerminalRenderer::new(std::io::stdout(), format);
    let mut session = Session::new(config, renderer);
    let started = Instant::now();

    session.refresh();

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;

        let elapsed = started.elapsed().as_millis() as u64;
        session.advance(elapsed.saturating_sub(session.now_ms()));

        match input::tokenize(&line) {
            Ok(inputs) => {
                session.dispatch_all(inputs);
            }
            Err(e) => warn!("Skipping line: {}", e),
        }
    }

    Ok(())
}
