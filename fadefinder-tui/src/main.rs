//! FadeFinder TUI: interactive gap-event dashboard.
//!
//! Panels:
//! 1. Filters: range sliders and backtest options
//! 2. Results: filtered rows with a per-trade outcome column
//! 3. Chart: Day1/Gap by date
//! 4. Backtest: per-stop metrics, summary and basic statistics
//! 5. Help: keyboard shortcuts
//!
//! Every input change reruns the whole query on the main thread.

mod app;
mod input;
mod persistence;
mod sliders;
mod theme;
mod ui;

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fadefinder_core::{load_dataset, synthetic, Dataset, FadeFinderConfig, QueryParams};

use crate::app::AppState;

/// Rows generated when no dataset is given.
const DEMO_ROWS: usize = 5_000;

#[derive(Parser, Debug)]
#[command(name = "fadefinder-tui", about = "Interactive gap-fade dashboard", version)]
struct Args {
    /// Gap-event file (.csv or .parquet).
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML config; its filter and backtest replace the saved session.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use N synthetic rows instead of a file.
    #[arg(long, value_name = "N", conflicts_with = "data")]
    synthetic: Option<usize>,

    /// Seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write logs to this file. The terminal is owned by the UI, so there
    /// is no log output without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Dataset plus a label for the header. Falls back to synthetic demo data
/// when neither flags nor config name a source.
fn load_source(args: &Args, config: Option<&FadeFinderConfig>) -> Result<(Dataset, String)> {
    if let Some(count) = args.synthetic {
        let dataset = Dataset::new(synthetic::generate(count, args.seed))?;
        return Ok((dataset, format!("synthetic ({count} rows, seed {})", args.seed)));
    }

    let path = args
        .data
        .clone()
        .or_else(|| config.and_then(|c| c.data.path.clone()));
    let load = config.map(|c| c.data.load.clone()).unwrap_or_default();

    match path {
        Some(path) => {
            let dataset = load_dataset(&path, &load)
                .with_context(|| format!("loading {}", path.display()))?;
            Ok((dataset, path.display().to_string()))
        }
        None => {
            tracing::warn!(rows = DEMO_ROWS, "no dataset given, using synthetic demo data");
            let dataset = Dataset::new(synthetic::generate(DEMO_ROWS, args.seed))?;
            Ok((dataset, format!("synthetic demo ({DEMO_ROWS} rows)")))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = args
        .config
        .as_deref()
        .map(FadeFinderConfig::from_file)
        .transpose()?;
    let (dataset, source_label) = load_source(&args, config.as_ref())?;
    tracing::info!(rows = dataset.len(), source = %source_label, "dataset ready");

    let state_path = persistence::default_path();
    let params = match &config {
        Some(c) => c.to_query_params()?,
        None => QueryParams::default(),
    };

    let mut app = AppState::new(dataset, source_label, params, state_path.clone());

    // A config file wins over the saved session.
    if config.is_none() {
        let persisted = persistence::load(&state_path);
        persistence::apply(&mut app, persisted);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&app.state_path, &persisted) {
        tracing::warn!(error = %e, "failed to save session state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms timeout for ~20 FPS tick
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
