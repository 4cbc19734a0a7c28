//! FadeFinder CLI: one-shot queries, dataset inspection and synthetic data.
//!
//! Commands:
//! - `query`: filter a dataset, run the stop-size backtest, print the tables
//! - `inspect`: row count, date span and fingerprint of a dataset
//! - `synth`: write a deterministic synthetic dataset to CSV or Parquet

mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{prelude::*, EnvFilter};

use fadefinder_core::backtest::{Direction, LongStopRule, ZeroRiskPolicy};
use fadefinder_core::data::{write_csv, write_parquet};
use fadefinder_core::export::write_outcomes_csv;
use fadefinder_core::filter::parse_date;
use fadefinder_core::{
    load_dataset, run_query, synthetic, Bounds, Dataset, FadeFinderConfig, LargestFadeScope,
    QueryParams,
};

#[derive(Parser)]
#[command(
    name = "fadefinder",
    version,
    about = "FadeFinder: gap-event filter and stop-size backtest"
)]
struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "debug", "fadefinder_core=trace").
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a dataset and print the backtest and statistics tables.
    Query(QueryArgs),
    /// Summarise a dataset: rows, stocks, date span, fingerprint.
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write a synthetic dataset (.csv or .parquet by extension).
    Synth {
        /// Output file.
        #[arg(long)]
        out: PathBuf,

        /// Number of rows.
        #[arg(long, default_value_t = 5_000)]
        count: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Where the rows come from.
#[derive(Args)]
struct SourceArgs {
    /// TOML config file. Its [data] path is used when --data is absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset file (.csv or .parquet).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Use N synthetic rows instead of a file.
    #[arg(long, value_name = "N", conflicts_with = "data")]
    synthetic: Option<usize>,

    /// Seed for --synthetic.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Values are already in millions; skip the load-time scaling.
    #[arg(long, default_value_t = false)]
    no_scale: bool,

    /// Drop invalid rows with a warning instead of failing.
    #[arg(long, default_value_t = false)]
    skip_invalid: bool,
}

#[derive(Args)]
struct QueryArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Gap size range, percent: MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    gap: Option<Vec<f64>>,

    /// Pre-market volume range, millions: MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pre_volume: Option<Vec<f64>>,

    /// Open price range: MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    price: Option<Vec<f64>>,

    /// Market cap range, millions: MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    market_cap: Option<Vec<f64>>,

    /// Open / pre-market high range: MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    open_pre_high: Option<Vec<f64>>,

    /// Start date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<String>,

    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    /// Comma-separated stop sizes, as fractions of the gap.
    #[arg(long, value_delimiter = ',')]
    stops: Option<Vec<f64>>,

    #[arg(long)]
    fee_win: Option<f64>,

    #[arg(long)]
    fee_loss: Option<f64>,

    /// Stop test for long trades.
    #[arg(long, value_enum)]
    long_stop_rule: Option<LongStopRuleArg>,

    /// Handling of rows with zero gap size.
    #[arg(long, value_enum)]
    zero_risk: Option<ZeroRiskArg>,

    /// Rows searched for the largest fade.
    #[arg(long, value_enum)]
    fade_scope: Option<FadeScopeArg>,

    /// Print the full outcome as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Also print the first N matching rows.
    #[arg(long, value_name = "N", default_value_t = 0)]
    rows: usize,

    /// Write matching rows plus SL{stop}Gap columns to this CSV.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Short,
    Long,
}

#[derive(Clone, Copy, ValueEnum)]
enum LongStopRuleArg {
    Absolute,
    Signed,
}

#[derive(Clone, Copy, ValueEnum)]
enum ZeroRiskArg {
    Skip,
    Propagate,
}

#[derive(Clone, Copy, ValueEnum)]
enum FadeScopeArg {
    Filtered,
    Dataset,
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // stderr keeps stdout clean for --json.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Query(args) => run_query_cmd(args),
        Commands::Inspect { source } => run_inspect(&source),
        Commands::Synth { out, count, seed } => run_synth(&out, count, seed),
    }
}

fn load_config(source: &SourceArgs) -> Result<FadeFinderConfig> {
    let mut config = match &source.config {
        Some(path) => FadeFinderConfig::from_file(path)?,
        None => FadeFinderConfig::default(),
    };
    if source.no_scale {
        config.data.load.scale_to_millions = false;
    }
    if source.skip_invalid {
        config.data.load.skip_invalid = true;
    }
    if let Some(path) = &source.data {
        config.data.path = Some(path.clone());
    }
    Ok(config)
}

fn load_source(source: &SourceArgs, config: &FadeFinderConfig) -> Result<Dataset> {
    if let Some(count) = source.synthetic {
        tracing::info!(count, seed = source.seed, "using synthetic dataset");
        return Ok(Dataset::new(synthetic::generate(count, source.seed))?);
    }
    let Some(path) = &config.data.path else {
        bail!("no dataset: pass --data, --synthetic, or a config with [data] path");
    };
    load_dataset(path, &config.data.load)
        .with_context(|| format!("loading {}", path.display()))
}

fn bounds(values: &[f64]) -> Bounds {
    Bounds::new(values[0], values[1])
}

/// Config values first, then flag overrides.
fn query_params(args: &QueryArgs, config: &FadeFinderConfig) -> Result<QueryParams> {
    let mut params = config.to_query_params()?;
    let c = &mut params.criteria;

    if let Some(v) = &args.gap {
        c.gap_size = bounds(v);
    }
    if let Some(v) = &args.pre_volume {
        c.pre_volume = bounds(v);
    }
    if let Some(v) = &args.price {
        c.open_price = bounds(v);
    }
    if let Some(v) = &args.market_cap {
        c.market_cap = bounds(v);
    }
    if let Some(v) = &args.open_pre_high {
        c.open_pre_high = bounds(v);
    }
    if let Some(s) = &args.start {
        c.dates.start = parse_date(s)?;
    }
    if let Some(s) = &args.end {
        c.dates.end = parse_date(s)?;
    }

    let b = &mut params.backtest;
    if let Some(d) = args.direction {
        b.direction = match d {
            DirectionArg::Short => Direction::Short,
            DirectionArg::Long => Direction::Long,
        };
    }
    if let Some(stops) = &args.stops {
        b.stop_sizes = stops.clone();
    }
    if let Some(fee) = args.fee_win {
        b.fee_win = fee;
    }
    if let Some(fee) = args.fee_loss {
        b.fee_loss = fee;
    }
    if let Some(rule) = args.long_stop_rule {
        b.long_stop_rule = match rule {
            LongStopRuleArg::Absolute => LongStopRule::AbsoluteExcursion,
            LongStopRuleArg::Signed => LongStopRule::SignedExcursion,
        };
    }
    if let Some(policy) = args.zero_risk {
        b.zero_risk = match policy {
            ZeroRiskArg::Skip => ZeroRiskPolicy::Skip,
            ZeroRiskArg::Propagate => ZeroRiskPolicy::Propagate,
        };
    }
    if let Some(scope) = args.fade_scope {
        params.fade_scope = match scope {
            FadeScopeArg::Filtered => LargestFadeScope::Filtered,
            FadeScopeArg::Dataset => LargestFadeScope::Dataset,
        };
    }

    params.backtest.validate()?;
    Ok(params)
}

fn run_query_cmd(args: QueryArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let params = query_params(&args, &config)?;
    let dataset = load_source(&args.source, &config)?;

    let outcome = run_query(&dataset, &params)?;

    if let Some(path) = &args.export {
        write_outcomes_csv(path, &outcome)
            .with_context(|| format!("exporting to {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "Matched {} of {} rows ({} to {})",
        outcome.rows.len(),
        dataset.len(),
        params.criteria.dates.start,
        params.criteria.dates.end
    );
    println!();
    if args.rows > 0 {
        println!("{}", report::rows_table(&outcome, args.rows));
    }
    println!("{}", report::backtest_table(&outcome));
    println!("{}", report::stats_table(&outcome));
    if let Some(path) = &args.export {
        println!("Outcomes written to: {}", path.display());
    }
    Ok(())
}

fn run_inspect(source: &SourceArgs) -> Result<()> {
    let config = load_config(source)?;
    let dataset = load_source(source, &config)?;
    print!("{}", report::dataset_summary(&dataset));
    Ok(())
}

fn run_synth(out: &Path, count: usize, seed: u64) -> Result<()> {
    let events = synthetic::generate(count, seed);
    let opts = fadefinder_core::LoadOptions::default();
    match out.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(out, &events, &opts)?,
        Some("parquet") => write_parquet(out, &events, &opts)?,
        _ => bail!("output must end in .csv or .parquet: {}", out.display()),
    }
    println!("Wrote {} synthetic rows to {}", events.len(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> QueryArgs {
        let mut argv = vec!["fadefinder", "query"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Query(q) => q,
            _ => unreachable!(),
        }
    }

    #[test]
    fn flags_override_config() {
        let config = FadeFinderConfig::from_toml(
            "[filter]\ngap_size = { min = 10.0, max = 50.0 }\n[backtest]\nfee_win = 0.05\n",
        )
        .unwrap();
        let args = parse(&[
            "--gap", "30", "90", "--direction", "long", "--stops", "0.25,0.75", "--start",
            "2020-01-01",
        ]);
        let params = query_params(&args, &config).unwrap();

        assert_eq!(params.criteria.gap_size, Bounds::new(30.0, 90.0));
        assert_eq!(params.backtest.direction, Direction::Long);
        assert_eq!(params.backtest.stop_sizes, vec![0.25, 0.75]);
        assert_eq!(params.backtest.fee_win, 0.05);
        assert_eq!(
            params.criteria.dates.start,
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn bad_start_date_is_rejected() {
        let args = parse(&["--start", "2020/01/01"]);
        assert!(query_params(&args, &FadeFinderConfig::default()).is_err());
    }

    #[test]
    fn negative_stop_is_rejected() {
        let args = parse(&["--stops=-0.5"]);
        assert!(query_params(&args, &FadeFinderConfig::default()).is_err());
    }

    #[test]
    fn synthetic_and_data_conflict() {
        let argv = ["fadefinder", "query", "--data", "x.csv", "--synthetic", "10"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_source_is_an_error() {
        let args = parse(&[]);
        let config = load_config(&args.source).unwrap();
        assert!(load_source(&args.source, &config).is_err());
    }
}
