//! Hobart CLI binary.
//!
//! Replays a daily price panel through one of the momentum strategies and
//! reports the monthly baskets.

mod logging;

use clap::{Parser, Subcommand};
use hobart::{HobartConfig, Replay, ReplayOutcome, StrategyKind};
use hobart_data::{MarketIndex, PricePanel};
use hobart_factors::{DataFrequency, available_factors, factors_by_frequency};
use hobart_output::{ExportFormat, Exporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: monthly long/short momentum selection", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to <config dir>/hobart/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a price panel and print the monthly selections
    Run {
        /// Daily price panel CSV (date,symbol,adjusted_close,volume[,has_fundamentals])
        #[arg(long)]
        prices: PathBuf,

        /// Market index CSV (date,close); required for the residual strategy
        #[arg(long)]
        market: Option<PathBuf>,

        /// Strategy: reversal or residual
        #[arg(long, default_value = "reversal")]
        strategy: StrategyKind,

        /// Write selections and targets to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format: csv, json or pretty-json
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the summary as Markdown instead of a table
        #[arg(long)]
        markdown: bool,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Print the current factor score of one instrument
    Score {
        /// Daily price panel CSV
        #[arg(long)]
        prices: PathBuf,

        /// Instrument symbol
        #[arg(long)]
        symbol: String,

        /// Market index CSV; required for the residual strategy
        #[arg(long)]
        market: Option<PathBuf>,

        /// Strategy: reversal or residual
        #[arg(long, default_value = "reversal")]
        strategy: StrategyKind,
    },

    /// List the available factors
    Factors {
        /// Only factors of this input frequency (daily or monthly)
        #[arg(long)]
        frequency: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = HobartConfig::load_or_default(cli.config.as_deref())?;
    logging::init(&config.logging.level);

    match cli.command {
        Commands::Run {
            prices,
            market,
            strategy,
            output,
            format,
            report,
            markdown,
            quiet,
        } => {
            let outcome = replay(&config, &prices, market.as_deref(), strategy, !quiet)?;
            let summary = outcome.summary();
            if markdown {
                println!("{}", summary.to_markdown());
            } else {
                println!("{}", summary.to_ascii_table());
            }

            if let Some(path) = output {
                outcome.to_exports().export_to_file(&path, format)?;
                println!("Selections written to {} ({})", path.display(), format);
            }
            if let Some(path) = report {
                outcome.report()?.write_to(&path)?;
                println!("Report written to {}", path.display());
            }
        }
        Commands::Score {
            prices,
            symbol,
            market,
            strategy,
        } => {
            let panel = PricePanel::from_csv(&prices)?;
            let history = panel.history(&symbol)?;
            tracing::debug!(%symbol, days = history.len(), "Found instrument");
            let loaded = build_replay(&panel, market.as_deref())?;
            let mut strategy = strategy.build(&config)?;
            let outcome = loaded.run(strategy.as_mut())?;
            let score = strategy.score_symbol(&symbol)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "symbol": symbol,
                    "strategy": strategy.name(),
                    "as_of": outcome.end,
                    "score": score,
                }))?
            );
        }
        Commands::Factors { frequency } => list_factors(frequency.as_deref())?,
        Commands::Config => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}

fn build_replay(
    panel: &PricePanel,
    market: Option<&Path>,
) -> Result<Replay, Box<dyn std::error::Error>> {
    let market = market.map(MarketIndex::from_csv).transpose()?;
    tracing::info!(
        rows = panel.len(),
        symbols = panel.symbols()?.len(),
        market = market.as_ref().map_or(0, MarketIndex::len),
        "Loaded inputs"
    );
    Ok(Replay::new(panel, market)?)
}

fn replay(
    config: &HobartConfig,
    prices: &Path,
    market: Option<&Path>,
    kind: StrategyKind,
    show_progress: bool,
) -> Result<ReplayOutcome, Box<dyn std::error::Error>> {
    let replay = build_replay(&PricePanel::from_csv(prices)?, market)?;
    let mut strategy = kind.build(config)?;

    let pb = if show_progress {
        ProgressBar::new(replay.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let outcome = replay.run_with_progress(strategy.as_mut(), |done, date| {
        pb.set_position(done as u64);
        pb.set_message(date.to_string());
    })?;
    pb.finish_with_message(format!("{} rebalances", outcome.rebalances()));

    Ok(outcome)
}

fn list_factors(frequency: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let factors = match frequency.map(str::to_ascii_lowercase).as_deref() {
        None => available_factors(),
        Some("daily") => factors_by_frequency(DataFrequency::Daily),
        Some("monthly") => factors_by_frequency(DataFrequency::Monthly),
        Some(other) => return Err(format!("unknown frequency '{other}'").into()),
    };

    println!(
        "{:<20} {:<9} {:<9} {:>8}  {}",
        "Factor", "Category", "Frequency", "Lookback", "Description"
    );
    println!("{}", "-".repeat(90));
    for factor in factors {
        println!(
            "{:<20} {:<9} {:<9} {:>8}  {}",
            factor.name,
            factor.category.to_string(),
            factor.frequency.to_string(),
            factor.lookback,
            factor.description
        );
        println!("{:<49}  inputs: {}", "", factor.required_inputs.join(", "));
    }
    Ok(())
}
