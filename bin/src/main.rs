//! CLI for the alpha-factors feature engine.
//!
//! Lists the factor families, shows their feature layouts, and computes
//! feature datasets from OHLCV CSV files.

use alpha_factors::{
    AlphaCalculator, AlphaConfig, AlphaFactorResult, AlphaRegistry, Bar, CancellationToken,
    FactorFamily, NanStrategy, build_dataset, compute_symbols, histories_from_frame,
    rolling_results_with_progress,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alpha-factors")]
#[command(about = "Alpha-101/158/360 feature extraction from OHLCV bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all factor families
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the feature layout of a family
    Info {
        /// Family name (alpha101, alpha158, alpha360)
        family: String,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute features from a CSV of bars
    Compute {
        /// CSV with symbol, timestamp, open, high, low, close, volume[, turnover]
        input: PathBuf,
        /// Family to compute
        #[arg(long, default_value = "alpha158")]
        family: String,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// NaN handling applied on export
        #[arg(long, default_value = "keep")]
        nan_strategy: String,
        /// Output CSV (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Emit every `step`-th sample of each history instead of only the latest
        #[arg(long)]
        rolling: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("alpha_factors=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List { json, config } => list_families(&registry(config.as_deref())?, json),
        Commands::Info { family, config } => {
            show_family_info(&registry(config.as_deref())?, family.parse()?)
        }
        Commands::Compute { input, family, config, nan_strategy, output, rolling } => {
            let registry = registry(config.as_deref())?;
            let request = ComputeRequest {
                family: family.parse()?,
                strategy: nan_strategy.parse()?,
                rolling,
            };
            let frame = read_bars(&input)?;
            match output {
                Some(path) => {
                    let writer = BufWriter::new(File::create(path)?);
                    run_compute(&registry, &frame, &request, writer)
                }
                None => run_compute(&registry, &frame, &request, std::io::stdout().lock()),
            }
        }
    }
}

/// Registry built from an optional JSON config file.
fn registry(config: Option<&Path>) -> Result<AlphaRegistry, Box<dyn Error>> {
    let config = match config {
        Some(path) => AlphaConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => AlphaConfig::default(),
    };
    Ok(AlphaRegistry::from_config(&config))
}

fn read_bars(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn list_families(registry: &AlphaRegistry, json: bool) -> Result<(), Box<dyn Error>> {
    let all_info = registry.all_info();
    if json {
        println!("{}", serde_json::to_string_pretty(&all_info)?);
        return Ok(());
    }

    println!("Factor Families ({} total)\n", registry.len());
    for info in all_info {
        println!("  {} - {}", info.family, info.description);
        println!("      {} factors, at least {} bars", info.factor_count, info.min_bars);
    }
    Ok(())
}

fn show_family_info(registry: &AlphaRegistry, family: FactorFamily) -> Result<(), Box<dyn Error>> {
    let calc = calculator(registry, family)?;
    println!("Family: {family}");
    println!("Factors: {}", calc.factor_count());
    println!("Minimum history: {} bars", calc.min_bars());
    println!("Feature order:");
    for (i, name) in calc.factor_names().iter().enumerate() {
        println!("  {i:>3} {name}");
    }
    Ok(())
}

fn calculator(
    registry: &AlphaRegistry,
    family: FactorFamily,
) -> Result<&dyn AlphaCalculator, Box<dyn Error>> {
    registry.get(family).ok_or_else(|| format!("family {family} is not registered").into())
}

#[derive(Debug)]
struct ComputeRequest {
    family: FactorFamily,
    strategy: NanStrategy,
    rolling: Option<usize>,
}

/// Compute the requested family over every symbol in `frame` and write the
/// dataset as CSV.
fn run_compute(
    registry: &AlphaRegistry,
    frame: &DataFrame,
    request: &ComputeRequest,
    writer: impl Write,
) -> Result<(), Box<dyn Error>> {
    let calc = calculator(registry, request.family)?;
    let histories = histories_from_frame(frame)?;
    let token = CancellationToken::new();
    info!(family = %request.family, symbols = histories.len(), "Computing features");
    for (symbol, bars) in &histories {
        debug!(
            %symbol,
            bars = bars.len(),
            first = ?bars.first().and_then(Bar::datetime),
            last = ?bars.last().and_then(Bar::datetime),
            "Loaded history"
        );
    }

    let results: Vec<AlphaFactorResult> = match request.rolling {
        Some(step) => {
            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{msg:>10} [{bar:40}] {pos}/{len}")?
                    .progress_chars("=> "),
            );
            let mut results = Vec::new();
            for (symbol, bars) in &histories {
                progress.set_message(symbol.clone());
                progress.reset();
                let samples =
                    rolling_results_with_progress(calc, bars, step, &token, |done, total| {
                        progress.set_length(total as u64);
                        progress.set_position(done as u64);
                    })?;
                results.extend(samples);
            }
            progress.finish_and_clear();
            results
        }
        None => compute_symbols(calc, &histories, &token)
            .into_iter()
            .filter_map(|(symbol, result)| {
                result.map_err(|e| warn!(%symbol, error = %e, "Skipping symbol")).ok()
            })
            .collect(),
    };

    let dataset = build_dataset(calc.factor_names(), &results)?;
    dataset.write_csv(writer, request.strategy)?;
    info!(samples = dataset.len(), factors = dataset.factor_count(), "Wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_frame(symbols: &[&str], count: usize) -> DataFrame {
        let mut symbol = Vec::new();
        let mut timestamp = Vec::new();
        let (mut open, mut high, mut low, mut close, mut volume) =
            (Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for (s, name) in symbols.iter().enumerate() {
            for i in 0..count {
                let c = 100.0 + 5.0 * ((i + s) as f64 * 0.3).sin() + i as f64 * 0.05;
                symbol.push(*name);
                timestamp.push(1_700_000_000 + 86_400 * i as i64);
                open.push(c - 0.4);
                high.push(c + 1.0);
                low.push(c - 1.2);
                close.push(c);
                volume.push(1_000.0 + 100.0 * (i % 7) as f64);
            }
        }
        df![
            "symbol" => symbol,
            "timestamp" => timestamp,
            "open" => open,
            "high" => high,
            "low" => low,
            "close" => close,
            "volume" => volume,
        ]
        .unwrap()
    }

    fn request(family: FactorFamily, rolling: Option<usize>) -> ComputeRequest {
        ComputeRequest {
            family,
            strategy: NanStrategy::FillZero,
            rolling,
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = registry(None).unwrap();
        assert_eq!(registry.len(), 3);
        for info in registry.all_info() {
            assert!(!info.description.is_empty());
            assert!(info.factor_count > 0);
            assert!(info.min_bars > 0);
        }
    }

    #[test]
    fn test_cli_parses_compute() {
        let cli = Cli::try_parse_from([
            "alpha-factors",
            "compute",
            "bars.csv",
            "--family",
            "alpha360",
            "--rolling",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Compute { input, family, nan_strategy, rolling, output, .. } => {
                assert_eq!(input, PathBuf::from("bars.csv"));
                assert_eq!(family.parse::<FactorFamily>().unwrap(), FactorFamily::Alpha360);
                assert_eq!(nan_strategy.parse::<NanStrategy>().unwrap(), NanStrategy::Keep);
                assert_eq!(rolling, Some(5));
                assert!(output.is_none());
            }
            _ => panic!("expected compute"),
        }
    }

    #[test]
    fn test_compute_latest_per_symbol() {
        let registry = registry(None).unwrap();
        let mut out = Vec::new();
        let frame = bar_frame(&["MSFT", "AAPL"], 80);
        run_compute(&registry, &frame, &request(FactorFamily::Alpha158, None), &mut out).unwrap();

        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("symbol,timestamp,KMID,"));
        assert!(lines[1].starts_with("AAPL,"));
        assert!(lines[2].starts_with("MSFT,"));
    }

    #[test]
    fn test_compute_rolling() {
        let registry = registry(None).unwrap();
        let mut out = Vec::new();
        let frame = bar_frame(&["AAPL"], 70);
        run_compute(&registry, &frame, &request(FactorFamily::Alpha360, Some(5)), &mut out).unwrap();

        // samples at bars 60 and 65 and 70
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_short_symbols_are_skipped() {
        let registry = registry(None).unwrap();
        let mut out = Vec::new();
        let frame = bar_frame(&["AAPL"], 20);
        run_compute(&registry, &frame, &request(FactorFamily::Alpha101, None), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
