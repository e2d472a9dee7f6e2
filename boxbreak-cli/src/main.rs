//! Boxbreak CLI — backtests and parameter sweeps over CSV bar files.
//!
//! Commands:
//! - `run` — execute one backtest from a TOML parameter file (or defaults)
//! - `sweep` — grid or randomized search from a TOML sweep config, with
//!   ranked report tables

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use boxbreak_core::config::ParameterSet;
use boxbreak_core::domain::{Bar, BarSeries};
use boxbreak_runner::{
    run_backtest, BacktestResult, ParamSweep, RankingMetric, SweepConfig, SweepResults,
};

#[derive(Parser)]
#[command(
    name = "boxbreak",
    about = "Boxbreak CLI — consolidation-breakout backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single backtest over a CSV bar file.
    Run {
        /// CSV file with time,open,high,low,close,volume columns.
        data: PathBuf,

        /// TOML parameter file; defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable every filter (raw breakout rule only).
        #[arg(long, default_value_t = false)]
        unfiltered: bool,

        /// Emit the full result as JSON on stdout instead of the report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a parameter sweep over a CSV bar file.
    Sweep {
        /// CSV file with time,open,high,low,close,volume columns.
        data: PathBuf,

        /// TOML sweep config with [base], [grid], and [options] tables.
        /// Without it, the reference grid is swept over default
        /// parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override how many ranked rows to print.
        #[arg(long)]
        top: Option<usize>,

        /// Run combinations sequentially instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Emit ranked results as JSON on stdout instead of the tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            data,
            config,
            unfiltered,
            json,
        } => run_cmd(&data, config.as_deref(), unfiltered, json),
        Commands::Sweep {
            data,
            config,
            top,
            sequential,
            json,
        } => sweep_cmd(&data, config.as_deref(), top, sequential, json),
    }
}

fn run_cmd(data: &Path, config: Option<&Path>, unfiltered: bool, json: bool) -> Result<()> {
    let params = match (config, unfiltered) {
        (Some(path), _) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&source)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        (None, true) => ParameterSet::unfiltered(),
        (None, false) => ParameterSet::default(),
    };

    let series = load_series(data)?;
    let result = run_backtest(&params, &series)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_run_summary(&result);
    }
    Ok(())
}

fn sweep_cmd(
    data: &Path,
    config: Option<&Path>,
    top: Option<usize>,
    sequential: bool,
    json: bool,
) -> Result<()> {
    let sweep_config = match config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SweepConfig::from_toml(&source)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SweepConfig {
            grid: boxbreak_runner::ParamGrid::default_ranges(),
            ..SweepConfig::default()
        },
    };
    let options = &sweep_config.options;
    let top_n = top.unwrap_or(options.top_n);

    let series = load_series(data)?;
    let executor = ParamSweep::new()
        .with_parallelism(options.parallel && !sequential)
        .with_min_trades(options.min_trades)
        .with_weights(options.weights);

    let results = match options.samples {
        Some(n) => {
            let configs = sweep_config
                .grid
                .sample(&sweep_config.base, n, options.seed);
            executor.run_configs(configs, &series, None, |_, _, _| {})?
        }
        None => executor.sweep(&sweep_config.grid, &sweep_config.base, &series)?,
    };

    if json {
        print_sweep_json(&results, top_n)?;
    } else {
        print_sweep_report(&results, top_n, sweep_config.grid.size(), options.min_trades);
    }
    Ok(())
}

/// Load and validate a bar series from a CSV file.
///
/// Expected columns (by header name): time, open, high, low, close,
/// volume. Timestamps accept `YYYY-MM-DD HH:MM:SS` or RFC 3339 without
/// zone (`YYYY-MM-DDTHH:MM:SS`).
fn load_series(path: &Path) -> Result<BarSeries> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .with_context(|| format!("{}: missing column '{name}'", path.display()))
    };
    let time_col = column("time")?;
    let open_col = column("open")?;
    let high_col = column("high")?;
    let low_col = column("low")?;
    let close_col = column("close")?;
    let volume_col = column("volume")?;

    let mut bars = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let row = line + 2; // 1-based, after the header line
        let number = |col: usize| -> Result<f64> {
            let raw = record.get(col).unwrap_or("").trim();
            raw.parse::<f64>()
                .with_context(|| format!("{}: row {row}: bad number '{raw}'", path.display()))
        };
        let time_raw = record.get(time_col).unwrap_or("");
        bars.push(Bar {
            time: parse_time(time_raw)
                .with_context(|| format!("{}: row {row}: bad timestamp", path.display()))?,
            open: number(open_col)?,
            high: number(high_col)?,
            low: number(low_col)?,
            close: number(close_col)?,
            volume: number(volume_col)?,
        });
    }

    BarSeries::new(bars).with_context(|| format!("validating {}", path.display()))
}

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("unrecognized timestamp '{raw}'"))
}

fn print_run_summary(result: &BacktestResult) {
    let s = &result.summary;
    println!();
    println!("=== Backtest Result ===");
    println!("Run id:         {}", &result.run_id[..16]);
    println!(
        "Bars:           {} ({} breakout candidates)",
        result.bar_count, result.candidate_signals
    );
    println!("Trades:         {}", s.total_trades);
    println!();
    println!("--- Performance ---");
    println!("Initial:        {:>12.2}", s.initial_balance);
    println!("Final:          {:>12.2}", s.final_balance);
    println!("Net Profit:     {:>12.2}", s.net_profit);
    println!("Return:         {:>11.2}%", s.return_pct);
    println!("Win Rate:       {:>11.2}%", s.win_rate);
    println!("Profit Factor:  {:>12.2}", s.profit_factor);
    println!("Avg Win:        {:>12.2}", s.avg_win);
    println!("Avg Loss:       {:>12.2}", s.avg_loss);
    println!("Largest Win:    {:>12.2}", s.largest_win);
    println!("Largest Loss:   {:>12.2}", s.largest_loss);
    println!("Max Drawdown:   {:>12.2} ({:.2}%)", s.max_drawdown, s.max_drawdown_pct);

    if !result.rejections.is_empty() {
        println!();
        println!("--- Filter Rejections ---");
        for (name, count) in &result.rejections {
            println!("{name:<16}{count:>8}");
        }
    }
    println!();
}

fn print_sweep_report(results: &SweepResults, top_n: usize, grid_size: usize, min_trades: usize) {
    println!();
    println!("=== Sweep Result ===");
    println!("Grid size:      {grid_size}");
    println!("Completed runs: {}", results.len());
    println!(
        "Ranked runs:    {} (min {min_trades} trades)",
        results.ranked().len()
    );

    let tables = [
        ("score", RankingMetric::Composite),
        ("win rate", RankingMetric::WinRate),
        ("profit factor", RankingMetric::ProfitFactor),
        ("return", RankingMetric::ReturnPct),
    ];
    for (label, metric) in tables {
        let ranked = results.ranked_by(metric);
        if ranked.is_empty() {
            continue;
        }
        println!();
        println!("--- Top {} by {label} ---", top_n.min(ranked.len()));
        println!(
            "{:<6} {:<10} {:<8} {:<8} {:<10} {:<8} {}",
            "Rank", "Score", "WR%", "Trades", "Return%", "PF", "Run id"
        );
        for (rank, result) in ranked.iter().take(top_n).enumerate() {
            let s = &result.summary;
            println!(
                "{:<6} {:<10.2} {:<8.2} {:<8} {:<10.2} {:<8.2} {}",
                rank + 1,
                results.score(result),
                s.win_rate,
                s.total_trades,
                s.return_pct,
                s.profit_factor,
                &result.run_id[..16],
            );
        }
    }

    if let Some(best) = results.best() {
        println!();
        println!("--- Best parameters ---");
        match toml::to_string(&best.params) {
            Ok(rendered) => print!("{rendered}"),
            Err(_) => println!("{:?}", best.params),
        }
    }
    println!();
}

fn print_sweep_json(results: &SweepResults, top_n: usize) -> Result<()> {
    let rows: Vec<serde_json::Value> = results
        .ranked()
        .into_iter()
        .take(top_n)
        .map(|result| {
            serde_json::json!({
                "run_id": result.run_id,
                "score": results.score(result),
                "summary": result.summary,
                "rejections": result.rejections,
                "params": result.params,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
