//! Command-line regime assessment.
//!
//! # Usage
//!
//! ```bash
//! # Latest regime and delta bands for one instrument
//! condor-regime assess --instrument SPY --proxy VIX --data-dir data
//!
//! # Regime on every bar, with time spent per profile
//! condor-regime history --instrument NIFTY --proxy INDIAVIX --tail 20
//!
//! # Every instrument in the data directory
//! condor-regime batch --proxy VIX --json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use condor_regime::{
    assess_many, classify_history, compute, Assessment, DataLoader, EngineConfig, EngineResult,
    InstrumentData, VolatilityProxySeries,
};

const SEPARATOR: &str = "============================================================";

/// Indicator and regime engine CLI.
#[derive(Parser)]
#[command(name = "condor-regime")]
#[command(about = "Market regime classification and iron condor delta bands")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of `{instrument}.csv` files
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess the latest bar of one instrument
    Assess {
        /// Instrument file name without extension
        #[arg(short, long)]
        instrument: String,

        /// Volatility index file name (e.g. VIX, INDIAVIX)
        #[arg(short, long)]
        proxy: Option<String>,
    },

    /// Classify every bar of one instrument
    History {
        #[arg(short, long)]
        instrument: String,

        #[arg(short, long)]
        proxy: Option<String>,

        /// Only print the last N bars
        #[arg(long)]
        tail: Option<usize>,
    },

    /// Assess many instruments in parallel
    Batch {
        /// Comma-separated instruments; defaults to every file in the data directory
        #[arg(long)]
        instruments: Option<String>,

        #[arg(short, long)]
        proxy: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("condor_regime=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let loader = DataLoader::new(&cli.data_dir);

    match cli.command {
        Commands::Assess { instrument, proxy } => {
            let bars = loader
                .load_bars(&instrument)
                .with_context(|| format!("Failed to load bars for {}", instrument))?;
            let proxy = load_proxy(&loader, proxy.as_deref())?;

            let assessment = compute(&bars, proxy.as_ref(), &config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print_assessment(&assessment);
            }
        }
        Commands::History {
            instrument,
            proxy,
            tail,
        } => {
            let bars = loader
                .load_bars(&instrument)
                .with_context(|| format!("Failed to load bars for {}", instrument))?;
            let proxy = load_proxy(&loader, proxy.as_deref())?;

            let mut history = classify_history(&bars, proxy.as_ref(), &config)?;
            let stats = history.stats();
            if let Some(n) = tail {
                let skip = history.entries.len().saturating_sub(n);
                history.entries = history.entries.split_off(skip);
            }

            if cli.json {
                let output = serde_json::json!({
                    "history": history,
                    "stats": stats.values().collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            println!("{}", SEPARATOR);
            println!("Regime history: {}", history.instrument);
            println!("{}", SEPARATOR);
            for entry in &history.entries {
                println!(
                    "{}  {:<13} {:<9} {:<7} adx {:>6}  rv {:>6}",
                    entry.date,
                    format!("{:?}", entry.profile),
                    format!("{:?}", entry.regime.trend_strength),
                    format!("{:?}", entry.regime.trend_direction),
                    fmt_opt(entry.adx, 1),
                    fmt_pct(entry.realized_vol),
                );
            }

            let mut stats: Vec<_> = stats.into_values().collect();
            stats.sort_by(|a, b| b.days.cmp(&a.days));
            println!("\n{:<13} {:>6} {:>8} {:>8} {:>8}", "Profile", "Days", "Share", "Avg ADX", "Avg RV");
            for stat in &stats {
                println!(
                    "{:<13} {:>6} {:>7.1}% {:>8} {:>8}",
                    format!("{:?}", stat.profile),
                    stat.days,
                    stat.pct_of_total,
                    fmt_opt(stat.avg_adx, 1),
                    fmt_pct(stat.avg_realized_vol),
                );
            }
            println!("{}", SEPARATOR);
        }
        Commands::Batch { instruments, proxy } => {
            let names: Vec<String> = match instruments {
                Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
                None => loader
                    .available_instruments()?
                    .into_iter()
                    .filter(|name| Some(name.as_str()) != proxy.as_deref())
                    .collect(),
            };
            let proxy = load_proxy(&loader, proxy.as_deref())?;

            let mut inputs = Vec::with_capacity(names.len());
            for name in &names {
                let bars = loader
                    .load_bars(name)
                    .with_context(|| format!("Failed to load bars for {}", name))?;
                inputs.push(InstrumentData::new(bars, proxy.clone()));
            }

            let results = assess_many(&inputs, &config);
            if cli.json {
                let output = batch_json(&results, &names)?;
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            for (result, name) in results.iter().zip(&names) {
                match result {
                    Ok(assessment) => print_assessment(assessment),
                    Err(e) => println!("{}: {}", name, e),
                }
            }
        }
    }

    Ok(())
}

/// One JSON object per instrument: the assessment, or its error message.
fn batch_json(
    results: &[EngineResult<Assessment>],
    names: &[String],
) -> serde_json::Result<Vec<serde_json::Value>> {
    results
        .iter()
        .zip(names)
        .map(|(result, name)| match result {
            Ok(assessment) => serde_json::to_value(assessment),
            Err(e) => Ok(serde_json::json!({ "instrument": name, "error": e.to_string() })),
        })
        .collect()
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_proxy(loader: &DataLoader, name: Option<&str>) -> Result<Option<VolatilityProxySeries>> {
    name.map(|name| {
        loader
            .load_proxy(name)
            .with_context(|| format!("Failed to load volatility proxy {}", name))
    })
    .transpose()
}

fn print_assessment(assessment: &Assessment) {
    let s = &assessment.snapshot;

    println!("{}", SEPARATOR);
    println!("{} as of {}", assessment.instrument, s.date);
    println!("{}", SEPARATOR);
    println!("  Close:          {:.2}", s.close);
    println!("  MA short/med/long: {} / {} / {}", fmt_opt(s.ma_short, 2), fmt_opt(s.ma_medium, 2), fmt_opt(s.ma_long, 2));
    println!("  MA slope:       {}", fmt_opt(s.ma_slope, 4));
    println!("  Dist from MA:   {}%", fmt_opt(s.ma_distance_pct, 2));
    println!("  RV short/long:  {} / {}", fmt_pct(s.rv_short), fmt_pct(s.rv_long));
    println!("  ATR:            {} ({}%)", fmt_opt(s.atr, 2), fmt_opt(s.atr_pct, 2));
    println!("  ADX (+DI/-DI):  {} ({} / {})", fmt_opt(s.adx, 1), fmt_opt(s.plus_di, 1), fmt_opt(s.minus_di, 1));
    println!("  IV proxy:       {}", fmt_pct(s.iv_proxy));
    println!("  IV - RV:        {}", fmt_pct(s.iv_minus_rv));

    println!("\n{}", assessment.regime.summary());
    println!("\nDelta bands: {}", assessment.recommendation.summary());

    if !assessment.events.is_empty() {
        println!("\nData quality:");
        for event in &assessment.events {
            println!("  - {}", event.description());
        }
    }
    println!("{}", SEPARATOR);
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condor_regime::{Bar, BarSeries, EngineError};
    use chrono::NaiveDate;

    #[test]
    fn test_batch_json_keeps_assessments_and_errors() {
        let bars = (0..30)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i);
                let close = 100.0 + i as f64;
                Bar::new(date, close, close + 0.5, close - 0.5, close).unwrap()
            })
            .collect();
        let series = BarSeries::new("SPY", bars).unwrap();
        let assessment = compute(&series, None, &EngineConfig::default()).unwrap();

        let results = vec![
            Ok(assessment),
            Err(EngineError::EmptySeries {
                instrument: "EMPTY".to_string(),
            }),
        ];
        let names = vec!["SPY".to_string(), "EMPTY".to_string()];

        let output = batch_json(&results, &names).unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(output[0]["instrument"], "SPY");
        assert!(output[0]["regime"].is_object());
        assert_eq!(output[1]["instrument"], "EMPTY");
        assert_eq!(output[1]["error"], "No bars for EMPTY");
    }
}
