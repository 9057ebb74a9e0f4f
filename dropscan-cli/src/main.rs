//! DropScan CLI — scan, search, universe and config commands.
//!
//! Commands:
//! - `scan`: rank every configured ticker by percentage change over the window
//! - `search`: scan, then show only the tickers matching a query
//! - `universe`: list the default NSE universe by sector
//! - `config`: print the default configuration as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use dropscan_core::data::{load_market_data, CsvDirSource, Universe};
use dropscan_core::domain::{Classification, PerformanceRecord};
use dropscan_runner::{save_report, ScanConfig, ScanReport, Scanner, SortDirection};

#[derive(Parser)]
#[command(
    name = "dropscan",
    about = "DropScan — percentage-change scanner and buy/sell classifier for NSE tickers"
)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the universe and print ranked tables.
    Scan {
        /// Directory holding one `<TICKER>.csv` file per ticker.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Path to a TOML config file. Defaults to the built-in config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured top-N slice size.
        #[arg(long)]
        top: Option<usize>,

        /// Tickers to scan instead of the configured universe.
        #[arg(long, num_args = 1..)]
        tickers: Vec<String>,

        /// Save report.json, records.csv and skipped.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Scan, then show only tickers whose symbol contains the query.
    Search {
        /// Case-insensitive substring, e.g. "bank".
        query: String,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the default ticker universe by sector.
    Universe {
        /// Only show this sector.
        #[arg(long)]
        sector: Option<String>,

        /// Print as TOML instead of a listing.
        #[arg(long, default_value_t = false)]
        toml: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("dropscan"), level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Scan {
            data_dir,
            config,
            top,
            tickers,
            output_dir,
        } => run_scan(&data_dir, config.as_deref(), top, tickers, output_dir.as_deref()),
        Commands::Search {
            query,
            data_dir,
            config,
        } => run_search(&query, &data_dir, config.as_deref()),
        Commands::Universe { sector, toml } => run_universe(sector.as_deref(), toml),
        Commands::Config => {
            print!("{}", ScanConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, top: Option<usize>) -> Result<ScanConfig> {
    let mut config = match path {
        Some(p) => ScanConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display()))?,
        None => ScanConfig::default(),
    };
    if let Some(n) = top {
        config.ranking.top_n = n;
        config.validate()?;
    }
    Ok(config)
}

fn scan_dir(config: ScanConfig, data_dir: &Path, tickers: &[String]) -> Result<ScanReport> {
    if !data_dir.is_dir() {
        anyhow::bail!("data directory does not exist: {}", data_dir.display());
    }
    let source = CsvDirSource::new(data_dir);
    let scanner = Scanner::new(config)?;

    let wanted: &[String] = if tickers.is_empty() {
        &scanner.config().universe.tickers
    } else {
        tickers
    };
    let refs: Vec<&str> = wanted.iter().map(|s| s.as_str()).collect();
    let data = load_market_data(&source, &refs);

    Ok(scanner.scan_tickers(refs.as_slice(), &data))
}

fn run_scan(
    data_dir: &Path,
    config_path: Option<&Path>,
    top: Option<usize>,
    tickers: Vec<String>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, top)?;
    let report = scan_dir(config, data_dir, &tickers)?;

    print_summary(&report);

    println!("--- All Tickers ({}) ---", direction_label(report.direction));
    print_table(&report.table(report.direction));

    println!("--- Buy Recommendations ---");
    print_table(&report.buy_recommendations());

    println!("--- Top {} Gainers ---", report.top_n);
    print_table(&report.gainers());

    println!("--- Top {} Losers ---", report.top_n);
    print_table(&report.losers());

    print_buckets(&report);
    print_diagnostics(&report);
    print_skipped(&report);

    if let Some(dir) = output_dir {
        let run_dir = save_report(&report, dir)?;
        println!("Report saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_search(query: &str, data_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, None)?;
    let report = scan_dir(config, data_dir, &[])?;

    let hits = report.search(query);
    if hits.is_empty() {
        println!("No ranked tickers match '{query}'.");
        return Ok(());
    }
    println!("--- Matches for '{query}' ({}) ---", hits.len());
    print_table(&hits);
    Ok(())
}

fn run_universe(sector: Option<&str>, as_toml: bool) -> Result<()> {
    let universe = Universe::nse_default();
    if as_toml {
        print!("{}", universe.to_toml().map_err(anyhow::Error::msg)?);
        return Ok(());
    }
    let names: Vec<&str> = match sector {
        Some(s) => {
            if universe.sector_tickers(s).is_none() {
                anyhow::bail!(
                    "unknown sector '{s}'. Valid: {}",
                    universe.sector_names().join(", ")
                );
            }
            vec![s]
        }
        None => universe.sector_names(),
    };

    for name in names {
        let tickers = universe.sector_tickers(name).unwrap_or(&[]);
        println!("{name} ({})", tickers.len());
        for t in tickers {
            println!("  {t}");
        }
    }
    println!();
    println!("Total: {} tickers", universe.ticker_count());
    Ok(())
}

fn direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    }
}

fn print_summary(report: &ScanReport) {
    println!();
    println!("=== Scan Result ===");
    println!("Config:         {}", &report.config_id[..12.min(report.config_id.len())]);
    println!("Tickers:        {}", report.total_tickers());
    println!("Ranked:         {}", report.records().len());
    println!("Skipped:        {}", report.skipped().len());
    let degraded = report.records().iter().filter(|r| r.degraded).count();
    if degraded > 0 {
        println!("WARNING: {degraded} ticker(s) used the oldest bar as window start");
    }
    if let Some(latest) = report.latest_end_date() {
        println!("Latest bar:     {latest}");
        let stale = report.stale_records();
        if !stale.is_empty() {
            println!("WARNING: {} ticker(s) end before {latest}:", stale.len());
            for r in stale {
                println!("  {:<16} last bar {}", r.ticker, r.end_date);
            }
        }
    }
    println!();
}

fn print_table(rows: &[&PerformanceRecord]) {
    if rows.is_empty() {
        println!("(none)");
        println!();
        return;
    }
    println!(
        "{:<16} {:>12} {:>12} {:>10} {:>9}  {:<12}",
        "Ticker", "Start", "End", "Change", "Change %", "Signal"
    );
    println!("{}", "-".repeat(76));
    for r in rows {
        println!(
            "{:<16} {:>12.2} {:>12.2} {:>10.2} {:>8.2}%  {:<12}",
            r.ticker,
            r.display_start_price(),
            r.display_end_price(),
            r.display_change(),
            r.display_percent_change(),
            r.classification.label()
        );
    }
    println!();
}

fn print_buckets(report: &ScanReport) {
    println!("--- Classification ---");
    for (label, members) in report.buckets() {
        // ThreeWay mode never fills the strong buckets
        if members.is_empty()
            && matches!(label, Classification::StrongBuy | Classification::StrongSell)
        {
            continue;
        }
        let names: Vec<&str> = members.iter().map(|r| r.ticker.as_str()).collect();
        println!("{:<12} {:>3}  {}", label.label(), members.len(), names.join(" "));
    }
    println!();
}

fn print_diagnostics(report: &ScanReport) {
    let flagged: Vec<_> = report
        .diagnostics()
        .iter()
        .filter(|(_, d)| d.rising || d.volatile || d.missing_closes > 0)
        .collect();
    if flagged.is_empty() {
        return;
    }
    println!("--- Diagnostics ---");
    println!(
        "{:<16} {:>6} {:>8} {:>7} {:>9} {:>9}",
        "Ticker", "Bars", "Missing", "Rising", "Std Dev", "Volatile"
    );
    println!("{}", "-".repeat(60));
    for (ticker, d) in flagged {
        let std_dev = d
            .std_dev
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<16} {:>6} {:>8} {:>7} {:>9} {:>9}",
            ticker,
            d.bars_in_window,
            d.missing_closes,
            if d.rising { "yes" } else { "no" },
            std_dev,
            if d.volatile { "yes" } else { "no" }
        );
    }
    println!();
}

fn print_skipped(report: &ScanReport) {
    if report.skipped().is_empty() {
        return;
    }
    println!("--- Skipped ({}) ---", report.skipped().len());
    for s in report.skipped() {
        println!("  {:<16} {}", s.ticker, s.reason());
    }
    println!();
}
