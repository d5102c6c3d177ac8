//! Stock Data Viewer CLI
//!
//! Search companies by name or symbol and show their price history,
//! snapshot and return/risk statistics.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! cargo run --bin stockview -- --companies data/companies.csv
//!
//! # One-shot query, JSON output
//! cargo run --bin stockview -- --query apple --select AAPL --format json
//! ```
//!
//! Set `ALPHA_VANTAGE_API_KEY` to fill in the fundamentals in the snapshot.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use stockview::dashboard::Command;
use stockview::{
    CompanyDirectory, Dashboard, DashboardConfig, DashboardError, OutputFormat, YahooProvider,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "stockview", version, about = "Terminal stock data viewer")]
struct Args {
    /// CSV file with `company,symbol` rows
    #[arg(long)]
    companies: Option<PathBuf>,

    /// First day of the history window (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the history window (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Trading days per year used to annualize statistics
    #[arg(long)]
    trading_days: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Run a single search and exit
    #[arg(long)]
    query: Option<String>,

    /// Pick one of the matches of `--query` by index, name or symbol
    #[arg(long, requires = "query")]
    select: Option<String>,
}

fn print_banner() {
    println!(
        r"
+--------------------------------------------------------------+
|                      Stock Data Viewer                       |
|                                                              |
|  Type a company name or symbol to search.                    |
|    /select <n|symbol>   - pick another match                 |
|    /range <start> <end> - change the date range              |
|    /help                - show help                          |
|    /exit                - exit                               |
+--------------------------------------------------------------+
"
    );
}

fn build_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut builder = DashboardConfig::builder().output_format(args.format);
    if let Some(path) = &args.companies {
        builder = builder.companies_path(path);
    }
    if let Some(days) = args.trading_days {
        builder = builder.trading_days_per_year(days);
    }
    Ok(builder.with_env().build()?)
}

async fn run_once(
    dashboard: &mut Dashboard,
    query: &str,
    select: Option<&str>,
) -> anyhow::Result<()> {
    let output = match select {
        Some(choice) => {
            dashboard.search(query)?;
            dashboard
                .execute_command(Command::Select {
                    choice: choice.to_string(),
                })
                .await?
        }
        None => {
            dashboard
                .execute_command(Command::Search {
                    query: query.to_string(),
                })
                .await?
        }
    };

    if let Some(output) = output {
        println!("{output}");
    }
    Ok(())
}

async fn run_repl(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("stockview> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match dashboard.process_input(input).await {
            Ok(Some(output)) => println!("{output}\n"),
            Ok(None) => {
                println!("Goodbye!");
                break;
            }
            Err(e) if e.is_recoverable() => {
                println!("{}\n", dashboard.formatter().format_error(&e));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    stockview_utils::init_tracing(stockview_utils::DEFAULT_DIRECTIVE);

    let args = Args::parse();
    let config = build_config(&args)?;

    let directory = CompanyDirectory::load(&config.companies_path).map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!("Loaded {} companies", directory.len());

    let provider = Arc::new(
        YahooProvider::new(&config).context("failed to initialize market data provider")?,
    );
    let mut dashboard = Dashboard::new(directory, provider, config);

    if args.start.is_some() || args.end.is_some() {
        let current = dashboard.range();
        let start = args.start.unwrap_or(current.start());
        let end = args.end.unwrap_or(current.end());
        dashboard.set_range(start, end)?;
    }

    let result = match args.query.as_deref() {
        Some(query) => run_once(&mut dashboard, query, args.select.as_deref()).await,
        None => run_repl(&mut dashboard).await,
    };

    match result {
        Err(e) => match e.downcast_ref::<DashboardError>() {
            // one-shot lookups report failures the same way the REPL does
            Some(dashboard_error) if dashboard_error.is_recoverable() => {
                println!("{}", dashboard.formatter().format_error(dashboard_error));
                std::process::exit(1);
            }
            _ => Err(e),
        },
        ok => ok,
    }
}
