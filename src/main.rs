mod analysis;
mod chart;
mod config;
mod error;
mod fetcher;
mod ingest;
mod pipeline;
mod report;
mod scorer;
mod types;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::chart::ChartView;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::scorer::{SentimentScorer, VaderModel};
use crate::types::RunRequest;

#[derive(Parser, Debug)]
#[command(author, version, about = "Correlate news headline sentiment with daily stock price change")]
struct Args {
    /// Company name used as the news search query
    company: String,

    /// Ticker symbol for daily prices
    symbol: String,

    /// First day of the headline window (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the headline window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: NaiveDate,

    /// Open terminal line/scatter charts after the report
    #[arg(long)]
    chart: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg, args).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config, args: Args) -> Result<()> {
    let req = RunRequest::new(&args.company, &args.symbol, args.from, args.to)?;
    info!(
        company = %req.company,
        symbol = %req.symbol,
        "Starting run for {}..{}",
        req.from_date,
        req.to_date
    );

    let scorer = SentimentScorer::new(VaderModel::new());
    let output = pipeline::run(&cfg, &req, &scorer).await?;

    if output.aligned.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "no headline day in {}..{} matched a trading day for {}",
            req.from_date, req.to_date, req.symbol
        )));
    }

    print!("{}", report::render(&req, &output));

    if args.chart {
        if let Some(view) = ChartView::new(&req.company, &output.aligned, output.correlation.as_ref().ok()) {
            chart::show(&view)?;
        }
    }

    match output.correlation {
        Ok(result) => {
            info!(
                coefficient = result.coefficient,
                p_value = result.p_value,
                rows = result.sample_size,
                strength = %result.strength,
                significance = %result.significance,
                "Run complete"
            );
            Ok(())
        }
        Err(e) => {
            warn!("Aligned table has {} rows but correlation failed", output.aligned.len());
            Err(e)
        }
    }
}
