use chrono::Utc;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod ai;
mod config;
mod report;
mod sentiment;
mod stock;

use ai::{AiBackend, WaveSpeedBackend};
use config::SentimentConfig;
use report::{format_analysis, format_summary};
use stock::{JsonFileNewsSource, SentimentService, StockAnalysis, summarize};

const DEMO_STOCKS: &[&str] = &["AAPL", "NVDA", "MSFT"];

/// Stock Sentiment Analysis System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Analyze a single stock (e.g., AAPL)
    #[arg(short, long)]
    ticker: Option<String>,

    /// Analyze all configured tech stocks
    #[arg(short, long, conflicts_with = "ticker")]
    all: bool,

    /// Number of news articles per stock
    #[arg(short, long, default_value_t = 20)]
    news_limit: usize,

    /// JSON file with the articles to analyze
    #[arg(long, env = "NEWS_FILE", default_value = "demos/news.json")]
    news_file: PathBuf,

    /// Print results as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn print_json(analyses: &[StockAnalysis]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(analyses)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = SentimentConfig::from_env()?;
    let backend: Arc<dyn AiBackend> = Arc::new(WaveSpeedBackend::from_config(&config)?);
    let news = JsonFileNewsSource::load(&cli.news_file).await?;
    let service = SentimentService::new(&config, Box::new(news), backend);

    if let Some(ticker) = cli.ticker {
        let analysis = service.analyze_stock(&ticker, cli.news_limit).await?;
        if cli.json {
            print_json(std::slice::from_ref(&analysis))?;
        } else {
            println!("{}", format_analysis(&analysis));
        }
        return Ok(());
    }

    let tickers: Vec<String> = if cli.all {
        config.tickers.clone()
    } else {
        info!("🎬 No ticker given - running demo with {}", DEMO_STOCKS.join(", "));
        DEMO_STOCKS.iter().map(|s| s.to_string()).collect()
    };

    let analyses = service.analyze_multiple(&tickers, cli.news_limit).await;
    if cli.json {
        print_json(&analyses)?;
    } else {
        let rows = summarize(&analyses);
        println!("{}", format_summary(&rows, service.lookback_days(), Utc::now()));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();
    info!("Starting stock sentiment analysis...");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
