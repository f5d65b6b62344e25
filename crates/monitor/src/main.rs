use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::Config;
use companies::{CompanyTable, IntelligenceTier};
use news_scoring::{EventAnalyzer, NewsEvent};
use time::OffsetDateTime;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about = "Canadian mining breaking-news monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan sources, score headlines and write today's report
    Scan {
        /// Local JSON headline file; repeatable. Defaults to MINING_SOURCES_PATH
        #[arg(long = "input", short = 'i')]
        inputs: Vec<PathBuf>,
        /// Only keep headlines published in the last N hours
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=common::MAX_HOURS_BACK))]
        hours: Option<i64>,
        /// Reports directory
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Drop events scoring below this
        #[arg(long)]
        min_priority: Option<f64>,
    },
    /// Score a single piece of text
    Score {
        text: String,
        /// Source weight
        #[arg(long, default_value_t = 1.0)]
        weight: f64,
    },
    /// List the company table with its intelligence tiers
    Companies {
        /// Only show this tier (1-4)
        #[arg(long)]
        tier: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Scan {
            inputs,
            hours,
            output,
            min_priority,
        } => {
            if let Some(hours) = hours {
                config.hours_back = hours;
            }
            if let Some(output) = output {
                config.reports_dir = output;
            }
            if let Some(min_priority) = min_priority {
                config.scoring.min_priority_score = min_priority;
            }
            config.validate()?;

            info!("Canadian mining breaking-news scan starting up");
            let summary = monitor::run_scan(&config, &inputs).await?;

            println!("Total events: {}", summary.counts.total);
            println!("Critical: {}", summary.counts.critical);
            println!("High priority: {}", summary.counts.high);
            println!("Canadian relevant: {}", summary.counts.canadian_relevant);
            for scored in summary.top_events() {
                println!(
                    "[{:>5.1}] {} ({})",
                    scored.priority_score(),
                    scored.event.headline,
                    scored.assessment.event_type
                );
            }
        }
        Commands::Score { text, weight } => {
            let analyzer = EventAnalyzer::new()?;
            let event = NewsEvent::new(text, "", "", "cli", OffsetDateTime::now_utc());
            let scored = analyzer.analyze(event, weight);
            println!("{}", serde_json::to_string_pretty(&scored)?);
        }
        Commands::Companies { tier } => {
            let tier = tier
                .map(|t| IntelligenceTier::new(t).context("--tier must be between 1 and 4"))
                .transpose()?;
            let table = CompanyTable::load_or_builtin(config.companies_path.as_deref()).await?;

            for company in table.companies() {
                if tier.is_some_and(|t| company.tier() != t) {
                    continue;
                }
                let primary = company
                    .classification
                    .primary_commodity
                    .map(|c| c.display_name())
                    .unwrap_or("-");
                println!(
                    "{:<8} {:<36} {:<18} {:<8} {}",
                    company.ticker(),
                    company.name(),
                    company.classification.stage.as_str(),
                    primary,
                    company.tier()
                );
            }
        }
    }

    Ok(())
}
