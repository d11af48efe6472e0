use weekly_stock_etl::config::{parse_symbol_list, parse_timezone, Config};
use weekly_stock_etl::sources::alpha_vantage::AlphaVantageSource;
use weekly_stock_etl::sources::base::TimeSeriesSource;
use weekly_stock_etl::storage::{LocalStore, ObjectStore, S3Store};
use weekly_stock_etl::services::pipeline::WeeklyPipeline;
use weekly_stock_etl::util::{self, ReportWindow};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Arg, Command};
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let date_arg = || {
        Arg::new("date")
            .short('d')
            .long("date")
            .value_name("DATE")
            .help("Run as if today were DATE (YYYY-MM-DD); defaults to today in the configured timezone")
            .takes_value(true)
    };

    let matches = Command::new("weekly_stock_etl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Weekly stock statistics ETL")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Fetch last week's daily data, aggregate it and upload the report")
                .arg(date_arg())
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .value_name("DIR")
                        .help("Write the report under DIR instead of uploading to the bucket")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("symbols")
                        .short('s')
                        .long("symbols")
                        .value_name("SYMBOLS")
                        .help("Comma-separated symbols overriding the configured list")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("window")
                .about("Print the reporting window and output key")
                .arg(date_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("run", sub)) => {
            let mut config = Config::from_env().context("failed to load configuration")?;
            if let Some(symbols) = sub.value_of("symbols") {
                config = config.with_symbols(parse_symbol_list(symbols));
                config.validate()?;
            }

            let today = resolve_date(sub.value_of("date"), &config)?;

            let source: Arc<dyn TimeSeriesSource + Send + Sync> =
                Arc::new(AlphaVantageSource::new(&config)?);
            let store: Arc<dyn ObjectStore + Send + Sync> = match sub.value_of("output-dir") {
                Some(dir) => Arc::new(LocalStore::new(dir)),
                None => Arc::new(S3Store::from_env(&config.bucket_name).await?),
            };

            let pipeline = WeeklyPipeline::new(config, source, store);
            let summary = pipeline
                .run(today)
                .await
                .with_context(|| format!("weekly run for {} failed", today))?;

            info!(
                "Stored {} rows ({} bytes) at {}/{}",
                summary.rows, summary.bytes, summary.location, summary.key
            );
            for (symbol, count) in &summary.symbol_counts {
                info!("  - {}: {} rows", symbol, count);
            }
            if summary.skipped_rows > 0 {
                info!("Skipped {} malformed rows in total", summary.skipped_rows);
            }
        }
        Some(("window", sub)) => {
            let mut config = Config::new();
            let tz = std::env::var("timezone").or_else(|_| std::env::var("TIMEZONE"));
            if let Ok(tz) = tz {
                config = config.with_timezone(parse_timezone(&tz)?);
            }
            let today = resolve_date(sub.value_of("date"), &config)?;
            let window = ReportWindow::for_today(today);
            let (year, week) = window.iso_year_week();
            println!("today:  {}", today);
            println!("window: {} .. {}", window.start, window.end);
            println!("week:   {}-W{:02}", year, week);
            println!("key:    {}", window.object_key());
        }
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}

fn resolve_date(arg: Option<&str>, config: &Config) -> anyhow::Result<NaiveDate> {
    match arg {
        Some(date) => util::parse_date(date).with_context(|| format!("invalid --date {}", date)),
        None => Ok(util::today_in(config.timezone)),
    }
}
