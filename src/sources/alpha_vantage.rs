use crate::config::Config;
use crate::errors::{EtlError, Result};
use crate::models::stock::{DailyRecord, DailySeries};
use crate::sources::base::TimeSeriesSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::StringRecord;
use log::{debug, info, warn};
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const EXPECTED_FIELDS: usize = 6;
/// Keys the provider uses for JSON error/throttle payloads sent with status 200.
const PAYLOAD_MESSAGE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// Daily OHLCV series from the Alpha Vantage `TIME_SERIES_DAILY` endpoint, CSV flavour
pub struct AlphaVantageSource {
    client: Client,
    base_url: String,
    api_key: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl AlphaVantageSource {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(EtlError::RequestError)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            min_interval: config.request_interval,
            last_request: Mutex::new(None),
        })
    }

    /// Build the GET request for one symbol
    pub fn build_request(&self, symbol: &str) -> Result<Request> {
        let request = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("datatype", "csv"),
                ("apikey", self.api_key.as_str()),
            ])
            .build()
            .map_err(without_url)?;
        Ok(request)
    }

    fn redact(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            url.to_string()
        } else {
            url.replace(&self.api_key, "***")
        }
    }

    async fn wait_for_rate_limit(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        let should_wait = {
            let mut last = match self.last_request.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let should_wait = (*last)
                .map(|instant| instant.elapsed())
                .filter(|elapsed| *elapsed < self.min_interval)
                .map(|elapsed| self.min_interval - elapsed);
            *last = Some(now);
            should_wait
        };

        if let Some(wait_time) = should_wait {
            debug!("Waiting {:?} before next provider request", wait_time);
            tokio::time::sleep(wait_time).await;
        }
    }
}

#[async_trait]
impl TimeSeriesSource for AlphaVantageSource {
    fn provider_name(&self) -> &'static str {
        "alphavantage"
    }

    async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries> {
        self.wait_for_rate_limit().await;

        let request = self.build_request(symbol)?;
        debug!("GET {}", self.redact(request.url().as_str()));

        let response = self
            .client
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(without_url)?;
        if response.status() != StatusCode::OK {
            return Err(EtlError::ProviderError(format!(
                "unexpected status {} for symbol {}",
                response.status(),
                symbol
            )));
        }

        let body = response.text().await.map_err(without_url)?;
        let series = parse_daily_csv(symbol, &body)?;
        info!(
            "{}: fetched {} daily records for {} ({} skipped)",
            self.provider_name(),
            series.records.len(),
            symbol,
            series.skipped_rows
        );
        Ok(series)
    }
}

/// reqwest errors carry the request URL, which includes the API key.
fn without_url(e: reqwest::Error) -> EtlError {
    EtlError::RequestError(e.without_url())
}

/// Parse a `timestamp,open,high,low,close,volume` CSV body.
///
/// The first line is treated as a header and columns are read by position.
/// Rows with the wrong field count, an unparseable date or a non-numeric
/// value are skipped and counted. A JSON object body (the provider's way of
/// reporting throttling or a bad symbol) yields an empty series.
pub fn parse_daily_csv(symbol: &str, body: &str) -> Result<DailySeries> {
    let mut series = DailySeries {
        symbol: symbol.to_string(),
        ..DailySeries::default()
    };

    if let Some(message) = provider_payload_message(body) {
        warn!("Provider returned no data for {}: {}", symbol, message);
        return Ok(series);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    for row in reader.records() {
        let parsed = match row {
            Ok(record) => parse_row(&record),
            Err(e) => {
                debug!("Unreadable row for {}: {}", symbol, e);
                None
            }
        };
        match parsed {
            Some(record) => {
                let index = series.records.len();
                series.records.push((index, record));
            }
            None => series.skipped_rows += 1,
        }
    }

    if series.skipped_rows > 0 {
        warn!("Skipped {} malformed rows for {}", series.skipped_rows, symbol);
    }

    Ok(series)
}

/// Provider row, read by position
#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn parse_row(row: &StringRecord) -> Option<DailyRecord> {
    if row.len() != EXPECTED_FIELDS {
        return None;
    }

    let raw: CsvRow = row.deserialize(None).ok()?;
    let prices = [raw.open, raw.high, raw.low, raw.close];
    if !prices.iter().all(|p| p.is_finite()) {
        return None;
    }

    Some(DailyRecord {
        timestamp: NaiveDate::parse_from_str(&raw.timestamp, "%Y-%m-%d").ok()?,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: to_volume(raw.volume)?,
    })
}

fn to_volume(value: f64) -> Option<f64> {
    Some(value).filter(|v| v.is_finite() && *v >= 0.0)
}

fn provider_payload_message(body: &str) -> Option<String> {
    let trimmed = body.trim_start();
    if !trimmed.starts_with('{') {
        return None;
    }

    let json: Value = serde_json::from_str(trimmed).ok()?;
    let message = PAYLOAD_MESSAGE_KEYS
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| json.to_string());
    Some(message)
}
