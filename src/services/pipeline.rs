use crate::config::Config;
use crate::errors::{EtlError, Result};
use crate::models::stock::EnrichedRecord;
use crate::services::aggregate;
use crate::sources::base::TimeSeriesSource;
use crate::storage::ObjectStore;
use crate::util::{csv_utils, ReportWindow};
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

/// Rows collected for one reporting week, before serialization
#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub window: ReportWindow,
    pub rows: Vec<EnrichedRecord>,
    /// Rows kept per symbol, in processing order
    pub symbol_counts: Vec<(String, usize)>,
    pub skipped_rows: usize,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub key: String,
    pub location: String,
    pub rows: usize,
    pub bytes: usize,
    pub symbol_counts: Vec<(String, usize)>,
    pub skipped_rows: usize,
}

/// Fetches every configured symbol, builds the weekly table and uploads it.
pub struct WeeklyPipeline {
    config: Config,
    source: Arc<dyn TimeSeriesSource + Send + Sync>,
    store: Arc<dyn ObjectStore + Send + Sync>,
}

impl WeeklyPipeline {
    /// Pipeline over the given provider and report sink.
    pub fn new(
        config: Config,
        source: Arc<dyn TimeSeriesSource + Send + Sync>,
        store: Arc<dyn ObjectStore + Send + Sync>,
    ) -> Self {
        Self {
            config,
            source,
            store,
        }
    }

    /// Fetch, filter and aggregate all symbols sequentially, in configured
    /// order. Any fetch error aborts the whole report. An all-empty result is
    /// rejected with `EtlError::EmptyResult`.
    pub async fn build_report(&self, today: NaiveDate) -> Result<WeeklyReport> {
        let window = ReportWindow::for_today(today);
        info!(
            "Building weekly report for {} ({} to {}) from {}",
            today,
            window.start,
            window.end,
            self.source.provider_name()
        );

        let mut rows = Vec::new();
        let mut symbol_counts = Vec::with_capacity(self.config.symbols.len());
        let mut skipped_rows = 0;

        for symbol in &self.config.symbols {
            let series = self.source.fetch_daily_series(symbol).await?;
            skipped_rows += series.skipped_rows;

            let enriched = aggregate::enrich_series(series, &window);
            info!("{}: {} rows inside the reporting window", symbol, enriched.len());

            symbol_counts.push((symbol.clone(), enriched.len()));
            rows.extend(enriched);
        }

        if rows.is_empty() {
            return Err(EtlError::EmptyResult {
                start: window.start.to_string(),
                end: window.end.to_string(),
            });
        }

        Ok(WeeklyReport {
            window,
            rows,
            symbol_counts,
            skipped_rows,
        })
    }

    /// Build the report, render it as CSV and upload it under the week's key.
    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary> {
        let report = self.build_report(today).await?;
        let key = report.window.object_key();
        let body = csv_utils::write_report_csv(&report.rows)?;
        let bytes = body.len();

        info!("Uploading {} rows to {} as {}", report.rows.len(), self.store.location(), key);
        self.store.put_object(&key, body).await?;

        Ok(RunSummary {
            key,
            location: self.store.location(),
            rows: report.rows.len(),
            bytes,
            symbol_counts: report.symbol_counts,
            skipped_rows: report.skipped_rows,
        })
    }
}
