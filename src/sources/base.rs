use crate::errors::Result;
use crate::models::stock::DailySeries;
use async_trait::async_trait;

/// Base trait for daily time-series providers
#[async_trait]
pub trait TimeSeriesSource {
    /// Short provider name used in logs
    fn provider_name(&self) -> &'static str;

    /// Fetch and parse the full daily series for a symbol.
    /// Transport failures and non-success statuses are errors; unusable rows
    /// are skipped and counted in the returned series.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries>;
}
