use chrono::NaiveDate;

/// One trading day as returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume; some listings report fractional shares.
    pub volume: f64,
}

/// Parsed provider response for a single symbol
#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    pub symbol: String,
    /// (position in the parsed series, record)
    pub records: Vec<(usize, DailyRecord)>,
    pub skipped_rows: usize,
}

/// Weekly close/volume statistics, broadcast onto every row of a symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyStats {
    pub avg_weekly_close: f64,
    pub median_weekly_close: f64,
    pub min_weekly_close: f64,
    pub max_weekly_close: f64,
    pub avg_weekly_volume: f64,
    pub median_weekly_volume: f64,
    pub min_weekly_volume: f64,
    pub max_weekly_volume: f64,
}

/// Output row: raw record, its symbol and the symbol's weekly stats.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub index: usize,
    pub symbol: String,
    pub record: DailyRecord,
    pub stats: WeeklyStats,
}
