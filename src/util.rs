use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Days back from "today" to the first day of the reporting window. The same
/// offset selects the reporting week, so both move together.
pub const WINDOW_START_OFFSET_DAYS: i64 = 7;
/// Days back from "today" to the last day of the reporting window.
pub const WINDOW_END_OFFSET_DAYS: i64 = 2;

pub const OUTPUT_FILE_NAME: &str = "daily.csv";

/// The calendar range a run reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// [today − 7d, today − 2d].
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(WINDOW_START_OFFSET_DAYS),
            end: today - Duration::days(WINDOW_END_OFFSET_DAYS),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// ISO year and week of the window's first day.
    pub fn iso_year_week(&self) -> (i32, u32) {
        let week = self.start.iso_week();
        (week.year(), week.week())
    }

    /// Object key `{year}/{week}/daily.csv`, unpadded.
    pub fn object_key(&self) -> String {
        let (year, week) = self.iso_year_week();
        format!("{}/{}/{}", year, week, OUTPUT_FILE_NAME)
    }
}

/// Current calendar date in the given zone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(date_str: &str) -> crate::errors::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")?)
}

// CSV rendering of the weekly report
pub mod csv_utils {
    use crate::errors::Result;
    use crate::models::stock::EnrichedRecord;
    use log::info;

    pub const OUTPUT_COLUMNS: [&str; 15] = [
        "timestamp",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "symbol",
        "avg_weekly_close",
        "median_weekly_close",
        "min_weekly_close",
        "max_weekly_close",
        "avg_weekly_volume",
        "median_weekly_volume",
        "min_weekly_volume",
        "max_weekly_volume",
    ];

    /// Render rows as CSV with an unnamed leading index column.
    pub fn write_report_csv(rows: &[EnrichedRecord]) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = Vec::with_capacity(OUTPUT_COLUMNS.len() + 1);
        header.push("");
        header.extend_from_slice(&OUTPUT_COLUMNS);
        wtr.write_record(&header)?;

        for row in rows {
            let r = &row.record;
            let s = &row.stats;
            wtr.write_record([
                row.index.to_string(),
                r.timestamp.format("%Y-%m-%d").to_string(),
                r.open.to_string(),
                r.high.to_string(),
                r.low.to_string(),
                r.close.to_string(),
                r.volume.to_string(),
                row.symbol.clone(),
                s.avg_weekly_close.to_string(),
                s.median_weekly_close.to_string(),
                s.min_weekly_close.to_string(),
                s.max_weekly_close.to_string(),
                s.avg_weekly_volume.to_string(),
                s.median_weekly_volume.to_string(),
                s.min_weekly_volume.to_string(),
                s.max_weekly_volume.to_string(),
            ])?;
        }

        let bytes = wtr.into_inner()?;
        info!("Rendered {} rows ({} bytes) as CSV", rows.len(), bytes.len());
        Ok(bytes)
    }
}
