use crate::models::stock::{DailyRecord, DailySeries, EnrichedRecord, WeeklyStats};
use crate::util::ReportWindow;

/// Keep the records whose date falls inside the window.
pub fn filter_to_window(
    records: Vec<(usize, DailyRecord)>,
    window: &ReportWindow,
) -> Vec<(usize, DailyRecord)> {
    records
        .into_iter()
        .filter(|(_, r)| window.contains(r.timestamp))
        .collect()
}

/// Mean, median, min and max of close and volume. `None` for an empty slice.
pub fn compute_weekly_stats(records: &[DailyRecord]) -> Option<WeeklyStats> {
    if records.is_empty() {
        return None;
    }

    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let volumes: Vec<f64> = records.iter().map(|r| r.volume).collect();

    Some(WeeklyStats {
        avg_weekly_close: mean(&closes),
        median_weekly_close: median(&closes),
        min_weekly_close: closes.iter().copied().fold(f64::INFINITY, f64::min),
        max_weekly_close: closes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg_weekly_volume: mean(&volumes),
        median_weekly_volume: median(&volumes),
        min_weekly_volume: volumes.iter().copied().fold(f64::INFINITY, f64::min),
        max_weekly_volume: volumes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Filter one symbol's series to the window and broadcast its weekly stats
/// onto every remaining row. Series order is preserved.
pub fn enrich_series(series: DailySeries, window: &ReportWindow) -> Vec<EnrichedRecord> {
    let DailySeries {
        symbol, records, ..
    } = series;

    let kept = filter_to_window(records, window);
    let plain: Vec<DailyRecord> = kept.iter().map(|(_, r)| r.clone()).collect();
    let stats = match compute_weekly_stats(&plain) {
        Some(stats) => stats,
        None => return Vec::new(),
    };

    kept.into_iter()
        .map(|(index, record)| EnrichedRecord {
            index,
            symbol: symbol.clone(),
            record,
            stats,
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
