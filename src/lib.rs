pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod sources;
pub mod storage;
pub mod util;

pub use config::Config;
pub use errors::{EtlError, Result};
pub use models::stock::{DailyRecord, DailySeries, EnrichedRecord, WeeklyStats};
pub use services::pipeline::{RunSummary, WeeklyPipeline, WeeklyReport};
pub use sources::alpha_vantage::AlphaVantageSource;
pub use sources::base::TimeSeriesSource;
pub use storage::{LocalStore, ObjectStore, S3Store};
pub use util::ReportWindow;
