use crate::errors::{EtlError, Result};
use chrono_tz::Tz;
use std::time::Duration;

pub const DEFAULT_SYMBOLS: [&str; 4] = ["net", "twlo", "pypl", "wise.lon"];
pub const DEFAULT_API_BASE_URL: &str = "https://www.alphavantage.co";

/// Settings for one pipeline run, populated once by the hosting layer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target bucket; empty when the report is written locally.
    pub bucket_name: String,
    pub api_key: String,
    pub symbols: Vec<String>,
    pub api_base_url: String,
    pub timezone: Tz,
    /// No timeout unless set; the scheduler bounds the run.
    pub request_timeout: Option<Duration>,
    /// Minimum spacing between provider requests. Zero disables pacing.
    pub request_interval: Duration,
}

impl Config {
    /// Defaults: the four stock symbols, the public Alpha Vantage host and UTC.
    /// Credentials are left empty.
    pub fn new() -> Self {
        Self {
            bucket_name: String::new(),
            api_key: String::new(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: Tz::UTC,
            request_timeout: None,
            request_interval: Duration::ZERO,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from a variable lookup. Each setting is looked up
    /// under its lower-case name first, then its upper-case name.
    ///
    /// `api_key` is required. `bucket_name` may be absent for local runs.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&name.to_uppercase()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("api_key")
            .ok_or_else(|| EtlError::ConfigError("api_key is not set".to_string()))?;

        let mut config = Config::new().with_api_key(&api_key);

        // only S3 uploads need a bucket; `S3Store::from_env` enforces it
        if let Some(bucket) = get("bucket_name") {
            config = config.with_bucket_name(&bucket);
        }

        if let Some(symbols) = get("symbols") {
            config = config.with_symbols(parse_symbol_list(&symbols));
        }
        if let Some(url) = get("api_base_url") {
            config = config.with_api_base_url(&url);
        }
        if let Some(tz) = get("timezone") {
            config = config.with_timezone(parse_timezone(&tz)?);
        }
        if let Some(ms) = get("request_interval_ms") {
            let ms = ms.parse::<u64>().map_err(|e| {
                EtlError::ConfigError(format!("invalid request_interval_ms {}: {}", ms, e))
            })?;
            config = config.with_request_interval(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_bucket_name(mut self, bucket: &str) -> Self {
        self.bucket_name = bucket.to_string();
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Trailing slashes are dropped so `/query` can be appended.
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    /// Check the settings every run needs: an API key and at least one symbol.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(EtlError::ConfigError("api_key is not set".to_string()));
        }
        if self.symbols.is_empty() {
            return Err(EtlError::ConfigError("symbol list is empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an IANA zone name such as `America/New_York`.
pub fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|e| EtlError::ConfigError(format!("invalid timezone {}: {}", raw, e)))
}

/// Split a comma-separated symbol list, keeping order and dropping blanks.
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
