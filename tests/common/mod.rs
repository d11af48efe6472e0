//! Shared fixtures for the pipeline integration tests.
//!
//! `FakeSource` serves canned provider bodies per symbol through the real CSV
//! parser, and `MemoryStore` records every upload instead of touching S3.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use weekly_stock_etl::sources::alpha_vantage::parse_daily_csv;
use weekly_stock_etl::{Config, DailySeries, EtlError, ObjectStore, Result, TimeSeriesSource};

pub const HEADER: &str = "timestamp,open,high,low,close,volume";

pub enum Reply {
    Body(String),
    Fail(String),
}

#[derive(Default)]
pub struct FakeSource {
    replies: HashMap<String, Reply>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, symbol: &str, body: &str) -> Self {
        self.replies.insert(symbol.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.replies.insert(symbol.to_string(), Reply::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TimeSeriesSource for FakeSource {
    fn provider_name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries> {
        self.calls.lock().unwrap().push(symbol.to_string());
        match self.replies.get(symbol) {
            Some(Reply::Body(body)) => parse_daily_csv(symbol, body),
            Some(Reply::Fail(message)) => Err(EtlError::ProviderError(message.clone())),
            None => parse_daily_csv(symbol, HEADER),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), String::from_utf8(v.clone()).unwrap()))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn location(&self) -> String {
        "memory://test".to_string()
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(EtlError::StorageError(message.clone()));
        }
        self.objects.lock().unwrap().push((key.to_string(), body));
        Ok(())
    }
}

pub fn config(symbols: &[&str]) -> Config {
    Config::new()
        .with_bucket_name("etl-test")
        .with_api_key("demo")
        .with_symbols(symbols.iter().map(|s| s.to_string()).collect())
}

/// Ten daily rows for "net" from 2024-02-23 to 2024-03-08, most recent first.
/// With today = 2024-03-11 the window is 2024-03-04..=2024-03-09, which keeps
/// the four rows dated 03-05 through 03-08.
pub fn net_two_weeks() -> String {
    let rows = [
        "2024-03-08,80.10,82.00,79.50,84.00,3200000",
        "2024-03-07,79.00,80.50,78.75,82.00,2900000",
        "2024-03-06,78.20,79.40,77.90,80.00,3100000",
        "2024-03-05,77.00,78.00,76.50,78.00,2500000",
        "2024-03-01,76.00,77.10,75.20,70.00,2800000",
        "2024-02-29,75.50,76.80,74.90,71.00,2700000",
        "2024-02-28,75.00,76.00,74.10,72.00,2600000",
        "2024-02-27,74.20,75.30,73.80,73.00,2400000",
        "2024-02-26,73.90,74.80,73.00,74.00,2300000",
        "2024-02-23,73.00,74.00,72.50,75.00,2200000",
    ];
    format!("{}\n{}\n", HEADER, rows.join("\n"))
}
