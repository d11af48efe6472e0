use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    /// Every configured symbol came back with zero rows inside the window.
    #[error("Report is empty: no rows between {start} and {end} for any symbol")]
    EmptyResult { start: String, end: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for EtlError {
    fn from(e: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        EtlError::IoError(e.into_error())
    }
}
