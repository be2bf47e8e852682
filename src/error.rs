use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarteraError {
    #[error("Config directory not found at {0}. Run 'cartera init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Row source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to parse rows from {source_name}: {source}")]
    PayloadParse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected payload from {0}. Expected a JSON array or {{\"data\": [...]}}.")]
    BadPayload(String),

    #[error("Failed to fetch rows from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid delimiter '{0}'. Must be a single character (e.g., ',' or ';').")]
    InvalidDelimiter(String),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to build workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CarteraError>;
