use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Schema mismatch in {table}: missing column '{column}'")]
    SchemaMismatch { table: &'static str, column: String },

    #[error("Invalid date '{value}' in {table}, line {line}")]
    InvalidDate {
        table: &'static str,
        line: u64,
        value: String,
    },

    #[error("Invalid number '{value}' in {table}, line {line}")]
    InvalidNumber {
        table: &'static str,
        line: u64,
        value: String,
    },

    #[error("Duplicate product name: {0}")]
    DuplicateProduct(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SalesError>;
