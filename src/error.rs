use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ToolError {
    #[error("Invalid grid: {0}")]
    #[diagnostic(code(playtime::board::invalid_grid))]
    InvalidGrid(String),
    #[error("Square ({col}, {row}) is outside the board")]
    #[diagnostic(code(playtime::board::out_of_bounds))]
    OutOfBounds { col: usize, row: usize },
    #[error("No game in progress")]
    #[diagnostic(
        code(playtime::session::not_playing),
        help("start a new game first")
    )]
    NotPlaying,
    #[error("Unknown classification: {0}")]
    #[diagnostic(
        code(playtime::accrual::unknown_classification),
        help("expected `staff` or `physician`")
    )]
    UnknownClassification(String),
    #[error("Pay periods starting {0} run past the last supported date")]
    #[diagnostic(code(playtime::pto::date_out_of_range))]
    DateOutOfRange(chrono::NaiveDate),
    #[error("Corrupt snapshot: {0}")]
    #[diagnostic(code(playtime::snapshot::corrupt))]
    CorruptSnapshot(String),
    #[error("Unsupported snapshot version {0}")]
    #[diagnostic(code(playtime::snapshot::version))]
    UnsupportedVersion(u32),
    #[error("CSV error: {0}")]
    #[diagnostic(code(playtime::csv))]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    #[diagnostic(code(playtime::io))]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    #[diagnostic(code(playtime::json))]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    #[diagnostic(code(playtime::storage))]
    StorageError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;
