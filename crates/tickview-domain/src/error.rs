use thiserror::Error;

/// Every failure the chart pipeline can surface.
///
/// Adapters attach file context to the message; callers at the CLI boundary
/// render it with `Display` and exit.
#[derive(Debug, Error)]
pub enum ChartDataError {
    #[error("data not found for ({date}, {symbol}, {what})")]
    DataNotFound {
        date: String,
        symbol: String,
        what: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    #[error("malformed tick at line {line}: {reason}")]
    MalformedTick { line: usize, reason: String },

    #[error("unsupported sampling period: {0}s (not in alignment table)")]
    UnsupportedPeriod(i64),

    #[error("invalid sampling period: {0}s (must be > 0 and at most one year)")]
    InvalidPeriod(i64),

    #[error("timestamp {at} shifted by {offset_seconds}s is outside the supported date range")]
    TimeOutOfRange {
        at: chrono::NaiveDateTime,
        offset_seconds: i64,
    },

    #[error("bar series {symbol} is not strictly increasing at index {index}")]
    NonIncreasing { symbol: String, index: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

impl ChartDataError {
    pub fn not_found(date: &str, symbol: &str, what: impl Into<String>) -> Self {
        Self::DataNotFound {
            date: date.to_string(),
            symbol: symbol.to_string(),
            what: what.into(),
        }
    }

    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
