use namecheck_core::PredictionError;

/// Errors that abort an evaluation run.
///
/// Per-record prediction failures never surface here; they are recorded in
/// the run result instead.
#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    /// Bad setup: empty dataset, no models, unsupported model.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The dataset file could not be read or parsed as CSV.
    #[error("Failed to read dataset '{path}': {source}")]
    Dataset {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A dataset row violates the `Name,Is_Valid` contract.
    #[error("Invalid dataset '{path}' at line {line}: {message}")]
    InvalidRow {
        path: String,
        line: u64,
        message: String,
    },

    /// Reading or writing a local file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be encoded.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl EvalError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn invalid_row(path: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<PredictionError> for EvalError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::Configuration(msg) => Self::Configuration(msg),
            other => Self::Configuration(other.to_string()),
        }
    }
}
