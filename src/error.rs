use thiserror::Error;

pub type FxResult<T> = Result<T, FxError>;

#[derive(Debug, Error)]
pub enum FxError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl FxError {
    #[must_use]
    pub fn malformed_row(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            reason: reason.into(),
        }
    }

    /// Stable, machine-readable code for every variant.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "FX-IO",
            Self::Csv(_) => "FX-CSV",
            Self::Json(_) => "FX-JSON",
            Self::MalformedRow { .. } => "FX-MALFORMED-ROW",
            Self::InvalidInput(_) => "FX-INVALID-INPUT",
            Self::NotFound(_) => "FX-NOT-FOUND",
        }
    }
}
