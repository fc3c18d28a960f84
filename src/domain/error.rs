//! Domain error types.

/// Top-level error type for rsicross.
#[derive(Debug, thiserror::Error)]
pub enum RsicrossError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid indicator period {period} for series of {len} bars")]
    InvalidPeriod { period: usize, len: usize },

    #[error("price series is empty")]
    EmptySeries,

    #[error("price series out of order at index {index}: {reason}")]
    UnorderedSeries { index: usize, reason: String },

    #[error("insufficient data: have {have} bars, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("indicator value undefined at bar index {index}")]
    IndexOutOfRange { index: usize },

    #[error("classifier unavailable: {reason}")]
    ClassifierUnavailable { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RsicrossError> for std::process::ExitCode {
    fn from(err: &RsicrossError) -> Self {
        let code: u8 = match err {
            RsicrossError::Io(_) => 1,
            RsicrossError::ConfigParse { .. }
            | RsicrossError::ConfigMissing { .. }
            | RsicrossError::ConfigInvalid { .. } => 2,
            RsicrossError::Data { .. } => 3,
            RsicrossError::ClassifierUnavailable { .. } => 4,
            RsicrossError::InvalidPeriod { .. }
            | RsicrossError::EmptySeries
            | RsicrossError::UnorderedSeries { .. }
            | RsicrossError::InsufficientData { .. }
            | RsicrossError::IndexOutOfRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
