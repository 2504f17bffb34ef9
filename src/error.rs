use thiserror::Error;

/// Failures of the solar position / efficiency pipeline.
///
/// Every variant is terminal for the observation being computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolarError {
    /// Day-of-year or UTC offset outside the formula's validity domain.
    #[error("{0}")]
    Range(&'static str),

    /// The daylight-saving table has no entry for the requested year.
    #[error("no daylight-saving entry for year {0}")]
    Configuration(i32),

    /// The timestamp string could not be read as a calendar date-time.
    #[error("invalid timestamp '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl SolarError {
    pub const DATE_OUT_OF_RANGE: SolarError = SolarError::Range("date out of range");
    pub const UTC_OUT_OF_RANGE: SolarError = SolarError::Range("UTC out of range");

    pub fn parse(input: &str, reason: impl ToString) -> Self {
        SolarError::Parse {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failures talking to the remote monitoring service.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("telemetry is not configured (missing site id or api key)")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("monitoring service answered {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("unreadable sample timestamp '{0}'")]
    InvalidSample(String),
}

/// Failures loading `config.json`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
