use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by callers to decide how far an error
/// propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The selection or the environment does not describe a loadable dataset.
    Configuration,
    /// A cell in the source table could not be interpreted.
    Parse,
    /// An aggregate was requested over zero rows or zero values.
    EmptyResult,
    /// The source file could not be read.
    Io,
    /// Analyst input fell outside the expected enumeration.
    InvalidChoice,
}

/// All errors produced by the bikeshare crates.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// No data file is configured for the requested city.
    #[error("Configuration error: no data file configured for city {0}")]
    UnknownCity(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source table lacks a column every trip file must carry.
    #[error("Configuration error: {path} has no \"{column}\" column")]
    MissingColumn { path: String, column: String },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A timestamp cell did not match any recognised format.
    #[error("Invalid timestamp in row {row}, column \"{column}\": {value:?}")]
    TimestampParse {
        row: usize,
        column: String,
        value: String,
    },

    /// A numeric cell could not be parsed.
    #[error("Invalid number in row {row}, column \"{column}\": {value:?}")]
    NumberParse {
        row: usize,
        column: String,
        value: String,
    },

    /// The CSV layer rejected the file (ragged rows, bad quoting, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A statistic was requested over an empty selection.
    #[error("No data available for {0}")]
    EmptyResult(String),

    /// Analyst input did not match any allowed value.
    #[error("Invalid {field} {value:?}; expected one of: {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BikeshareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCity(_) | Self::Config(_) | Self::MissingColumn { .. } => {
                ErrorKind::Configuration
            }
            Self::JsonParse(_) => ErrorKind::Configuration,
            Self::TimestampParse { .. } | Self::NumberParse { .. } | Self::Csv(_) => {
                ErrorKind::Parse
            }
            Self::EmptyResult(_) => ErrorKind::EmptyResult,
            Self::FileRead { .. } | Self::Io(_) => ErrorKind::Io,
            Self::InvalidChoice { .. } => ErrorKind::InvalidChoice,
        }
    }

    /// Shorthand for building an [`BikeshareError::EmptyResult`].
    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptyResult(what.into())
    }
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_city() {
        let err = BikeshareError::UnknownCity("boston".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: no data file configured for city boston"
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = BikeshareError::FileRead {
            path: PathBuf::from("/data/chicago.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/chicago.csv"));
        assert!(msg.contains("no such file"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = BikeshareError::TimestampParse {
            row: 3,
            column: "Start Time".to_string(),
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp in row 3, column \"Start Time\": \"yesterday\""
        );
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = BikeshareError::MissingColumn {
            path: "washington.csv".to_string(),
            column: "User Type".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration error: washington.csv has no \"User Type\" column"
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_error_display_empty_result() {
        let err = BikeshareError::empty("most common month");
        assert_eq!(err.to_string(), "No data available for most common month");
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn test_error_display_invalid_choice() {
        let err = BikeshareError::InvalidChoice {
            field: "month",
            value: "july".to_string(),
            expected: "january, february".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid month \"july\"; expected one of: january, february"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidChoice);
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BikeshareError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: BikeshareError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
