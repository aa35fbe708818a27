//! Error handling for tidyframe.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type is
//! [`CleanError`]. The variants are deliberately fine grained so callers can tell
//! a configuration mistake apart from a data problem:
//!
//! ```
//! use tidyframe::error::CleanError;
//!
//! fn describe(err: &CleanError) -> &'static str {
//!     match err {
//!         CleanError::UnsupportedCleaner(_)
//!         | CleanError::MissingKey(_)
//!         | CleanError::InvalidConfig(_)
//!         | CleanError::UnsupportedType(_) => "fix the configuration",
//!         CleanError::ColumnNotFound(_) | CleanError::NonNumericColumn { .. } => {
//!             "the dataset does not match the configuration"
//!         }
//!         _ => "the data could not be cleaned",
//!     }
//! }
//! ```
//!
//! Polars errors convert automatically through `From`, so `?` works on any
//! polars call inside a step.

use std::fmt;

use polars::error::PolarsError;

use crate::cleaner::StepKind;

/// Main error type for cleaning operations.
#[derive(Debug)]
pub enum CleanError {
    /// The `type` discriminator is missing or names no known cleaner.
    UnsupportedCleaner(String),

    /// A key required by a step is absent from the configuration record.
    MissingKey(&'static str),

    /// A configuration value has the wrong shape.
    InvalidConfig(String),

    /// A schema entry names a type descriptor we cannot cast to.
    UnsupportedType(String),

    /// A step was pointed at a column the dataset does not have.
    ColumnNotFound(String),

    /// A numeric statistic was requested for a non-numeric column.
    NonNumericColumn { column: String, strategy: StepKind },

    /// A value could not be converted to the target type.
    Cast {
        column: String,
        dtype: String,
        message: String,
    },

    /// `transform` was called before `fit` on a step that learns from data.
    NotFitted(StepKind),

    /// A step inside a [`Pipeline`](crate::pipeline::Pipeline) failed.
    Step {
        index: usize,
        kind: StepKind,
        source: Box<CleanError>,
    },

    /// Any other dataframe error.
    DataProcessing(String),
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCleaner(name) => write!(f, "Unsupported cleaner type: '{name}'"),
            Self::MissingKey(key) => write!(f, "Missing configuration key: '{key}'"),
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::UnsupportedType(name) => write!(f, "Unsupported target type: '{name}'"),
            Self::ColumnNotFound(name) => write!(f, "Column not found: '{name}'"),
            Self::NonNumericColumn { column, strategy } => {
                write!(f, "Column '{column}' is not numeric, cannot apply {strategy}")
            }
            Self::Cast {
                column,
                dtype,
                message,
            } => write!(f, "Failed to cast column '{column}' to {dtype}: {message}"),
            Self::NotFitted(kind) => write!(f, "{kind} must be fitted before transform"),
            Self::Step {
                index,
                kind,
                source,
            } => write!(f, "Step {} ({kind}) failed: {source}", index + 1),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
        }
    }
}

impl std::error::Error for CleanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Step { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<PolarsError> for CleanError {
    fn from(err: PolarsError) -> Self {
        match err {
            PolarsError::ColumnNotFound(name) => Self::ColumnNotFound(name.to_string()),
            other => Self::DataProcessing(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CleanError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(format!("JSON error: {err}"))
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;
