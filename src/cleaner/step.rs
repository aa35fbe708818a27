//! The fit/transform contract shared by every cleaning step.

use std::fmt;

use polars::prelude::*;

use crate::error::Result;

/// Identifies a step without downcasting the trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Duplicate,
    Constant,
    Mean,
    Median,
    Mode,
    TypeCast,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate cleaner",
            Self::Constant => "constant cleaner",
            Self::Mean => "mean cleaner",
            Self::Median => "median cleaner",
            Self::Mode => "mode cleaner",
            Self::TypeCast => "type caster",
        }
    }

    /// Whether this is one of the four missing-value fill strategies.
    pub fn is_fill(self) -> bool {
        matches!(self, Self::Constant | Self::Mean | Self::Median | Self::Mode)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cleaning step.
///
/// `fit` learns whatever the step needs from a dataset and hands back the same
/// instance, so calls can be chained:
///
/// ```
/// use polars::prelude::*;
/// use tidyframe::caster::TypeCaster;
/// use tidyframe::cleaner::CleaningStep as _;
/// use tidyframe::config::CleanerConfig;
///
/// let df = df!("b" => &["1", "2", "3"])?;
/// let config = CleanerConfig::new().with("schema", serde_json::json!({ "b": "int" }));
/// let mut caster = TypeCaster::new(&config)?;
///
/// let cast = caster.fit(&df)?.transform(&df)?;
/// assert_eq!(cast.column("b")?.dtype(), &DataType::Int64);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// `transform` never mutates its input; it returns a new frame and leaves the
/// caller's frame valid and unchanged.
pub trait CleaningStep: fmt::Debug + Send + Sync {
    fn kind(&self) -> StepKind;

    /// Learn from `df` and return this step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step's configuration does not match `df`.
    fn fit(&mut self, df: &DataFrame) -> Result<&mut dyn CleaningStep>;

    /// Produce a cleaned copy of `df`.
    ///
    /// # Errors
    ///
    /// Returns an error if the step cannot be applied; no partial result is
    /// returned in that case.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;

    /// `fit` followed by `transform` on the same frame.
    ///
    /// # Errors
    ///
    /// Propagates the first error from either call.
    fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?.transform(df)
    }
}
