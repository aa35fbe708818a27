use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::duplicate::DuplicateCleaner;
use super::fill::{ConstantCleaner, MeanCleaner, MedianCleaner, ModeCleaner};
use super::step::{CleaningStep, StepKind};
use crate::config::{CleanerConfig, KEY_REMOVE_DUPLICATES, KEY_TYPE};
use crate::error::{CleanError, Result};

/// The `type` discriminator of a cleaner record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillStrategy {
    Constant,
    Mean,
    Median,
    Mode,
}

impl FillStrategy {
    pub const ALL: [Self; 4] = [Self::Constant, Self::Mean, Self::Median, Self::Mode];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }

    pub fn kind(self) -> StepKind {
        match self {
            Self::Constant => StepKind::Constant,
            Self::Mean => StepKind::Mean,
            Self::Median => StepKind::Median,
            Self::Mode => StepKind::Mode,
        }
    }

    /// Construct the cleaner this strategy names.
    ///
    /// # Errors
    ///
    /// Propagates the cleaner's own configuration errors.
    pub fn build(self, config: &CleanerConfig) -> Result<Box<dyn CleaningStep>> {
        Ok(match self {
            Self::Constant => Box::new(ConstantCleaner::new(config)?),
            Self::Mean => Box::new(MeanCleaner::new(config)?),
            Self::Median => Box::new(MedianCleaner::new(config)?),
            Self::Mode => Box::new(ModeCleaner::new(config)?),
        })
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillStrategy {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| CleanError::UnsupportedCleaner(s.to_owned()))
    }
}

/// Builds the ordered cleaning steps described by a configuration record.
pub struct StepFactory;

impl StepFactory {
    /// Build the steps for `config`.
    ///
    /// A [`DuplicateCleaner`] comes first when `remove_duplicates` is truthy,
    /// followed by exactly one fill cleaner chosen by `type`.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::UnsupportedCleaner`] when `type` is missing or is
    /// not one of `constant`, `mean`, `median` or `mode`. Errors from the
    /// selected cleaner's constructor propagate unchanged.
    pub fn create(config: &CleanerConfig) -> Result<Vec<Box<dyn CleaningStep>>> {
        let mut steps: Vec<Box<dyn CleaningStep>> = Vec::with_capacity(2);

        if config.flag(KEY_REMOVE_DUPLICATES) {
            steps.push(Box::new(DuplicateCleaner::new(config)));
        }

        let strategy = match config.get(KEY_TYPE) {
            Some(Value::String(name)) => name.parse::<FillStrategy>()?,
            Some(other) => return Err(CleanError::UnsupportedCleaner(other.to_string())),
            None => return Err(CleanError::UnsupportedCleaner("<missing>".to_owned())),
        };
        steps.push(strategy.build(config)?);

        tracing::debug!(
            steps = ?steps.iter().map(|step| step.kind()).collect::<Vec<_>>(),
            "Built cleaning steps"
        );

        Ok(steps)
    }
}
