use polars::prelude::*;

use super::step::{CleaningStep, StepKind};
use crate::config::CleanerConfig;
use crate::error::Result;

/// Drops fully duplicated rows, keeping the first occurrence in its original
/// position.
#[derive(Debug, Clone, Default)]
pub struct DuplicateCleaner;

impl DuplicateCleaner {
    /// The record is accepted for symmetry with the other cleaners; no key is
    /// read from it.
    pub fn new(_config: &CleanerConfig) -> Self {
        Self
    }
}

impl CleaningStep for DuplicateCleaner {
    fn kind(&self) -> StepKind {
        StepKind::Duplicate
    }

    fn fit(&mut self, _df: &DataFrame) -> Result<&mut dyn CleaningStep> {
        Ok(self)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let deduped = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;

        tracing::debug!(
            rows_before = df.height(),
            rows_after = deduped.height(),
            "Removed duplicate rows"
        );

        Ok(deduped)
    }
}
