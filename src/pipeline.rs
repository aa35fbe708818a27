//! Ordered step execution.
//!
//! A [`Pipeline`] holds boxed steps and threads a frame through them, calling
//! `fit` then `transform` on each in turn. It is a convenience over writing the
//! loop by hand; it performs no scheduling of its own.

use polars::prelude::*;

use crate::caster::TypeCaster;
use crate::cleaner::{CleaningStep, StepFactory, StepKind};
use crate::config::{CleanerConfig, KEY_SCHEMA};
use crate::error::{CleanError, Result};

#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn CleaningStep>>,
}

impl Pipeline {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(steps: Vec<Box<dyn CleaningStep>>) -> Self {
        Self { steps }
    }

    /// Factory steps for `config`, followed by a [`TypeCaster`] when the record
    /// also carries a `schema`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`StepFactory::create`] and [`TypeCaster::new`].
    pub fn from_config(config: &CleanerConfig) -> Result<Self> {
        let mut pipeline = Self::new(StepFactory::create(config)?);
        if config.contains(KEY_SCHEMA) {
            pipeline.push(Box::new(TypeCaster::new(config)?));
        }
        Ok(pipeline)
    }

    pub fn push(&mut self, step: Box<dyn CleaningStep>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|step| step.kind()).collect()
    }

    /// Fit and apply every step in order, each on the previous step's output.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::Step`] naming the first step that failed; the
    /// remaining steps are not run.
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        tracing::info!(
            steps = self.steps.len(),
            rows = df.height(),
            columns = df.width(),
            "Running cleaning pipeline"
        );

        let mut current = df.clone();
        for (index, step) in self.steps.iter_mut().enumerate() {
            let kind = step.kind();
            current = step
                .fit_transform(&current)
                .map_err(|source| CleanError::Step {
                    index,
                    kind,
                    source: Box::new(source),
                })?;

            tracing::debug!(step = index + 1, %kind, rows = current.height(), "Applied step");
        }

        Ok(current)
    }
}
