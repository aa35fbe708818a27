//! Cleaning steps and the factory that assembles them.
//!
//! # Overview
//!
//! A cleaner record names one fill strategy and, optionally, asks for
//! duplicate removal:
//!
//! - **Duplicates**: [`DuplicateCleaner`] (`remove_duplicates`)
//! - **Missing Values**: [`ConstantCleaner`], [`MeanCleaner`],
//!   [`MedianCleaner`], [`ModeCleaner`] (`type`)
//!
//! [`StepFactory::create`] turns the record into an ordered list of boxed
//! [`CleaningStep`]s, deduplication first.
//!
//! ```
//! use polars::prelude::*;
//! use tidyframe::cleaner::StepFactory;
//! use tidyframe::config::CleanerConfig;
//!
//! let config = CleanerConfig::from_json(r#"{ "type": "mean", "remove_duplicates": true }"#)?;
//! let mut df = df!("x" => &[Some(1.0), Some(1.0), None, Some(4.0)])?;
//!
//! for step in &mut StepFactory::create(&config)? {
//!     df = step.fit(&df)?.transform(&df)?;
//! }
//! assert_eq!(df.height(), 3);
//! assert_eq!(df.column("x")?.null_count(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod duplicate;
pub mod factory;
pub mod fill;
pub mod step;

pub use duplicate::DuplicateCleaner;
pub use factory::{FillStrategy, StepFactory};
pub use fill::{ConstantCleaner, FillValue, MeanCleaner, MedianCleaner, ModeCleaner};
pub use step::{CleaningStep, StepKind};
