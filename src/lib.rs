//! # tidyframe - Configuration-Driven Cleaning Steps
//!
//! tidyframe turns a small configuration record into cleaning steps for polars
//! `DataFrame`s: missing-value fills (constant, mean, median, mode), duplicate
//! row removal and schema casts.
//!
//! ## Quick Start
//!
//! ```
//! use polars::prelude::*;
//! use tidyframe::config::CleanerConfig;
//! use tidyframe::pipeline::Pipeline;
//!
//! let config = CleanerConfig::from_json(
//!     r#"{
//!         "type": "constant",
//!         "value": "0",
//!         "remove_duplicates": true,
//!         "schema": { "qty": "int" }
//!     }"#,
//! )?;
//!
//! let df = df!(
//!     "sku" => &["a", "a", "b"],
//!     "qty" => &[Some("2"), Some("2"), None]
//! )?;
//!
//! let cleaned = Pipeline::from_config(&config)?.fit_transform(&df)?;
//! assert_eq!(cleaned.height(), 2);
//! assert_eq!(cleaned.column("qty")?.dtype(), &DataType::Int64);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`cleaner`]: the [`CleaningStep`](cleaner::CleaningStep) contract, the fill
//!   and duplicate cleaners, and [`StepFactory`](cleaner::StepFactory)
//! - [`caster`]: [`TypeCaster`](caster::TypeCaster), schema enforcement
//! - [`pipeline`]: run a list of steps in order
//! - [`config`]: the configuration record
//! - [`error`]: error types
//! - [`logging`]: optional `tracing` subscriber setup
//!
//! ## Copy Semantics
//!
//! Every `transform` borrows its input and returns a new frame. Polars columns
//! are reference counted, so the copy is cheap, and the caller's frame is never
//! modified.

#![warn(clippy::all, rust_2018_idioms)]

pub mod caster;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
