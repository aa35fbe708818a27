//! Schema enforcement: cast named columns to declared types.
//!
//! The record's `schema` key maps column names to type descriptors:
//!
//! | Descriptor | Polars type |
//! |---|---|
//! | `int`, `int64`, `i64`, `integer` | `Int64` |
//! | `int32`, `i32` | `Int32` |
//! | `float`, `float64`, `f64`, `double` | `Float64` |
//! | `float32`, `f32` | `Float32` |
//! | `bool`, `boolean` | `Boolean` |
//! | `str`, `string`, `object`, `text`, `utf8` | `String` |
//!
//! Casts are strict: a value that cannot be converted fails the whole
//! transform instead of turning into a null.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;

use crate::cleaner::fill::ensure_column;
use crate::cleaner::{CleaningStep, StepKind};
use crate::config::{CleanerConfig, KEY_SCHEMA};
use crate::error::{CleanError, Result};

/// A cast target understood by [`TypeCaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    Int64,
    Int32,
    Float64,
    Float32,
    Boolean,
    String,
}

impl CastType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Int32 => "int32",
            Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Boolean => "bool",
            Self::String => "str",
        }
    }

    pub fn dtype(self) -> DataType {
        match self {
            Self::Int64 => DataType::Int64,
            Self::Int32 => DataType::Int32,
            Self::Float64 => DataType::Float64,
            Self::Float32 => DataType::Float32,
            Self::Boolean => DataType::Boolean,
            Self::String => DataType::String,
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CastType {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "int" | "int64" | "i64" | "integer" => Ok(Self::Int64),
            "int32" | "i32" => Ok(Self::Int32),
            "float" | "float64" | "f64" | "double" => Ok(Self::Float64),
            "float32" | "f32" => Ok(Self::Float32),
            "bool" | "boolean" => Ok(Self::Boolean),
            "str" | "string" | "object" | "text" | "utf8" => Ok(Self::String),
            _ => Err(CleanError::UnsupportedType(s.to_owned())),
        }
    }
}

/// Casts each schema column of a dataset copy to its declared type.
#[derive(Debug, Clone)]
pub struct TypeCaster {
    schema: Vec<(String, CastType)>,
}

impl TypeCaster {
    /// Read the `schema` mapping from `config`, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::MissingKey`] without a `schema` key,
    /// [`CleanError::InvalidConfig`] if it is not an object of strings, and
    /// [`CleanError::UnsupportedType`] for an unknown descriptor.
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        let schema = config
            .require_object(KEY_SCHEMA)?
            .iter()
            .map(|(column, descriptor)| {
                let descriptor = descriptor.as_str().ok_or_else(|| {
                    CleanError::InvalidConfig(format!(
                        "type of column '{column}' must be a string, found {descriptor}"
                    ))
                })?;
                Ok((column.clone(), descriptor.parse::<CastType>()?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { schema })
    }

    pub fn schema(&self) -> &[(String, CastType)] {
        &self.schema
    }
}

impl CleaningStep for TypeCaster {
    fn kind(&self) -> StepKind {
        StepKind::TypeCast
    }

    fn fit(&mut self, _df: &DataFrame) -> Result<&mut dyn CleaningStep> {
        Ok(self)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        for (name, _) in &self.schema {
            ensure_column(df, name)?;
        }

        let mut cast = df.clone();
        for (name, target) in &self.schema {
            let column = cast_column(df.column(name)?, *target)?;
            cast.with_column(column)?;
        }

        tracing::debug!(columns = self.schema.len(), "Cast columns to schema");

        Ok(cast)
    }
}

fn cast_column(column: &Column, target: CastType) -> Result<Column> {
    if target == CastType::Boolean && column.dtype() == &DataType::String {
        return parse_bool_column(column);
    }

    column
        .strict_cast(&target.dtype())
        .map_err(|err| CleanError::Cast {
            column: column.name().to_string(),
            dtype: target.to_string(),
            message: err.to_string(),
        })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_bool_column(column: &Column) -> Result<Column> {
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| match value {
            None => Ok(None),
            Some(text) => parse_bool(text).map(Some).ok_or_else(|| CleanError::Cast {
                column: column.name().to_string(),
                dtype: CastType::Boolean.to_string(),
                message: format!("'{text}' is not a boolean"),
            }),
        })
        .collect::<Result<Vec<Option<bool>>>>()?;

    Ok(Column::from(Series::new(column.name().clone(), values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caster(schema: serde_json::Value) -> Result<TypeCaster> {
        TypeCaster::new(&CleanerConfig::new().with("schema", schema))
    }

    #[test]
    fn test_cast_leaves_input_untouched() -> Result<()> {
        let df = df!(
            "a" => &[1i64, 2, 3],
            "b" => &["1", "2", "3"]
        )?;

        let cast = caster(json!({ "b": "int" }))?.transform(&df)?;

        let b: Vec<Option<i64>> = cast
            .column("b")?
            .as_materialized_series()
            .i64()?
            .into_iter()
            .collect();
        assert_eq!(b, [Some(1), Some(2), Some(3)]);
        assert_eq!(cast.column("a")?.dtype(), &DataType::Int64);
        assert_eq!(df.column("b")?.dtype(), &DataType::String);
        Ok(())
    }

    #[test]
    fn test_cast_twice_is_stable() -> Result<()> {
        let df = df!("b" => &["1.5", "2", "x"], "c" => &["yes", "NO", "1"])?;
        let step = caster(json!({ "c": "bool" }))?;

        let once = step.transform(&df)?;
        let twice = step.transform(&once)?;

        assert_eq!(once.schema(), twice.schema());
        assert_eq!(twice.column("c")?.dtype(), &DataType::Boolean);
        assert!(once.equals_missing(&twice));
        Ok(())
    }

    #[test]
    fn test_fit_returns_same_instance() -> Result<()> {
        let df = df!("b" => &["1"])?;
        let mut step = caster(json!({ "b": "float" }))?;
        let before = std::ptr::from_ref(&step).cast::<()>();

        let fitted = step.fit(&df)?;
        let after = std::ptr::from_ref(fitted).cast::<()>();
        assert!(std::ptr::eq(before, after));

        let cast = fitted.transform(&df)?;
        assert_eq!(cast.column("b")?.dtype(), &DataType::Float64);
        Ok(())
    }

    #[test]
    fn test_missing_column_fails() -> Result<()> {
        let df = df!("a" => &[1, 2])?;
        let err = caster(json!({ "nope": "int" }))?
            .transform(&df)
            .expect_err("column is absent");
        assert!(matches!(err, CleanError::ColumnNotFound(ref name) if name == "nope"));
        Ok(())
    }

    #[test]
    fn test_invalid_value_fails_whole_transform() -> Result<()> {
        let df = df!("a" => &["1", "2"], "b" => &["3", "oops"])?;
        let err = caster(json!({ "a": "int", "b": "int" }))?
            .transform(&df)
            .expect_err("'oops' is not an integer");
        assert!(matches!(err, CleanError::Cast { ref column, .. } if column == "b"));

        let err = caster(json!({ "b": "bool" }))?
            .transform(&df)
            .expect_err("'3' is not a boolean");
        assert!(matches!(err, CleanError::Cast { .. }));
        Ok(())
    }

    #[test]
    fn test_schema_errors() {
        let err = TypeCaster::new(&CleanerConfig::new()).expect_err("schema is required");
        assert!(matches!(err, CleanError::MissingKey("schema")));

        let err = caster(json!({ "a": "complex128" })).expect_err("unknown descriptor");
        assert!(matches!(err, CleanError::UnsupportedType(ref name) if name == "complex128"));

        let err = caster(json!({ "a": 5 })).expect_err("descriptor must be a string");
        assert!(matches!(err, CleanError::InvalidConfig(_)));

        let err = caster(json!(["a"])).expect_err("schema must be an object");
        assert!(matches!(err, CleanError::InvalidConfig(_)));
    }

    #[test]
    fn test_descriptor_aliases() -> Result<()> {
        assert_eq!("INT".parse::<CastType>()?, CastType::Int64);
        assert_eq!("Float".parse::<CastType>()?, CastType::Float64);
        assert_eq!("object".parse::<CastType>()?, CastType::String);
        assert_eq!("boolean".parse::<CastType>()?, CastType::Boolean);
        Ok(())
    }
}
