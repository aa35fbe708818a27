//! Missing-value fill strategies.
//!
//! All four cleaners read the optional `columns` key: when it is absent or
//! `null` the mean and median cleaners cover every numeric column, while the
//! constant and mode cleaners cover every column. Mean, median and mode learn
//! their fill values in `fit`; the constant cleaner takes its value from the
//! record's `value` key and needs no fitting.
//!
//! Only columns that contain nulls are filled. Learned values are polars
//! scalars in the column's own dtype, so temporal and categorical columns fill
//! like any other; a constant is cast to each column's dtype first.

use polars::prelude::*;
use serde_json::Value;

use super::step::{CleaningStep, StepKind};
use crate::config::{CleanerConfig, KEY_COLUMNS, KEY_VALUE};
use crate::error::{CleanError, Result};

/// A scalar that replaces nulls.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Int(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl FillValue {
    /// Read a constant from a JSON scalar.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] for `null`, arrays and objects.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Self::Int(i)),
                (None, Some(f)) => Ok(Self::Float(f)),
                (None, None) => Err(CleanError::InvalidConfig(format!(
                    "fill value {n} is out of range"
                ))),
            },
            other => Err(CleanError::InvalidConfig(format!(
                "fill value must be a string, number or boolean, found {other}"
            ))),
        }
    }

    fn dtype(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int64,
            Self::Float(_) => DataType::Float64,
            Self::Text(_) => DataType::String,
            Self::Boolean(_) => DataType::Boolean,
        }
    }

    fn to_series(&self) -> Series {
        match self {
            Self::Int(v) => Series::new(PlSmallStr::EMPTY, &[*v]),
            Self::Float(v) => Series::new(PlSmallStr::EMPTY, &[*v]),
            Self::Text(v) => Series::new(PlSmallStr::EMPTY, &[v.as_str()]),
            Self::Boolean(v) => Series::new(PlSmallStr::EMPTY, &[*v]),
        }
    }

    /// The constant as a scalar of `dtype`. A float constant widens an integer
    /// column to `Float64` instead of being truncated.
    fn cast_for(&self, column: &str, dtype: &DataType) -> Result<Scalar> {
        let target = match self {
            Self::Float(_) if dtype.is_integer() => DataType::Float64,
            _ => dtype.clone(),
        };

        let cast = self
            .to_series()
            .strict_cast(&target)
            .map_err(|err| CleanError::Cast {
                column: column.to_owned(),
                dtype: target.to_string(),
                message: format!("constant of type {}: {err}", self.dtype()),
            })?;
        let value = cast.get(0)?.into_static();

        Ok(Scalar::new(target, value))
    }
}

pub(crate) fn ensure_column(df: &DataFrame, name: &str) -> Result<()> {
    if df.get_column_index(name).is_some() {
        Ok(())
    } else {
        Err(CleanError::ColumnNotFound(name.to_owned()))
    }
}

/// Explicit columns are checked against `df`; otherwise every (numeric)
/// column is selected.
fn resolve_columns(
    df: &DataFrame,
    requested: Option<&[String]>,
    numeric_only: bool,
) -> Result<Vec<String>> {
    if let Some(columns) = requested {
        for name in columns {
            ensure_column(df, name)?;
        }
        return Ok(columns.to_vec());
    }

    Ok(df
        .get_columns()
        .iter()
        .filter(|column| !numeric_only || column.dtype().is_primitive_numeric())
        .map(|column| column.name().to_string())
        .collect())
}

fn has_nulls(df: &DataFrame, name: &str) -> Result<bool> {
    Ok(df.column(name)?.null_count() > 0)
}

/// Columns without nulls are left alone so their dtype is not widened.
fn fill_nulls(df: &DataFrame, fills: &[(String, Scalar)]) -> Result<DataFrame> {
    let mut exprs = Vec::with_capacity(fills.len());
    for (name, value) in fills {
        if has_nulls(df, name)? {
            exprs.push(
                col(name.as_str())
                    .fill_null(lit(value.clone()))
                    .alias(name.as_str()),
            );
        }
    }

    if exprs.is_empty() {
        return Ok(df.clone());
    }

    Ok(df.clone().lazy().with_columns(exprs).collect()?)
}

// ============================================================================
// Constant
// ============================================================================

/// Replaces nulls with the configured `value`.
#[derive(Debug, Clone)]
pub struct ConstantCleaner {
    value: FillValue,
    columns: Option<Vec<String>>,
}

impl ConstantCleaner {
    /// # Errors
    ///
    /// Returns [`CleanError::MissingKey`] without a `value` key and
    /// [`CleanError::InvalidConfig`] if `value` or `columns` is malformed.
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        let value = config
            .get(KEY_VALUE)
            .ok_or(CleanError::MissingKey(KEY_VALUE))
            .and_then(FillValue::from_json)?;

        Ok(Self {
            value,
            columns: config.column_list(KEY_COLUMNS)?,
        })
    }

    pub fn value(&self) -> &FillValue {
        &self.value
    }
}

impl CleaningStep for ConstantCleaner {
    fn kind(&self) -> StepKind {
        StepKind::Constant
    }

    fn fit(&mut self, _df: &DataFrame) -> Result<&mut dyn CleaningStep> {
        Ok(self)
    }

    /// Columns the constant cannot be cast to are skipped unless they were
    /// named explicitly.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let explicit = self.columns.is_some();
        let mut fills = Vec::new();

        for name in resolve_columns(df, self.columns.as_deref(), false)? {
            if !has_nulls(df, &name)? {
                continue;
            }
            let dtype = df.column(&name)?.dtype().clone();
            match self.value.cast_for(&name, &dtype) {
                Ok(value) => fills.push((name, value)),
                Err(err) if !explicit => {
                    tracing::debug!(column = %name, error = %err, "Skipping column");
                }
                Err(err) => return Err(err),
            }
        }

        fill_nulls(df, &fills)
    }
}

// ============================================================================
// Learned statistics (mean / median / mode)
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Statistic {
    Mean,
    Median,
    Mode,
}

impl Statistic {
    fn kind(self) -> StepKind {
        match self {
            Self::Mean => StepKind::Mean,
            Self::Median => StepKind::Median,
            Self::Mode => StepKind::Mode,
        }
    }

    fn numeric_only(self) -> bool {
        !matches!(self, Self::Mode)
    }

    fn aggregate(self, name: &str) -> Expr {
        let column = col(name);
        let aggregated = match self {
            Self::Mean => column.mean(),
            Self::Median => column.median(),
            // Ties go to the smallest value.
            Self::Mode => column
                .drop_nulls()
                .mode()
                .sort(SortOptions::default())
                .first(),
        };
        aggregated.alias(name)
    }
}

#[derive(Debug, Clone)]
struct LearnedFill {
    statistic: Statistic,
    columns: Option<Vec<String>>,
    learned: Option<Vec<(String, Scalar)>>,
}

impl LearnedFill {
    fn new(statistic: Statistic, config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            statistic,
            columns: config.column_list(KEY_COLUMNS)?,
            learned: None,
        })
    }

    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let columns = resolve_columns(df, self.columns.as_deref(), self.statistic.numeric_only())?;

        if self.statistic.numeric_only() {
            for name in &columns {
                if !df.column(name)?.dtype().is_primitive_numeric() {
                    return Err(CleanError::NonNumericColumn {
                        column: name.clone(),
                        strategy: self.statistic.kind(),
                    });
                }
            }
        }

        let mut pending = Vec::with_capacity(columns.len());
        for name in columns {
            if has_nulls(df, &name)? {
                pending.push(name);
            }
        }

        let mut learned = Vec::with_capacity(pending.len());
        if !pending.is_empty() {
            let exprs: Vec<Expr> = pending
                .iter()
                .map(|name| self.statistic.aggregate(name))
                .collect();
            let stats = df.clone().lazy().select(exprs).collect()?;

            for name in pending {
                let column = stats.column(&name)?;
                let cell = column.get(0)?;
                // All-null columns have no statistic.
                if cell.is_null() {
                    continue;
                }
                let value = Scalar::new(column.dtype().clone(), cell.into_static());
                learned.push((name, value));
            }
        }

        tracing::debug!(
            step = %self.statistic.kind(),
            columns = learned.len(),
            "Learned fill values"
        );
        self.learned = Some(learned);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let learned = self
            .learned
            .as_deref()
            .ok_or(CleanError::NotFitted(self.statistic.kind()))?;

        for (name, _) in learned {
            ensure_column(df, name)?;
        }

        fill_nulls(df, learned)
    }
}

/// Replaces nulls with each column's mean.
#[derive(Debug, Clone)]
pub struct MeanCleaner {
    inner: LearnedFill,
}

impl MeanCleaner {
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] if `columns` is malformed.
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            inner: LearnedFill::new(Statistic::Mean, config)?,
        })
    }

    /// Values learned by the last `fit`, per column.
    pub fn fill_values(&self) -> Option<&[(String, Scalar)]> {
        self.inner.learned.as_deref()
    }
}

impl CleaningStep for MeanCleaner {
    fn kind(&self) -> StepKind {
        StepKind::Mean
    }

    fn fit(&mut self, df: &DataFrame) -> Result<&mut dyn CleaningStep> {
        self.inner.fit(df)?;
        Ok(self)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.inner.transform(df)
    }
}

/// Replaces nulls with each column's median.
#[derive(Debug, Clone)]
pub struct MedianCleaner {
    inner: LearnedFill,
}

impl MedianCleaner {
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] if `columns` is malformed.
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            inner: LearnedFill::new(Statistic::Median, config)?,
        })
    }

    pub fn fill_values(&self) -> Option<&[(String, Scalar)]> {
        self.inner.learned.as_deref()
    }
}

impl CleaningStep for MedianCleaner {
    fn kind(&self) -> StepKind {
        StepKind::Median
    }

    fn fit(&mut self, df: &DataFrame) -> Result<&mut dyn CleaningStep> {
        self.inner.fit(df)?;
        Ok(self)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.inner.transform(df)
    }
}

/// Replaces nulls with each column's most frequent value.
#[derive(Debug, Clone)]
pub struct ModeCleaner {
    inner: LearnedFill,
}

impl ModeCleaner {
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] if `columns` is malformed.
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            inner: LearnedFill::new(Statistic::Mode, config)?,
        })
    }

    pub fn fill_values(&self) -> Option<&[(String, Scalar)]> {
        self.inner.learned.as_deref()
    }
}

impl CleaningStep for ModeCleaner {
    fn kind(&self) -> StepKind {
        StepKind::Mode
    }

    fn fit(&mut self, df: &DataFrame) -> Result<&mut dyn CleaningStep> {
        self.inner.fit(df)?;
        Ok(self)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.inner.transform(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_dates(mut df: DataFrame, name: &str, days: &[Option<i32>]) -> Result<DataFrame> {
        let dates = Series::new(name.into(), days).cast(&DataType::Date)?;
        df.with_column(dates)?;
        Ok(df)
    }

    fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
        Ok(df
            .column(name)?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect())
    }

    #[test]
    fn test_mean_fill() -> Result<()> {
        let df = df!(
            "vals" => &[Some(1.0), None, Some(3.0), Some(4.0)],
            "label" => &[Some("a"), None, Some("b"), Some("c")]
        )?;

        let mut cleaner = MeanCleaner::new(&CleanerConfig::new())?;
        let cleaned = cleaner.fit_transform(&df)?;

        let vals = f64_values(&cleaned, "vals")?;
        let filled = vals.get(1).copied().flatten().expect("mean was filled");
        assert!((filled - 8.0 / 3.0).abs() < 1e-9);

        // Non-numeric columns are outside the default set.
        assert_eq!(cleaned.column("label")?.null_count(), 1);
        // Input untouched.
        assert_eq!(df.column("vals")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_median_fill_on_integers() -> Result<()> {
        let df = df!("n" => &[Some(1i64), Some(10), None, Some(2)])?;

        let mut cleaner = MedianCleaner::new(&CleanerConfig::new())?;
        let cleaned = cleaner.fit_transform(&df)?;

        assert_eq!(
            f64_values(&cleaned, "n")?,
            [Some(1.0), Some(10.0), Some(2.0), Some(2.0)]
        );
        Ok(())
    }

    #[test]
    fn test_mode_fill_prefers_smallest_on_ties() -> Result<()> {
        let df = df!(
            "city" => &[Some("b"), Some("a"), None, Some("b"), Some("a")],
            "n" => &[Some(7i64), Some(7), Some(3), None, Some(3)]
        )?;

        let mut cleaner = ModeCleaner::new(&CleanerConfig::new())?;
        let cleaned = cleaner.fit_transform(&df)?;

        let cities: Vec<Option<&str>> = cleaned
            .column("city")?
            .as_materialized_series()
            .str()?
            .into_iter()
            .collect();
        assert_eq!(cities.get(2).copied().flatten(), Some("a"));

        let (name, value) = cleaner
            .fill_values()
            .and_then(|values| values.get(1))
            .expect("n has a learned mode");
        assert_eq!(name, "n");
        assert_eq!(value.value(), &AnyValue::Int64(3));
        assert_eq!(cleaned.column("n")?.null_count(), 0);
        Ok(())
    }

    #[test]
    fn test_constant_fill_selected_columns() -> Result<()> {
        let df = df!(
            "a" => &[Some(1.5), None],
            "b" => &[Some(2.5), None]
        )?;
        let config = CleanerConfig::new()
            .with("value", 0)
            .with("columns", json!(["a"]));

        let cleaned = ConstantCleaner::new(&config)?.transform(&df)?;

        assert_eq!(f64_values(&cleaned, "a")?, [Some(1.5), Some(0.0)]);
        assert_eq!(cleaned.column("b")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_constant_requires_value() {
        let err = ConstantCleaner::new(&CleanerConfig::new()).expect_err("value is required");
        assert!(matches!(err, CleanError::MissingKey("value")));

        let config = CleanerConfig::new().with("value", json!([1]));
        let err = ConstantCleaner::new(&config).expect_err("arrays are not scalars");
        assert!(matches!(err, CleanError::InvalidConfig(_)));
    }

    #[test]
    fn test_transform_before_fit_fails() -> Result<()> {
        let df = df!("x" => &[Some(1.0), None])?;
        let cleaner = MeanCleaner::new(&CleanerConfig::new())?;

        let err = cleaner.transform(&df).expect_err("not fitted");
        assert!(matches!(err, CleanError::NotFitted(StepKind::Mean)));
        Ok(())
    }

    #[test]
    fn test_mean_rejects_text_column() -> Result<()> {
        let df = df!("name" => &["x", "y"])?;
        let config = CleanerConfig::new().with("columns", json!(["name"]));

        let err = MeanCleaner::new(&config)?
            .fit(&df)
            .map(|_| ())
            .expect_err("text has no mean");
        assert!(matches!(err, CleanError::NonNumericColumn { .. }));
        Ok(())
    }

    #[test]
    fn test_unknown_fill_column() -> Result<()> {
        let df = df!("x" => &[Some(1.0), None])?;
        let config = CleanerConfig::new().with("columns", json!(["y"]));

        let err = ModeCleaner::new(&config)?
            .fit(&df)
            .map(|_| ())
            .expect_err("column y is absent");
        assert!(matches!(err, CleanError::ColumnNotFound(ref name) if name == "y"));
        Ok(())
    }

    #[test]
    fn test_all_null_column_keeps_nulls() -> Result<()> {
        let df = df!("x" => &[None::<f64>, None])?;

        let mut cleaner = MeanCleaner::new(&CleanerConfig::new())?;
        let cleaned = cleaner.fit_transform(&df)?;

        assert_eq!(cleaner.fill_values().map(<[_]>::len), Some(0));
        assert_eq!(cleaned.column("x")?.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_mode_skips_columns_without_nulls() -> Result<()> {
        let df = df!("n" => &[Some(1i64), None, Some(1)])?;
        let df = with_dates(df, "d", &[Some(19_000), Some(19_001), Some(19_000)])?;

        let mut cleaner = ModeCleaner::new(&CleanerConfig::new())?;
        let cleaned = cleaner.fit_transform(&df)?;

        assert_eq!(cleaned.column("n")?.null_count(), 0);
        assert_eq!(cleaned.column("d")?.dtype(), &DataType::Date);
        let learned: Vec<&str> = cleaner
            .fill_values()
            .unwrap_or_default()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(learned, ["n"]);
        Ok(())
    }

    #[test]
    fn test_mode_fills_date_column() -> Result<()> {
        let df = df!("n" => &[Some(1i64), Some(2), Some(2)])?;
        let df = with_dates(df, "d", &[Some(19_000), None, Some(19_000)])?;

        let mut cleaner = ModeCleaner::new(&CleanerConfig::new())?;
        let cleaned = cleaner.fit_transform(&df)?;

        let dates = cleaned.column("d")?;
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.null_count(), 0);
        assert_eq!(dates.get(1)?, AnyValue::Date(19_000));
        Ok(())
    }

    #[test]
    fn test_constant_skips_incompatible_default_columns() -> Result<()> {
        let df = df!(
            "x" => &[Some(1.5), None],
            "s" => &[None, Some("b")]
        )?;
        let df = with_dates(df, "d", &[Some(19_000), None])?;
        let config = CleanerConfig::new().with("value", 0);

        let cleaned = ConstantCleaner::new(&config)?.transform(&df)?;

        assert_eq!(f64_values(&cleaned, "x")?, [Some(1.5), Some(0.0)]);
        assert_eq!(cleaned.column("s")?.get(0)?, AnyValue::String("0"));
        assert_eq!(cleaned.column("d")?.dtype(), &DataType::Date);

        let config = CleanerConfig::new().with("value", "n/a");
        let cleaned = ConstantCleaner::new(&config)?.transform(&df)?;
        assert_eq!(cleaned.column("s")?.null_count(), 0);
        assert_eq!(cleaned.column("x")?.null_count(), 1);
        assert_eq!(cleaned.column("d")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_constant_named_incompatible_column_fails() -> Result<()> {
        let df = with_dates(df!("x" => &[1i64, 2])?, "d", &[Some(19_000), None])?;
        let config = CleanerConfig::new()
            .with("value", "n/a")
            .with("columns", json!(["d"]));

        let err = ConstantCleaner::new(&config)?
            .transform(&df)
            .expect_err("text is not a date");
        assert!(matches!(err, CleanError::Cast { ref column, .. } if column == "d"));
        Ok(())
    }

    #[test]
    fn test_float_constant_widens_integer_column() -> Result<()> {
        let df = df!("n" => &[Some(1i64), None])?;
        let config = CleanerConfig::new().with("value", 2.5);

        let cleaned = ConstantCleaner::new(&config)?.transform(&df)?;

        assert_eq!(f64_values(&cleaned, "n")?, [Some(1.0), Some(2.5)]);
        Ok(())
    }
}
