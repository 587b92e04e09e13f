//! Data Cleaner Module
//! Missing-value imputation and iterative IQR outlier suppression.
//! Every chart in the app consumes the table this module produces.

use crate::stats::StatsCalculator;
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Pollutant and meteorological measurement columns subject to outlier
/// suppression.
pub const MEASURE_COLUMNS: [&str; 11] = [
    "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES", "DEWP", "RAIN", "WSPM",
];

/// Hard cap on winsorization passes. Replacement with the median pulls
/// extremes inward, so convergence is expected long before this; the cap
/// turns a convergence bug into an error instead of a hang.
const MAX_PASSES: usize = 1000;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Column '{0}' has no non-missing values to impute from")]
    DataQuality(String),
    #[error("Column '{0}' has no values convertible to numeric")]
    InvalidColumn(String),
    #[error("Outlier suppression did not converge on column '{0}'")]
    NonTermination(String),
}

/// Handles table cleaning: imputation first, then outlier suppression.
pub struct DataCleaner;

impl DataCleaner {
    /// Full cleaning pass over a loaded table, in place.
    pub fn clean(df: &mut DataFrame) -> Result<(), CleanError> {
        Self::impute_missing(df)?;
        Self::suppress_outliers(df)?;
        Ok(())
    }

    /// Fill missing entries in every column: numeric columns with the
    /// column mean, text columns with the mode.
    pub fn impute_missing(df: &mut DataFrame) -> Result<(), CleanError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for name in names {
            let column = df.column(&name)?;
            if column.null_count() == 0 {
                continue;
            }

            let is_numeric = matches!(
                column.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            );

            let filled = if is_numeric {
                Self::fill_with_mean(column, &name)?
            } else if matches!(column.dtype(), DataType::String) {
                Self::fill_with_mode(column, &name)?
            } else {
                continue;
            };

            df.replace(&name, filled)?;
        }
        Ok(())
    }

    /// Replace nulls with the arithmetic mean of the non-missing values.
    /// The mean is computed once up front, not recomputed per replacement.
    fn fill_with_mean(column: &Column, name: &str) -> Result<Series, CleanError> {
        let cast = column.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        let mean = ca
            .mean()
            .ok_or_else(|| CleanError::DataQuality(name.to_string()))?;

        let values: Vec<f64> = ca.into_iter().map(|v| v.unwrap_or(mean)).collect();
        Ok(Series::new(name.into(), values))
    }

    /// Replace nulls with the most frequent non-missing value. Ties
    /// resolve to the lexicographically smallest candidate.
    fn fill_with_mode(column: &Column, name: &str) -> Result<Series, CleanError> {
        let series = column.as_materialized_series();
        let ca = series.str()?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in ca.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        let mode = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(v, _)| v.to_string())
            .ok_or_else(|| CleanError::DataQuality(name.to_string()))?;

        let values: Vec<String> = ca
            .into_iter()
            .map(|v| v.unwrap_or(&mode).to_string())
            .collect();
        Ok(Series::new(name.into(), values))
    }

    /// Winsorize each measurement column independently until no value
    /// lies outside the Tukey IQR fences. Columns are processed in
    /// parallel; row order is preserved.
    pub fn suppress_outliers(df: &mut DataFrame) -> Result<(), CleanError> {
        let shared = &*df;
        let cleaned: Vec<(String, Series)> = MEASURE_COLUMNS
            .par_iter()
            .map(|&name| -> Result<(String, Series), CleanError> {
                let column = shared.column(name)?;
                let series = Self::winsorize_column(column, name)?;
                Ok((name.to_string(), series))
            })
            .collect::<Result<Vec<_>, CleanError>>()?;

        for (name, series) in cleaned {
            df.replace(&name, series)?;
        }
        Ok(())
    }

    /// Iteratively replace IQR outliers with the column median until a
    /// pass replaces nothing.
    ///
    /// Coercion happens first: entries that cannot be read as numbers
    /// become missing and stay excluded from the quantile and median
    /// computations, so they never bias the fences.
    fn winsorize_column(column: &Column, name: &str) -> Result<Series, CleanError> {
        let cast = column.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        let mut values: Vec<Option<f64>> = ca
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();

        if values.iter().all(|v| v.is_none()) {
            return Err(CleanError::InvalidColumn(name.to_string()));
        }

        let mut previous_outliers = usize::MAX;
        for _ in 0..MAX_PASSES {
            let mut present: Vec<f64> = values.iter().copied().flatten().collect();
            present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let q1 = StatsCalculator::percentile(&present, 25.0);
            let q3 = StatsCalculator::percentile(&present, 75.0);
            let median = StatsCalculator::percentile(&present, 50.0);
            let iqr = q3 - q1;
            let (min, max) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

            // Median is fixed before any replacement in this pass.
            let mut outliers = 0usize;
            for slot in values.iter_mut() {
                if let Some(v) = *slot {
                    if v < min || v > max {
                        *slot = Some(median);
                        outliers += 1;
                    }
                }
            }

            if outliers == 0 {
                return Ok(Series::new(name.into(), values));
            }
            if outliers > previous_outliers {
                return Err(CleanError::NonTermination(name.to_string()));
            }
            previous_outliers = outliers;
        }

        Err(CleanError::NonTermination(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_values(series: &Series) -> Vec<f64> {
        series
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn winsorize_replaces_outlier_with_median() {
        // Q1=2, Q3=4, IQR=2, fences [-1, 7]; 100 -> median 3
        let column = Column::new("CO".into(), vec![1.0, 2.0, 3.0, 4.0, 100.0]);
        let result = DataCleaner::winsorize_column(&column, "CO").unwrap();
        assert_eq!(column_values(&result), vec![1.0, 2.0, 3.0, 4.0, 3.0]);
    }

    #[test]
    fn winsorize_leaves_constant_column_unchanged() {
        let column = Column::new("RAIN".into(), vec![0.0; 8]);
        let result = DataCleaner::winsorize_column(&column, "RAIN").unwrap();
        assert_eq!(column_values(&result), vec![0.0; 8]);
    }

    #[test]
    fn winsorize_is_idempotent() {
        let column = Column::new("NO2".into(), vec![5.0, 7.0, 6.0, 8.0, 90.0, 6.5, 7.5]);
        let once = DataCleaner::winsorize_column(&column, "NO2").unwrap();
        let again = DataCleaner::winsorize_column(&Column::from(once.clone()), "NO2").unwrap();
        assert_eq!(column_values(&once), column_values(&again));
    }

    #[test]
    fn winsorized_column_is_a_fixed_point() {
        let raw: Vec<f64> = (0..50)
            .map(|i| (i as f64 * 0.37).sin() * 10.0 + 20.0)
            .chain([500.0, -400.0, 900.0])
            .collect();
        let column = Column::new("PM10".into(), raw);
        let result = DataCleaner::winsorize_column(&column, "PM10").unwrap();

        let mut sorted = column_values(&result);
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let (min, max) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        assert!(sorted.iter().all(|&v| v >= min && v <= max));
    }

    #[test]
    fn winsorize_rejects_unconvertible_column() {
        let column = Column::new("CO".into(), vec!["calm", "windy", "calm"]);
        let err = DataCleaner::winsorize_column(&column, "CO").unwrap_err();
        assert!(matches!(err, CleanError::InvalidColumn(col) if col == "CO"));
    }

    #[test]
    fn mean_imputation_uses_non_missing_values() {
        let mut df = DataFrame::new(vec![Column::new(
            "TEMP".into(),
            vec![Some(1.0), None, Some(3.0)],
        )])
        .unwrap();
        DataCleaner::impute_missing(&mut df).unwrap();
        let values = column_values(df.column("TEMP").unwrap().as_materialized_series());
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn mode_imputation_picks_most_frequent() {
        let mut df = DataFrame::new(vec![Column::new(
            "wd".into(),
            vec![Some("N"), Some("N"), Some("S"), None, None],
        )])
        .unwrap();
        DataCleaner::impute_missing(&mut df).unwrap();
        let filled: Vec<String> = df
            .column("wd")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect();
        assert_eq!(filled, vec!["N", "N", "S", "N", "N"]);
    }

    #[test]
    fn mode_ties_resolve_lexicographically() {
        let mut df = DataFrame::new(vec![Column::new(
            "wd".into(),
            vec![Some("SW"), Some("NE"), None],
        )])
        .unwrap();
        DataCleaner::impute_missing(&mut df).unwrap();
        let filled: Vec<String> = df
            .column("wd")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect();
        assert_eq!(filled[2], "NE");
    }

    #[test]
    fn all_missing_column_is_a_data_quality_error() {
        let mut df = DataFrame::new(vec![Column::new(
            "O3".into(),
            vec![None::<f64>, None, None],
        )])
        .unwrap();
        let err = DataCleaner::impute_missing(&mut df).unwrap_err();
        assert!(matches!(err, CleanError::DataQuality(col) if col == "O3"));
    }

    #[test]
    fn imputation_leaves_no_missing_entries() {
        let mut df = DataFrame::new(vec![
            Column::new("CO".into(), vec![Some(300.0), None, Some(500.0), None]),
            Column::new("wd".into(), vec![Some("N"), None, Some("N"), Some("E")]),
        ])
        .unwrap();
        DataCleaner::impute_missing(&mut df).unwrap();
        assert_eq!(df.column("CO").unwrap().null_count(), 0);
        assert_eq!(df.column("wd").unwrap().null_count(), 0);
    }

    #[test]
    fn clean_runs_end_to_end() {
        let n = 24;
        let mut columns: Vec<Column> = MEASURE_COLUMNS
            .iter()
            .map(|&name| {
                let mut values: Vec<Option<f64>> =
                    (0..n).map(|i| Some(10.0 + (i % 5) as f64)).collect();
                values[3] = None;
                values[7] = Some(10_000.0);
                Column::new(name.into(), values)
            })
            .collect();
        columns.push(Column::new(
            "wd".into(),
            (0..n)
                .map(|i| if i == 5 { None } else { Some("NW") })
                .collect::<Vec<_>>(),
        ));
        let mut df = DataFrame::new(columns).unwrap();

        DataCleaner::clean(&mut df).unwrap();

        for name in MEASURE_COLUMNS {
            let col = df.column(name).unwrap();
            assert_eq!(col.null_count(), 0);
            let values = column_values(col.as_materialized_series());
            assert!(values.iter().all(|v| *v < 100.0), "{name} kept an outlier");
        }
    }
}
