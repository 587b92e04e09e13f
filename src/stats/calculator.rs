//! Statistics Calculator Module
//! Descriptive statistics, grouped means, correlation and OLS fits.

use polars::prelude::*;
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for the regression slope test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Descriptive statistics for a single column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Per-month means for one calendar year.
#[derive(Debug, Clone)]
pub struct YearSeries {
    pub year: i32,
    /// `[month, mean]` pairs, month in 1..=12, sorted ascending.
    pub points: Vec<[f64; 2]>,
}

/// Ordinary least squares fit of y on x.
#[derive(Debug, Clone, Copy)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub p_value: f64,
    pub is_significant: bool,
}

impl RegressionFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_summary(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = Self::percentile(&sorted, 50.0);

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        ColumnSummary {
            column: String::new(),
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Extract a column as finite f64 values, in row order.
    pub fn column_values(df: &DataFrame, column: &str) -> Vec<f64> {
        let Ok(cast) = df
            .column(column)
            .and_then(|col| col.cast(&DataType::Float64))
        else {
            return Vec::new();
        };
        let Ok(ca) = cast.f64() else {
            return Vec::new();
        };
        ca.into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect()
    }

    /// Extract two columns as positionally paired finite values. Rows
    /// where either side is missing are skipped on both sides.
    pub fn paired_values(df: &DataFrame, x_col: &str, y_col: &str) -> (Vec<f64>, Vec<f64>) {
        let (Ok(x_cast), Ok(y_cast)) = (
            df.column(x_col)
                .and_then(|col| col.cast(&DataType::Float64)),
            df.column(y_col)
                .and_then(|col| col.cast(&DataType::Float64)),
        ) else {
            return (Vec::new(), Vec::new());
        };
        let (Ok(x_ca), Ok(y_ca)) = (x_cast.f64(), y_cast.f64()) else {
            return (Vec::new(), Vec::new());
        };

        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for (x, y) in x_ca.into_iter().zip(y_ca) {
            if let (Some(x), Some(y)) = (x, y) {
                if x.is_finite() && y.is_finite() {
                    xs.push(x);
                    ys.push(y);
                }
            }
        }
        (xs, ys)
    }

    /// Compute summaries for several columns in parallel, preserving the
    /// requested order.
    pub fn summarize_columns_parallel(df: &DataFrame, columns: &[&str]) -> Vec<ColumnSummary> {
        columns
            .par_iter()
            .map(|&name| {
                let values = Self::column_values(df, name);
                let mut summary = Self::compute_summary(&values);
                summary.column = name.to_string();
                summary
            })
            .collect()
    }

    /// Mean of a value column grouped by (year, month), returned as one
    /// series per year with points sorted by month.
    pub fn monthly_means(df: &DataFrame, value_col: &str) -> PolarsResult<Vec<YearSeries>> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col("year"), col("month")])
            .agg([col(value_col).mean().alias("mean")])
            .sort(["year", "month"], Default::default())
            .collect()?;

        let years = grouped.column("year")?.cast(&DataType::Float64)?;
        let years = years.f64()?;
        let months = grouped.column("month")?.cast(&DataType::Float64)?;
        let months = months.f64()?;
        let means = grouped.column("mean")?.f64()?;

        let mut series: Vec<YearSeries> = Vec::new();
        for i in 0..grouped.height() {
            let (Some(year), Some(month), Some(mean)) = (years.get(i), months.get(i), means.get(i))
            else {
                continue;
            };
            let year = year as i32;
            match series.last_mut() {
                Some(last) if last.year == year => last.points.push([month, mean]),
                _ => series.push(YearSeries {
                    year,
                    points: vec![[month, mean]],
                }),
            }
        }
        Ok(series)
    }

    /// Mean of a value column grouped by hour of day, sorted by hour.
    pub fn hourly_means(df: &DataFrame, value_col: &str) -> PolarsResult<Vec<[f64; 2]>> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col("hour")])
            .agg([col(value_col).mean().alias("mean")])
            .sort(["hour"], Default::default())
            .collect()?;

        let hours = grouped.column("hour")?.cast(&DataType::Float64)?;
        let hours = hours.f64()?;
        let means = grouped.column("mean")?.f64()?;

        let mut points = Vec::with_capacity(grouped.height());
        for i in 0..grouped.height() {
            if let (Some(hour), Some(mean)) = (hours.get(i), means.get(i)) {
                points.push([hour, mean]);
            }
        }
        Ok(points)
    }

    /// Pearson correlation coefficient of two equally long samples.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len().min(y.len());
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = x[..n].iter().sum::<f64>() / n as f64;
        let mean_y = y[..n].iter().sum::<f64>() / n as f64;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        let mut syy = 0.0;
        for i in 0..n {
            let dx = x[i] - mean_x;
            let dy = y[i] - mean_y;
            sxy += dx * dy;
            sxx += dx * dx;
            syy += dy * dy;
        }

        let denom = (sxx * syy).sqrt();
        if denom == 0.0 {
            return f64::NAN;
        }
        sxy / denom
    }

    /// Ordinary least squares fit of y on x, with a two-tailed t-test on
    /// the slope (df = n - 2).
    pub fn linear_fit(x: &[f64], y: &[f64]) -> RegressionFit {
        let n = x.len().min(y.len());
        let nan_fit = RegressionFit {
            slope: f64::NAN,
            intercept: f64::NAN,
            r: f64::NAN,
            p_value: f64::NAN,
            is_significant: false,
        };
        if n < 3 {
            return nan_fit;
        }

        let mean_x = x[..n].iter().sum::<f64>() / n as f64;
        let mean_y = y[..n].iter().sum::<f64>() / n as f64;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for i in 0..n {
            let dx = x[i] - mean_x;
            sxy += dx * (y[i] - mean_y);
            sxx += dx * dx;
        }
        if sxx == 0.0 {
            return nan_fit;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r = Self::pearson(&x[..n], &y[..n]);

        let df_t = (n - 2) as f64;
        let spread = 1.0 - r * r;
        let (p_value, is_significant) = if spread <= f64::EPSILON {
            // Perfect fit, the slope test degenerates
            (0.0, true)
        } else {
            let t = r * (df_t / spread).sqrt();
            if let Ok(dist) = StudentsT::new(0.0, 1.0, df_t) {
                let p = 2.0 * (1.0 - dist.cdf(t.abs()));
                (p, p <= SIGNIFICANCE_THRESHOLD)
            } else {
                (f64::NAN, false)
            }
        };

        RegressionFit {
            slope,
            intercept,
            r,
            p_value,
            is_significant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 2.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 3.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 75.0), 4.0);
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
    }

    #[test]
    fn summary_on_small_sample() {
        let summary = StatsCalculator::compute_summary(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.count, 8);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        assert!((summary.median - 4.5).abs() < 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert!((summary.std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_exact_line_is_one() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 1.0).collect();
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_recovers_slope_and_intercept() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let fit = StatsCalculator::linear_fit(&x, &y);
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!(fit.is_significant);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_means_group_by_year_and_month() {
        let df = DataFrame::new(vec![
            Column::new("year".into(), vec![2013i64, 2013, 2013, 2014]),
            Column::new("month".into(), vec![3i64, 3, 4, 3]),
            Column::new("TEMP".into(), vec![1.0, 3.0, 10.0, 8.0]),
        ])
        .unwrap();

        let series = StatsCalculator::monthly_means(&df, "TEMP").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 2013);
        assert_eq!(series[0].points, vec![[3.0, 2.0], [4.0, 10.0]]);
        assert_eq!(series[1].year, 2014);
        assert_eq!(series[1].points, vec![[3.0, 8.0]]);
    }

    #[test]
    fn hourly_means_are_sorted_by_hour() {
        let df = DataFrame::new(vec![
            Column::new("hour".into(), vec![1i64, 0, 1, 0]),
            Column::new("CO".into(), vec![400.0, 100.0, 600.0, 300.0]),
        ])
        .unwrap();

        let points = StatsCalculator::hourly_means(&df, "CO").unwrap();
        assert_eq!(points, vec![[0.0, 200.0], [1.0, 500.0]]);
    }

    #[test]
    fn paired_values_skip_incomplete_rows() {
        let df = DataFrame::new(vec![
            Column::new("CO".into(), vec![Some(1.0), None, Some(3.0)]),
            Column::new("PM2.5".into(), vec![Some(10.0), Some(20.0), Some(30.0)]),
        ])
        .unwrap();
        let (xs, ys) = StatsCalculator::paired_values(&df, "CO", "PM2.5");
        assert_eq!(xs, vec![1.0, 3.0]);
        assert_eq!(ys, vec![10.0, 30.0]);
    }
}
