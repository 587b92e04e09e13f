//! Stats module - statistical reductions over the cleaned table

mod calculator;

pub use calculator::{ColumnSummary, RegressionFit, StatsCalculator, YearSeries};
