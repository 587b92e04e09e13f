//! CSV Data Loader Module
//! Handles CSV file loading and schema checks using Polars.

use polars::prelude::*;
use thiserror::Error;

/// Columns every air-quality export must carry. A file missing any of
/// these is rejected up front instead of surfacing as a half-empty chart.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "year", "month", "hour", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES", "DEWP",
    "RAIN", "WSPM", "station",
];

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Required column '{0}' is missing from the CSV header")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Handles CSV file loading with Polars for high performance.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file using Polars. Column types are inferred from
    /// content: numeric columns parse as numbers, everything else stays
    /// text.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, ReadError> {
        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::check_required_columns(&df)?;

        self.df = Some(df);
        self.df.as_ref().ok_or(ReadError::NoData)
    }

    /// Verify that all required station columns are present.
    fn check_required_columns(df: &DataFrame) -> Result<(), ReadError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|n| n == required) {
                return Err(ReadError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get unique values from a column.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const FULL_HEADER: &str =
        "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("airsight_loader_{}_{}.csv", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_well_formed_csv() {
        let csv = format!(
            "{FULL_HEADER}\n2013,3,1,0,4.0,4.0,4.0,7.0,300.0,77.0,-0.7,1023.0,-18.8,0.0,NNW,4.4,Aotizhongxin\n"
        );
        let path = write_temp_csv("ok", &csv);

        let mut loader = DataLoader::new();
        let df = loader.load_csv(path.to_str().unwrap()).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(loader.get_row_count(), 1);
        assert!(loader.get_columns().iter().any(|c| c == "PM2.5"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_required_column_is_rejected() {
        // Header without TEMP
        let csv = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,PRES,DEWP,RAIN,wd,WSPM,station\n\
                   2013,3,1,0,4.0,4.0,4.0,7.0,300.0,77.0,1023.0,-18.8,0.0,NNW,4.4,Aotizhongxin\n";
        let path = write_temp_csv("missing_col", csv);

        let mut loader = DataLoader::new();
        let err = loader.load_csv(path.to_str().unwrap()).unwrap_err();
        match err {
            ReadError::MissingColumn(col) => assert_eq!(col, "TEMP"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut loader = DataLoader::new();
        let result = loader.load_csv("/nonexistent/airsight_no_such_file.csv");
        assert!(result.is_err());
    }

    #[test]
    fn unique_values_skip_nulls() {
        let csv = format!(
            "{FULL_HEADER}\n\
             2013,3,1,0,4.0,4.0,4.0,7.0,300.0,77.0,-0.7,1023.0,-18.8,0.0,NNW,4.4,Aotizhongxin\n\
             2013,3,1,1,8.0,8.0,4.0,7.0,300.0,77.0,-1.1,1023.2,-18.2,0.0,,4.7,Aotizhongxin\n"
        );
        let path = write_temp_csv("uniques", &csv);

        let mut loader = DataLoader::new();
        loader.load_csv(path.to_str().unwrap()).unwrap();
        let stations = loader.get_unique_values("station");
        assert_eq!(stations, vec!["Aotizhongxin".to_string()]);
        let directions = loader.get_unique_values("wd");
        assert_eq!(directions, vec!["NNW".to_string()]);

        let _ = std::fs::remove_file(path);
    }
}
