//! Data module - CSV loading and cleaning

mod cleaner;
mod loader;

pub use cleaner::{CleanError, DataCleaner, MEASURE_COLUMNS};
pub use loader::{DataLoader, ReadError};
