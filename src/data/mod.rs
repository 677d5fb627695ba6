//! Dataset layer: loading, schema inspection, filtering, and aggregation.
//!
//! The dataset is read from disk exactly once per process and cached as an
//! immutable, shareable table. All downstream operations take the table (or
//! a derived table) as an explicit input; nothing reads ambient state except
//! the one-time cached load result.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod schema;
pub mod table;

pub use error::{DataError, DataResult};
pub use table::{DistrictRecord, Table};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "IDV_DATA_PATH";

/// Default dataset path, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "india.csv";

/// Global dataset instance loaded once per process.
static DATASET: OnceLock<Arc<Table>> = OnceLock::new();

/// Path the dataset is loaded from: `IDV_DATA_PATH` or the default.
pub fn default_data_path() -> String {
    std::env::var(DATA_PATH_ENV).unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string())
}

/// Initialize the global dataset singleton from the given path.
///
/// Idempotent: once a table is cached, later calls return `Ok` without
/// re-reading the file.
pub fn init_dataset(path: &str) -> Result<()> {
    if DATASET.get().is_some() {
        return Ok(());
    }

    let table = loader::load_table(path)
        .with_context(|| format!("Failed to load dataset from {}", path))?;
    let _ = DATASET.set(Arc::new(table));
    Ok(())
}

/// Get a reference to the cached dataset.
///
/// Attempts a default-path load if [`init_dataset`] has not run yet; a
/// failed load propagates with the path it came from.
pub fn get_dataset() -> Result<&'static Arc<Table>> {
    if DATASET.get().is_none() {
        init_dataset(&default_data_path())?;
    }

    DATASET
        .get()
        .context("Dataset not initialized. Call init_dataset() first.")
}
