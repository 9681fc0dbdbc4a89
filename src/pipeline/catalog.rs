//! Session-scoped view catalog with opt-in durable tables

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use polars::sql::SQLContext;

use super::error::{PipelineError, Result};

/// Name used for both the temporary view and the durable table
pub const DEFAULT_VIEW_NAME: &str = "train__reduced__csv";

/// Explicit session context.
///
/// Owns the temporary views registered during a run. Views live as long as the
/// session value; only [`Session::save_as_table`] writes anything to disk.
#[derive(Debug)]
pub struct Session {
    views: BTreeMap<String, DataFrame>,
    warehouse_dir: PathBuf,
}

impl Session {
    pub fn new(warehouse_dir: impl Into<PathBuf>) -> Self {
        Self {
            views: BTreeMap::new(),
            warehouse_dir: warehouse_dir.into(),
        }
    }

    pub fn warehouse_dir(&self) -> &Path {
        &self.warehouse_dir
    }

    /// Register `df` under `name`, replacing any previous view of that name
    pub fn create_or_replace_temp_view(&mut self, name: &str, df: &DataFrame) {
        self.views.insert(name.to_string(), df.clone());
    }

    /// Remove a view. Returns whether one was registered.
    pub fn drop_temp_view(&mut self, name: &str) -> bool {
        self.views.remove(name).is_some()
    }

    /// Registered view names, sorted
    pub fn views(&self) -> Vec<String> {
        self.views.keys().cloned().collect()
    }

    pub fn table(&self, name: &str) -> Result<DataFrame> {
        self.views
            .get(name)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownView(name.to_string()))
    }

    /// Run a SQL query against every registered view
    pub fn sql(&self, query: &str) -> Result<DataFrame> {
        let mut ctx = SQLContext::new();
        for (name, df) in &self.views {
            ctx.register(name, df.clone().lazy());
        }
        Ok(ctx.execute(query)?.collect()?)
    }

    /// Path a durable table of this name is written to
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.warehouse_dir.join(format!("{}.parquet", name))
    }

    /// Promote a table to durable Parquet storage under the warehouse
    /// directory. Overwrites an existing table of the same name.
    pub fn save_as_table(&self, name: &str, df: &DataFrame) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.warehouse_dir)?;

        let path = self.table_path(name);
        let file = File::create(&path)?;
        let mut df = df.clone();
        ParquetWriter::new(file).finish(&mut df)?;

        Ok(path)
    }

    /// Read a durable table written by [`Session::save_as_table`]
    pub fn read_table(&self, name: &str) -> Result<DataFrame> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Err(PipelineError::Resource {
                path,
                message: "no durable table with this name".to_string(),
            });
        }

        let file = File::open(&path)?;
        Ok(ParquetReader::new(file).finish()?)
    }
}
