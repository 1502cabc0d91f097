use crate::error::{CrawlError, Result};
use crate::results::RunResult;
use std::path::{Path, PathBuf};

/// Somewhere a finished run is written to
pub trait ResultStore: Send + Sync {
    fn save(&self, result: &RunResult) -> Result<()>;
}

/// Writes the run as pretty JSON to a fixed path, replacing what was there
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for JsonFileStore {
    fn save(&self, result: &RunResult) -> Result<()> {
        let json = result.to_json()?;
        std::fs::write(&self.path, json).map_err(|source| CrawlError::Persist {
            path: self.path.clone(),
            source,
        })?;
        ::log::info!("Data saved to {}", self.path.display());
        Ok(())
    }
}

/// Discards every result
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl ResultStore for NullStore {
    fn save(&self, _result: &RunResult) -> Result<()> {
        Ok(())
    }
}
