//! CSV dataset loader and the process-wide load-once cache

use crate::error::LoadError;
use crate::types::transaction::Dataset;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reads transaction CSV files into memory
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a CSV file, trimming whitespace from the column labels
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), "Loading transaction dataset");

        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }

    /// Parse CSV from any reader; `origin` names the source in errors
    pub fn from_reader<R: std::io::Read>(reader: R, origin: &Path) -> Result<Dataset, LoadError> {
        let csv_err = |source: csv::Error| LoadError::Csv {
            path: origin.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_err)?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(LoadError::MissingHeader {
                path: origin.to_path_buf(),
            });
        }

        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        let dataset = Dataset::new(headers.iter(), rows);
        info!(
            path = %origin.display(),
            rows = dataset.len(),
            columns = ?dataset.headers(),
            "Dataset loaded"
        );
        Ok(dataset)
    }
}

/// Memoized dataset for the lifetime of the process.
///
/// The first successful load is kept and never invalidated. A failed load
/// is not remembered, so a corrected file is picked up on the next call.
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Shared dataset, loading it on first successful access
    pub fn get_or_load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.cell.get() {
            debug!(path = %self.path.display(), "Dataset served from cache");
            return Ok(Arc::clone(dataset));
        }

        self.cell
            .get_or_try_init(|| DatasetLoader::load(&self.path).map(Arc::new))
            .map(Arc::clone)
            .map_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Dataset load failed");
                e
            })
    }
}
