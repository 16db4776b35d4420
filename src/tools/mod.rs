//! Catalog maintenance tools run from the command line
//!
//! - `csv_import.rs` - bulk load games from a CSV export
//! - `icon_patch.rs` - replace one game's icon, or import a folder of icons

use thiserror::Error;

use crate::state::library::LibraryError;

pub mod csv_import;
pub mod icon_patch;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl ImportError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.display().to_string(),
            source,
        }
    }
}
