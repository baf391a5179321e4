//! Catalog loading from RON files.
//!
//! All validation happens at load time: a catalog that parses but fails
//! consistency checks is rejected with the full list of problems, so a
//! broken data file never reaches the engine.

use std::path::Path;

use garden_core::catalog::Catalog;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// Failed to read the file.
    #[error("failed to read catalog file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the RON.
    #[error("failed to parse catalog file '{path}': {source}")]
    Parse {
        /// Path to the file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// The catalog parsed but is internally inconsistent.
    #[error("catalog validation failed: {errors:?}")]
    Validation {
        /// Every validation problem found.
        errors: Vec<String>,
    },
}

/// Load and validate a catalog from a RON file.
///
/// # Errors
/// Returns a [`CatalogLoadError`] describing the read, parse, or
/// validation failure.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogLoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_catalog(&contents, &path.display().to_string())?;
    info!(
        path = %path.display(),
        eras = catalog.eras.len(),
        crops = catalog.crops.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse and validate a catalog from a RON string.
///
/// # Errors
/// Returns a [`CatalogLoadError`] describing the parse or validation
/// failure.
pub fn parse_catalog(contents: &str, origin: &str) -> Result<Catalog, CatalogLoadError> {
    let catalog: Catalog = ron::from_str(contents).map_err(|source| CatalogLoadError::Parse {
        path: origin.to_string(),
        source,
    })?;
    catalog
        .validate()
        .map_err(|errors| CatalogLoadError::Validation { errors })?;
    Ok(catalog)
}
