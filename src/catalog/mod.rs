//! Query catalog construction.
//!
//! - [`builtin`] - default audit queries
//! - [`normalize`] - shape detection for query config files

mod builtin;
mod normalize;

pub use builtin::builtin_catalog;
pub use normalize::{normalize, CatalogDocument};

use crate::error::{AuditError, Result};
use crate::models::{QueryCatalog, QueryDefinition};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where the queries of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
    /// A single query given on the command line.
    AdHoc { name: String, query: String },
}

impl CatalogSource {
    pub fn load(&self) -> Result<QueryCatalog> {
        match self {
            Self::Builtin => {
                log::info!("Using built-in ALZ audit queries");
                Ok(builtin_catalog())
            }
            Self::File(path) => {
                log::info!("Loading queries from: {}", path.display());
                read_catalog_file(path)
            }
            Self::AdHoc { name, query } => {
                let def = QueryDefinition::new(name.as_str(), query.as_str())
                    .with_description("Ad-hoc query")
                    .with_output_file(name.as_str());
                Ok(std::iter::once(def).collect())
            }
        }
    }
}

/// Read a JSON query config and normalize it.
pub fn read_catalog_file(path: &Path) -> Result<QueryCatalog> {
    let json = std::fs::read_to_string(path).map_err(|source| AuditError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&json).map_err(|source| AuditError::CatalogParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize(&doc))
}
