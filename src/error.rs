use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Quantity '{entity}': {field} mismatch: <<{existing}>> vs <<{incoming}>>")]
    Conflict {
        entity: String,
        field: &'static str,
        existing: String,
        incoming: String,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl CatalogError {
    pub fn conflict(
        entity: impl Into<String>,
        field: &'static str,
        existing: impl ToString,
        incoming: impl ToString,
    ) -> Self {
        Self::Conflict {
            entity: entity.into(),
            field,
            existing: existing.to_string(),
            incoming: incoming.to_string(),
        }
    }

    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_entity_and_values() {
        let err = CatalogError::conflict("T", "units", "K", "Pa");
        let message = err.to_string();

        assert!(err.is_conflict());
        assert!(message.contains("'T'"));
        assert!(message.contains("<<K>>"));
        assert!(message.contains("<<Pa>>"));
    }
}
