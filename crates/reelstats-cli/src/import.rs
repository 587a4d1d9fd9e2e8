//! Loads documents from a JSON export into a collection.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use reelstats::{DocumentStore, StoreError};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON array of documents")]
    NotAnArray,

    #[error("Document #{index} has no string \"id\" field")]
    MissingId { index: usize },

    #[error("Failed to store document '{id}': {source}")]
    Store {
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Splits an export into `(id, body)` pairs. The `id` key is removed from
/// the body.
pub fn parse_documents(content: &str, path: &Path) -> Result<Vec<(String, Value)>, ImportError> {
    let value: Value = serde_json::from_str(content).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, mut item)| {
            let id = item
                .as_object_mut()
                .and_then(|obj| obj.remove("id"))
                .and_then(|id| id.as_str().map(str::to_string))
                .ok_or(ImportError::MissingId { index })?;
            Ok((id, item))
        })
        .collect()
}

/// Writes every document from `path` into `collection`, replacing existing
/// documents with the same id. Returns the number written.
pub async fn import_file(
    store: &dyn DocumentStore,
    collection: &str,
    path: &Path,
) -> Result<usize, ImportError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let documents = parse_documents(&content, path)?;
    let count = documents.len();

    for (id, body) in documents {
        store
            .put(collection, &id, body)
            .await
            .map_err(|source| ImportError::Store { id, source })?;
    }

    log::info!("Imported {} documents into '{}'", count, collection);
    Ok(count)
}
