//! Sled-backed document store.

use super::{Document, DocumentStore, MergeFn};
use crate::error::StoreError;
use sled::IVec;
use std::path::Path;
use tracing::{debug, trace};

const DOCUMENTS_TREE: &str = "documents";

/// Documents stored as JSON bytes in a sled tree, keyed by id.
pub struct SledDocumentStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledDocumentStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Opened document store");
        Self::from_db(db)
    }

    /// A throwaway store that is deleted when dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StoreError> {
        let tree = db.open_tree(DOCUMENTS_TREE)?;
        Ok(Self { db, tree })
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Ids of every stored document.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        self.tree
            .iter()
            .keys()
            .map(|key| {
                key.map(|k| String::from_utf8_lossy(&k).into_owned())
                    .map_err(StoreError::from)
            })
            .collect()
    }
}

fn decode(id: &str, bytes: Option<&IVec>) -> Result<Option<Document>, StoreError> {
    bytes
        .map(|b| {
            serde_json::from_slice(b).map_err(|source| StoreError::Corrupt {
                id: id.to_string(),
                source,
            })
        })
        .transpose()
}

impl DocumentStore for SledDocumentStore {
    fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let bytes = self.tree.get(id)?;
        decode(id, bytes.as_ref())
    }

    fn upsert_with(&self, id: &str, merge: &mut MergeFn<'_>) -> Result<Option<Document>, StoreError> {
        loop {
            let current_bytes = self.tree.get(id)?;
            let current = decode(id, current_bytes.as_ref())?;
            let Some(next) = merge(current.as_ref()) else {
                trace!(id, "Document unchanged");
                return Ok(current);
            };
            let encoded = serde_json::to_vec(&next).map_err(|source| StoreError::Encode {
                id: id.to_string(),
                source,
            })?;

            match self.tree.compare_and_swap(id, current_bytes, Some(encoded))? {
                Ok(()) => {
                    self.tree.flush()?;
                    debug!(id, "Document written");
                    return Ok(Some(next));
                }
                Err(_) => {
                    trace!(id, "Concurrent write detected, retrying merge");
                    continue;
                }
            }
        }
    }
}
