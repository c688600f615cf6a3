//! Document Store
//!
//! Durable mapping from record identifier to a JSON document. Writes go through
//! a single read-merge-write primitive; `upsert` and `update` are built on it.
//! The store serializes its own writes; concurrent callers see last-write-wins.

pub mod persistence;

use crate::error::StoreError;
use chrono::Utc;
use serde_json::{Map, Value};

pub use persistence::SledDocumentStore;

/// A stored document; always a JSON object carrying its own `id`.
pub type Document = Value;

/// Merge callback: receives the current document (if any) and returns the
/// document to store, or `None` to leave the store untouched.
pub type MergeFn<'a> = dyn FnMut(Option<&Document>) -> Option<Document> + 'a;

/// Keyed document storage.
pub trait DocumentStore: Send + Sync {
    /// Point lookup.
    fn get(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Atomically replace the document under `id` with the result of `merge`.
    ///
    /// Returns the document stored under `id` after the call.
    fn upsert_with(&self, id: &str, merge: &mut MergeFn<'_>) -> Result<Option<Document>, StoreError>;

    /// Alias of [`get`](Self::get) matching the boundary's vocabulary.
    fn find_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.get(id)
    }

    /// Find-or-create: merge the top-level fields of `patch` into the document
    /// under `id`, creating it when absent.
    fn upsert(&self, id: &str, patch: &Document) -> Result<Document, StoreError> {
        let fields = patch_fields(id, patch)?;
        let stored = self.upsert_with(id, &mut |current| merge_patch(id, current, fields))?;
        stored.ok_or_else(|| StoreError::NotAnObject(id.to_string()))
    }

    /// Update-only: merge `patch` into an existing document.
    ///
    /// Returns `false`, without writing, when no document exists under `id`.
    fn update(&self, id: &str, patch: &Document) -> Result<bool, StoreError> {
        let fields = patch_fields(id, patch)?;
        let stored = self.upsert_with(id, &mut |current| {
            current.and_then(|existing| merge_patch(id, Some(existing), fields))
        })?;
        Ok(stored.is_some())
    }
}

fn patch_fields<'p>(id: &str, patch: &'p Document) -> Result<&'p Map<String, Value>, StoreError> {
    patch
        .as_object()
        .ok_or_else(|| StoreError::NotAnObject(id.to_string()))
}

/// Merge `fields` over `current`, stamping `id`, `createdAt` and `updatedAt`.
///
/// Returns `None` when the merge would not change any field, so repeating a
/// patch leaves the stored document (timestamps included) as it was.
pub fn merge_patch(
    id: &str,
    current: Option<&Document>,
    fields: &Map<String, Value>,
) -> Option<Document> {
    let existing = current.and_then(Value::as_object);
    let mut merged = existing.cloned().unwrap_or_default();
    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }
    merged.insert("id".to_string(), Value::String(id.to_string()));

    if let Some(existing) = existing {
        if *existing == merged {
            return None;
        }
    }

    let now = Value::String(Utc::now().to_rfc3339());
    merged
        .entry("createdAt".to_string())
        .or_insert_with(|| now.clone());
    merged.insert("updatedAt".to_string(), now);
    Some(Value::Object(merged))
}
