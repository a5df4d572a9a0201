//! In-process document store

use super::{validate_field_name, Document, DocumentStore, Fields};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Document store kept in memory.
///
/// Documents are returned in insertion order. Fields registered with
/// [`MemoryDocumentStore::with_unique_field`] reject a second document holding
/// the same non-empty string value.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique_fields: Vec<(String, String)>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce uniqueness of non-empty string values of `field` in `collection`
    pub fn with_unique_field(
        mut self,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.unique_fields.push((collection.into(), field.into()));
        self
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Fetch a document by id
    pub async fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned())
    }

    fn check_unique(
        &self,
        collection: &str,
        docs: &[Document],
        id: &str,
        fields: &Fields,
    ) -> Result<()> {
        for (unique_collection, field) in &self.unique_fields {
            if unique_collection != collection {
                continue;
            }
            let Some(value) = fields.get(field).and_then(|v| v.as_str()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if docs
                .iter()
                .any(|doc| doc.id != id && doc.get_str(field) == Some(value))
            {
                return Err(AppError::Conflict(format!(
                    "Another document in '{}' already has {} = '{}'",
                    collection, field, value
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        validate_field_name(field)?;

        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.get_str(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(docs)
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        for field in fields.keys() {
            validate_field_name(field)?;
        }

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        self.check_unique(collection, docs, id, &fields)?;

        let doc = docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| {
                AppError::Store(format!("Document '{}/{}' does not exist", collection, id))
            })?;

        for (key, value) in fields {
            doc.fields.insert(key, value);
        }

        Ok(())
    }

    async fn create_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        for field in fields.keys() {
            validate_field_name(field)?;
        }

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|doc| doc.id == id) {
            return Err(AppError::Conflict(format!(
                "Document '{}/{}' already exists",
                collection, id
            )));
        }
        self.check_unique(collection, docs, id, &fields)?;

        docs.push(Document::new(id, fields));
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
