//! Document store abstraction
//!
//! The user collection lives in a document-oriented store reached through the
//! [`DocumentStore`] trait. The resolver never talks to a concrete backend, so
//! tests and local development can run against [`MemoryDocumentStore`] while
//! deployments use [`MySqlDocumentStore`].

pub mod memory;
pub mod mysql;

pub use memory::MemoryDocumentStore;
pub use mysql::MySqlDocumentStore;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Top-level fields of a document
pub type Fields = Map<String, Value>;

/// A stored document: its id within the collection plus its fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// String value of a top-level field, if present and a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents whose string field `field` equals `value`, in the store's
    /// natural order.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>>;

    /// Merge `fields` into an existing document. Fields not named are left
    /// untouched.
    async fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Create a document. Fails with `Conflict` if the id is already taken.
    async fn create_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Cheap reachability check
    async fn ping(&self) -> Result<()>;
}

lazy_static::lazy_static! {
    /// Field names accepted in queries and updates
    pub static ref FIELD_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Reject field names that cannot be addressed safely by every backend
pub fn validate_field_name(field: &str) -> Result<()> {
    if FIELD_NAME_REGEX.is_match(field) {
        Ok(())
    } else {
        Err(AppError::Store(format!("Invalid field name '{}'", field)))
    }
}
