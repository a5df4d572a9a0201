//! User repository

use crate::domain::user::{APPLE_IDENTIFIER_FIELD, EMAIL_FIELD};
use crate::domain::{CreateUserInput, User};
use crate::error::Result;
use crate::store::{Document, DocumentStore, Fields};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// First user carrying `apple_identifier`, in store order
    async fn find_by_apple_identifier(&self, apple_identifier: &str) -> Result<Option<User>>;
    /// First user with `email`, in store order
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Set the provider identifier of an existing user, touching no other field
    async fn update_apple_identifier(&self, id: &str, apple_identifier: &str) -> Result<()>;
    async fn create(&self, input: &CreateUserInput) -> Result<User>;
}

pub struct UserRepositoryImpl {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl UserRepositoryImpl {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    async fn find_first(&self, field: &str, value: &str) -> Result<Option<User>> {
        let docs = self
            .store
            .query_by_field(&self.collection, field, value)
            .await?;

        Ok(docs.into_iter().next().map(User::from))
    }
}

impl From<Document> for User {
    fn from(doc: Document) -> Self {
        Self {
            email: doc.get_str(EMAIL_FIELD).unwrap_or_default().to_string(),
            apple_identifier: doc
                .get_str(APPLE_IDENTIFIER_FIELD)
                .unwrap_or_default()
                .to_string(),
            id: doc.id,
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_apple_identifier(&self, apple_identifier: &str) -> Result<Option<User>> {
        self.find_first(APPLE_IDENTIFIER_FIELD, apple_identifier)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_first(EMAIL_FIELD, email).await
    }

    async fn update_apple_identifier(&self, id: &str, apple_identifier: &str) -> Result<()> {
        let mut fields = Fields::new();
        fields.insert(
            APPLE_IDENTIFIER_FIELD.to_string(),
            Value::String(apple_identifier.to_string()),
        );

        self.store
            .update_fields(&self.collection, id, fields)
            .await
    }

    async fn create(&self, input: &CreateUserInput) -> Result<User> {
        let mut fields = Fields::new();
        fields.insert(EMAIL_FIELD.to_string(), Value::String(input.email.clone()));
        fields.insert(
            APPLE_IDENTIFIER_FIELD.to_string(),
            Value::String(input.apple_identifier.clone()),
        );

        self.store
            .create_document(&self.collection, &input.id, fields)
            .await?;

        Ok(User::from(input.clone()))
    }
}
