//! Common test utilities
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use cardwizz_auth::config::{Config, StoreBackend, StoreConfig, TelemetryConfig};
use cardwizz_auth::error::{AppError, Result};
use cardwizz_auth::store::{Document, DocumentStore, Fields, MemoryDocumentStore};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const USERS: &str = "users";

/// Create a test config backed by the in-memory store
pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 3000,
        store: StoreConfig {
            backend: StoreBackend::Memory,
            users_collection: USERS.to_string(),
            database: None,
        },
        telemetry: TelemetryConfig::default(),
    }
}

/// A write issued against the store
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Update { id: String, fields: Fields },
    Create { id: String, fields: Fields },
}

/// Memory store that records every write it receives
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryDocumentStore,
    writes: Mutex<Vec<Write>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }

    /// Seed a user document without recording the write
    pub async fn seed_user(&self, id: &str, email: Option<&str>, apple_identifier: &str) {
        let mut fields = Fields::new();
        if let Some(email) = email {
            fields.insert("email".to_string(), json!(email));
        }
        fields.insert("appleIdentifier".to_string(), json!(apple_identifier));
        self.inner.create_document(USERS, id, fields).await.unwrap();
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        self.inner.query_by_field(collection, field, value).await
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        self.writes.lock().unwrap().push(Write::Update {
            id: id.to_string(),
            fields: fields.clone(),
        });
        self.inner.update_fields(collection, id, fields).await
    }

    async fn create_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        self.writes.lock().unwrap().push(Write::Create {
            id: id.to_string(),
            fields: fields.clone(),
        });
        self.inner.create_document(collection, id, fields).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

/// Store whose every call fails as if the backend were unreachable
pub struct UnreachableStore;

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn query_by_field(&self, _: &str, _: &str, _: &str) -> Result<Vec<Document>> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn update_fields(&self, _: &str, _: &str, _: Fields) -> Result<()> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn create_document(&self, _: &str, _: &str, _: Fields) -> Result<()> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }
}

/// Shorthand for building an Arc'd recording store
pub fn recording_store() -> Arc<RecordingStore> {
    Arc::new(RecordingStore::new())
}

// ============================================================================
// HTTP Test Helpers
// ============================================================================

/// Make a GET request and return status plus raw body
pub async fn get_text(app: &Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    (status, String::from_utf8_lossy(&body_bytes).into_owned())
}

/// Make a GET request and parse JSON response
pub async fn get_json<T: DeserializeOwned>(app: &Router, path: &str) -> (StatusCode, Option<T>) {
    let (status, body) = get_text(app, path).await;
    (status, serde_json::from_str(&body).ok())
}

/// Make a POST request with JSON body and parse JSON response
pub async fn post_json<T: Serialize, R: DeserializeOwned>(
    app: &Router,
    path: &str,
    body: &T,
) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    if body_bytes.is_empty() {
        return (status, None);
    }

    match serde_json::from_slice(&body_bytes) {
        Ok(data) => (status, Some(data)),
        Err(_) => (status, None),
    }
}
