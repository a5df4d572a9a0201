//! CardWizz Auth - provider sign-in backend
//!
//! Resolves identity-provider sign-ins (Sign in with Apple) to durable user
//! records held in a document store, and serves the result over HTTP.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod migration;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
