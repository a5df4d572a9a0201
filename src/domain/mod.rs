//! Domain models

pub mod credential;
pub mod user;

pub use credential::ProviderCredential;
pub use user::{CreateUserInput, User};
