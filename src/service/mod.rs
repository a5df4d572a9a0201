//! Business logic layer

pub mod auth;
pub mod identity;

pub use auth::AuthService;
pub use identity::{IdentityResolver, ResolutionOutcome};
