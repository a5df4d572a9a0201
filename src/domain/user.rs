//! User domain model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Document field holding the user's email
pub const EMAIL_FIELD: &str = "email";
/// Document field holding the provider identifier
pub const APPLE_IDENTIFIER_FIELD: &str = "appleIdentifier";

/// User entity
///
/// `apple_identifier` is empty until the account has signed in through the
/// provider at least once. A non-empty value belongs to at most one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub apple_identifier: String,
}

impl User {
    pub fn has_apple_identifier(&self) -> bool {
        !self.apple_identifier.is_empty()
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 255))]
    pub id: String,
    /// Not validated as an address: it may be a relay email or a placeholder
    #[validate(length(max = 320))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub apple_identifier: String,
}

impl From<CreateUserInput> for User {
    fn from(input: CreateUserInput) -> Self {
        Self {
            id: input.id,
            email: input.email,
            apple_identifier: input.apple_identifier,
        }
    }
}
