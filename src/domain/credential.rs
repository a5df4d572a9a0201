//! Sign-in credential handed over by the identity provider

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A blank placeholder email would match every account stored without one
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Provider credential, decoupled from any platform SDK type.
///
/// Providers such as Sign in with Apple only return the email on the first
/// authorization; later sign-ins carry the identifier alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredential {
    /// Stable per-user identifier issued by the provider
    #[validate(length(min = 1, max = 255))]
    pub provider_identifier: String,
    pub email: Option<String>,
    /// Opaque user string, used as a placeholder email when none is supplied
    #[validate(custom(function = "validate_not_blank"))]
    pub raw_user_string: String,
}

impl ProviderCredential {
    pub fn new(provider_identifier: impl Into<String>, email: Option<String>) -> Self {
        let provider_identifier = provider_identifier.into();
        Self {
            raw_user_string: provider_identifier.clone(),
            provider_identifier,
            email,
        }
    }

    /// Email to resolve with: the provider email when present and non-blank,
    /// otherwise the raw user string.
    pub fn resolution_email(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => email,
            _ => &self.raw_user_string,
        }
    }
}
