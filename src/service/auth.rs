//! Provider sign-in

use crate::domain::{ProviderCredential, User};
use crate::error::Result;
use crate::repository::UserRepository;
use crate::service::IdentityResolver;
use metrics::counter;
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

pub struct AuthService<R: UserRepository> {
    resolver: IdentityResolver<R>,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            resolver: IdentityResolver::new(repo),
        }
    }

    /// Turn a provider credential into the user it belongs to.
    ///
    /// The provider identifier doubles as the id of a newly created user.
    pub async fn sign_in(&self, credential: &ProviderCredential) -> Result<User> {
        credential.validate()?;

        let provider_identifier = credential.provider_identifier.as_str();
        let result = self
            .resolver
            .resolve(
                provider_identifier,
                credential.resolution_email(),
                provider_identifier,
            )
            .await;

        let status = if result.is_ok() { "success" } else { "failure" };
        counter!("cardwizz_auth_sign_in_total", "provider" => "apple", "result" => status)
            .increment(1);

        if let Err(e) = &result {
            if e.is_store_error() {
                warn!(error = %e, "Provider sign-in failed in user store");
            }
        }

        result
    }
}
