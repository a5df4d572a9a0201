//! Provider identity resolution
//!
//! Maps the attributes of a provider sign-in onto exactly one stored user:
//! an identifier match wins, then an email match gets the identifier attached,
//! and otherwise a new user is created. Each step only runs when the previous
//! one found nothing, and at most one write happens per call.

use crate::domain::{CreateUserInput, User};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use validator::Validate;

/// Which branch produced the resolved user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Existing user already carried the provider identifier
    Matched,
    /// Existing user matched by email, provider identifier attached
    Linked,
    /// No match, user created
    Created,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Matched => "matched",
            ResolutionOutcome::Linked => "linked",
            ResolutionOutcome::Created => "created",
        }
    }
}

pub struct IdentityResolver<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> Clone for IdentityResolver<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: UserRepository> IdentityResolver<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn resolve(
        &self,
        external_id: &str,
        email: &str,
        provider_identifier: &str,
    ) -> Result<User> {
        self.resolve_with_outcome(external_id, email, provider_identifier)
            .await
            .map(|(user, _)| user)
    }

    /// Same as [`resolve`](Self::resolve), also reporting which branch was taken
    pub async fn resolve_with_outcome(
        &self,
        external_id: &str,
        email: &str,
        provider_identifier: &str,
    ) -> Result<(User, ResolutionOutcome)> {
        let start = Instant::now();
        let result = self
            .find_or_create(external_id, email, provider_identifier)
            .await;

        let outcome = match &result {
            Ok((_, outcome)) => outcome.as_str(),
            Err(_) => "error",
        };
        counter!("cardwizz_identity_resolutions_total", "outcome" => outcome).increment(1);
        histogram!("cardwizz_identity_resolution_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        result
    }

    async fn find_or_create(
        &self,
        external_id: &str,
        email: &str,
        provider_identifier: &str,
    ) -> Result<(User, ResolutionOutcome)> {
        // An empty identifier would match every user not yet linked
        if provider_identifier.is_empty() {
            return Err(AppError::BadRequest(
                "Provider identifier must not be empty".to_string(),
            ));
        }
        // Same for a blank email in the email lookup
        if email.trim().is_empty() {
            return Err(AppError::BadRequest("Email must not be blank".to_string()));
        }

        if let Some(user) = self
            .repo
            .find_by_apple_identifier(provider_identifier)
            .await?
        {
            debug!(user_id = %user.id, "Resolved user by provider identifier");
            return Ok((user, ResolutionOutcome::Matched));
        }

        if let Some(mut user) = self.repo.find_by_email(email).await? {
            if user.has_apple_identifier() {
                warn!(
                    user_id = %user.id,
                    "Replacing provider identifier on email-matched user"
                );
            }
            self.repo
                .update_apple_identifier(&user.id, provider_identifier)
                .await?;
            user.apple_identifier = provider_identifier.to_string();
            info!(user_id = %user.id, "Linked provider identifier to existing user");
            return Ok((user, ResolutionOutcome::Linked));
        }

        let input = CreateUserInput {
            id: external_id.to_string(),
            email: email.to_string(),
            apple_identifier: provider_identifier.to_string(),
        };
        input.validate()?;

        let user = self.repo.create(&input).await?;
        info!(user_id = %user.id, "Created user for provider sign-in");
        Ok((user, ResolutionOutcome::Created))
    }
}
