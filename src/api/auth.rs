//! Provider sign-in endpoint

use crate::api::SuccessResponse;
use crate::domain::{ProviderCredential, User};
use crate::error::Result;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/auth/apple`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleSignInRequest {
    pub provider_identifier: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Defaults to the provider identifier
    #[serde(default)]
    pub raw_user_string: Option<String>,
}

impl From<AppleSignInRequest> for ProviderCredential {
    fn from(request: AppleSignInRequest) -> Self {
        let raw_user_string = request
            .raw_user_string
            .unwrap_or_else(|| request.provider_identifier.clone());

        ProviderCredential {
            provider_identifier: request.provider_identifier,
            email: request.email,
            raw_user_string,
        }
    }
}

/// Resolve an Apple sign-in to its user
pub async fn apple_sign_in(
    State(state): State<AppState>,
    Json(request): Json<AppleSignInRequest>,
) -> Result<Json<SuccessResponse<User>>> {
    let credential = ProviderCredential::from(request);
    let user = state.auth_service.sign_in(&credential).await?;
    Ok(Json(SuccessResponse::new(user)))
}
