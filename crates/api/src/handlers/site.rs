//! Handlers for the site API boundary: OAuth callback and publishing.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::site_api::SiteApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorizedResponse {
    pub authorized: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishInput {
    #[serde(default)]
    pub custom_domains: Vec<String>,
}

/// GET /api/v1/auth/callback?code=...
///
/// Exchange the authorization code and keep the token for later calls.
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<Json<DataResponse<AuthorizedResponse>>> {
    if params.code.trim().is_empty() {
        return Err(AppError::BadRequest("code must not be blank".into()));
    }

    let token = state.site_api.exchange_code(&params.code).await?;
    state.tokens.set(token).await;

    Ok(Json(DataResponse {
        data: AuthorizedResponse { authorized: true },
    }))
}

/// POST /api/v1/sites/{site_id}/publish
///
/// Publish a site with the stored bearer token. Body:
/// `{ "customDomains": [...] }` (optional list).
pub async fn publish_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    Json(input): Json<PublishInput>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let token = state.tokens.get().await.ok_or(SiteApiError::MissingToken)?;

    let published = state
        .site_api
        .publish_site(&token, &site_id, &input.custom_domains)
        .await?;

    Ok(Json(DataResponse { data: published }))
}
