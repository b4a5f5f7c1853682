use axum::routing::{get, post};
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// Site API boundary routes, merged into `/api/v1`.
///
/// ```text
/// GET  /auth/callback              -> auth_callback
/// POST /sites/{site_id}/publish    -> publish_site
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/callback", get(site::auth_callback))
        .route("/sites/{site_id}/publish", post(site::publish_site))
}
