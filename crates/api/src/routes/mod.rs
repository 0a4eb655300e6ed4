pub mod health;
pub mod onboarding;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /onboarding                 submit (POST)
/// /onboarding/validate        schema dry-run (POST)
/// /onboarding/session         current phase, dialog and field errors (GET)
/// /onboarding/dialog/close    dismiss dialog (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/onboarding", onboarding::onboarding_router())
}
