//! Route definitions for the onboarding form.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{form, onboarding};
use crate::state::AppState;

/// Server-rendered page routes, mounted at the root.
///
/// ```text
/// GET    /               -> show_form
/// POST   /               -> submit_form      (urlencoded)
/// POST   /dialog/close   -> close_dialog
/// ```
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(form::show_form).post(form::submit_form))
        .route("/dialog/close", post(form::close_dialog))
}

/// Routes mounted at `/onboarding`.
///
/// ```text
/// POST   /                -> submit_onboarding
/// POST   /validate        -> validate_onboarding  (dry-run)
/// GET    /session         -> get_session
/// POST   /dialog/close    -> close_dialog
/// ```
pub fn onboarding_router() -> Router<AppState> {
    Router::new()
        .route("/", post(onboarding::submit_onboarding))
        .route("/validate", post(onboarding::validate_onboarding))
        .route("/session", get(onboarding::get_session))
        .route("/dialog/close", post(onboarding::close_dialog))
}
