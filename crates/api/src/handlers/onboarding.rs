//! JSON handlers for the onboarding form.
//!
//! These mirror the HTML form flow for scripted clients: validate without
//! sending, submit through the visitor's session, inspect or dismiss the
//! current dialog. The session cookie works the same as for the page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use onboard_core::error::FieldErrors;
use onboard_core::flow::{DialogState, FlowPhase, FormSession};
use onboard_core::schema::{self, OnboardingInput};

use crate::error::{AppError, AppResult};
use crate::handlers::run_submission;
use crate::response::DataResponse;
use crate::session::Visitor;
use crate::state::AppState;

/// Snapshot of the form session for JSON clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: FlowPhase,
    pub dialog: DialogState,
    pub field_errors: FieldErrors,
}

impl From<&FormSession> for SessionView {
    fn from(session: &FormSession) -> Self {
        Self {
            phase: session.phase(),
            dialog: session.dialog().clone(),
            field_errors: session.field_errors().clone(),
        }
    }
}

fn decode_input(value: serde_json::Value) -> Result<OnboardingInput, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Malformed onboarding input: {e}")))
}

// ---------------------------------------------------------------------------
// POST /onboarding/validate
// ---------------------------------------------------------------------------

/// Run the schema only. Returns the normalized submission on success.
pub async fn validate_onboarding(
    Json(value): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let submission = schema::parse_value(value)?;
    Ok(Json(DataResponse { data: submission }))
}

// ---------------------------------------------------------------------------
// POST /onboarding
// ---------------------------------------------------------------------------

/// Validate and forward a submission, returning the resulting dialog.
///
/// Field errors are a 400; a submit while another is in flight is a 409.
/// Delivery failures are not HTTP errors here: they come back as a failure
/// dialog, exactly as the HTML form shows them.
pub async fn submit_onboarding(
    State(state): State<AppState>,
    visitor: Visitor,
    Json(value): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let input = decode_input(value)?;
    let dialog = run_submission(&state, visitor.session.clone(), input).await?;

    tracing::debug!(
        session = %visitor.id,
        is_success = dialog.is_success,
        "Onboarding submission finished"
    );

    Ok((visitor.cookie(), Json(DataResponse { data: dialog })))
}

// ---------------------------------------------------------------------------
// GET /onboarding/session
// ---------------------------------------------------------------------------

pub async fn get_session(visitor: Visitor) -> AppResult<impl IntoResponse> {
    let view = SessionView::from(&*visitor.session.lock().await);
    Ok((visitor.cookie(), Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// POST /onboarding/dialog/close
// ---------------------------------------------------------------------------

/// Dismiss the result dialog and return the session to idle.
pub async fn close_dialog(visitor: Visitor) -> AppResult<impl IntoResponse> {
    let view = {
        let mut session = visitor.session.lock().await;
        session.close_dialog();
        SessionView::from(&*session)
    };
    Ok((visitor.cookie(), Json(DataResponse { data: view })))
}
