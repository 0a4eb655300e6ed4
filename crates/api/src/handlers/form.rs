//! Handlers for the server-rendered onboarding page.
//!
//! `GET /` renders the visitor's session; `POST /` submits the form and
//! `POST /dialog/close` dismisses the result dialog. Both POSTs redirect
//! back to `/` so a reload never resubmits.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;

use onboard_core::error::CoreError;
use onboard_core::schema::{
    OnboardingInput, FIELD_ACCEPT_TERMS, FIELD_BUDGET_USD, FIELD_COMPANY_NAME, FIELD_EMAIL,
    FIELD_FULL_NAME, FIELD_PROJECT_START_DATE, FIELD_SERVICES,
};

use crate::error::{AppError, AppResult};
use crate::handlers::run_submission;
use crate::session::Visitor;
use crate::state::AppState;
use crate::views;

/// Build raw form values from urlencoded pairs.
///
/// `services` may repeat (one pair per checked box). An empty budget is
/// "not given"; non-numeric budget text becomes NaN so the schema reports
/// it as not an integer. Unknown keys are ignored.
pub fn input_from_pairs(pairs: Vec<(String, String)>) -> OnboardingInput {
    let mut input = OnboardingInput::default();
    for (key, value) in pairs {
        match key.as_str() {
            FIELD_FULL_NAME => input.full_name = value,
            FIELD_EMAIL => input.email = value,
            FIELD_COMPANY_NAME => input.company_name = value,
            FIELD_SERVICES => input.services.push(value),
            FIELD_BUDGET_USD => {
                let trimmed = value.trim();
                input.budget_usd = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<f64>().unwrap_or(f64::NAN))
                };
            }
            FIELD_PROJECT_START_DATE => input.project_start_date = value,
            FIELD_ACCEPT_TERMS => input.accept_terms = matches!(value.as_str(), "true" | "on" | "1"),
            _ => {}
        }
    }
    input
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub async fn show_form(visitor: Visitor) -> impl IntoResponse {
    let page = views::render_page(&*visitor.session.lock().await);
    (visitor.cookie(), Html(page))
}

// ---------------------------------------------------------------------------
// POST /
// ---------------------------------------------------------------------------

/// Submit the form. Field errors and in-flight conflicts are shown on the
/// page rather than returned as error responses.
pub async fn submit_form(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let session = visitor.session.clone();
    match run_submission(&state, session, input_from_pairs(pairs)).await {
        Ok(_) => {}
        Err(AppError::Core(CoreError::InvalidFields(_))) => {}
        Err(AppError::Core(CoreError::Conflict(msg))) => {
            tracing::info!(reason = %msg, "Form submit ignored");
        }
        Err(other) => return Err(other),
    }
    Ok((visitor.cookie(), Redirect::to("/")))
}

// ---------------------------------------------------------------------------
// POST /dialog/close
// ---------------------------------------------------------------------------

pub async fn close_dialog(visitor: Visitor) -> impl IntoResponse {
    visitor.session.lock().await.close_dialog();
    (visitor.cookie(), Redirect::to("/"))
}
