pub mod form;
pub mod onboarding;

use chrono::Local;
use onboard_core::flow::{self, DialogState, SubmitOutcome};
use onboard_core::schema::OnboardingInput;

use crate::error::AppResult;
use crate::session::SharedSession;
use crate::state::AppState;

/// Run one submission attempt against a visitor's form session.
///
/// The session lock is released while the intake request is in flight;
/// the `Submitting` phase keeps a second attempt out in the meantime.
/// Delivery and completion run on their own task, so the session always
/// leaves `Submitting` even if this request is timed out or abandoned.
pub(crate) async fn run_submission(
    state: &AppState,
    session: SharedSession,
    input: OnboardingInput,
) -> AppResult<DialogState> {
    let today = Local::now().date_naive();
    let pending = session.lock().await.begin(input, today)?;
    let attempt_id = pending.attempt_id;

    let endpoint = state.config.onboard_url.clone();
    let forwarder = state.forwarder.clone();
    let delivery_session = session.clone();
    let delivery = tokio::spawn(async move {
        let outcome = flow::dispatch(endpoint.as_deref(), &pending, forwarder.as_ref()).await;
        let mut session = delivery_session.lock().await;
        session.complete(outcome);
        session.dialog().clone()
    });

    match delivery.await {
        Ok(dialog) => Ok(dialog),
        Err(e) => {
            tracing::error!(%attempt_id, error = %e, "Submission delivery task failed");
            let mut session = session.lock().await;
            session.complete(SubmitOutcome::Unreachable(e.to_string()));
            Ok(session.dialog().clone())
        }
    }
}
