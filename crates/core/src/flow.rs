//! Submission flow for the onboarding form.
//!
//! A [`FormSession`] is the state of one form instance:
//!
//! ```text
//! idle --submit(valid)--> submitting --2xx--------------> success --close--> idle
//!   |                         |------non-2xx / transport--> failure --close--> idle
//!   |--submit(invalid)--> idle (inline field errors)
//! ```
//!
//! The outbound request is made through the [`Forwarder`] seam so the
//! session itself stays synchronous. Callers that share a session across
//! tasks use [`FormSession::begin`], [`dispatch`] and
//! [`FormSession::complete`] so no lock is held across the request;
//! single-owner callers can use [`FormSession::submit`].

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{CoreError, FieldErrors};
use crate::schema::{self, OnboardingInput};
use crate::submission::OnboardingSubmission;

// ---------------------------------------------------------------------------
// Dialog messages
// ---------------------------------------------------------------------------

pub const MSG_SUBMITTED: &str = "Form submitted successfully!";
pub const MSG_ENDPOINT_MISSING: &str = "API URL is not defined.";
pub const MSG_RETRY: &str = "Please try again.";
pub const MSG_NETWORK: &str = "Network error. Please check your connection.";

// ---------------------------------------------------------------------------
// Forwarder seam
// ---------------------------------------------------------------------------

/// Why a forward attempt did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForwardFailure {
    /// The endpoint answered with a non-2xx status.
    #[error("intake endpoint returned HTTP {0}")]
    Rejected(u16),

    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("intake endpoint unreachable: {0}")]
    Transport(String),
}

/// Sends an accepted submission to the intake endpoint.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// POST `submission` as JSON to `endpoint`, once.
    async fn forward(
        &self,
        endpoint: &str,
        submission: &OnboardingSubmission,
    ) -> Result<(), ForwardFailure>;
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure,
}

/// What the result dialog shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogState {
    pub visible: bool,
    pub is_success: bool,
    pub message: String,
    /// Echo of the accepted submission, only on success.
    pub data: Option<OnboardingSubmission>,
}

impl DialogState {
    fn success(data: OnboardingSubmission) -> Self {
        Self {
            visible: true,
            is_success: true,
            message: MSG_SUBMITTED.to_string(),
            data: Some(data),
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            visible: true,
            is_success: false,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered(OnboardingSubmission),
    EndpointMissing,
    Rejected(u16),
    Unreachable(String),
}

/// A validated submission waiting to be dispatched.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub attempt_id: Uuid,
    pub submission: OnboardingSubmission,
}

/// State of one onboarding form instance.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    phase: FlowPhase,
    values: OnboardingInput,
    field_errors: FieldErrors,
    dialog: DialogState,
    attempt_id: Option<Uuid>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FlowPhase::Submitting
    }

    /// Values currently shown in the form.
    pub fn values(&self) -> &OnboardingInput {
        &self.values
    }

    /// Inline errors from the last rejected submit.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    /// Validate `input` and, if it passes, move to `Submitting`.
    ///
    /// Invalid input keeps the session idle, stores the per-field messages
    /// and returns [`CoreError::InvalidFields`]. A submit while another is
    /// in flight returns [`CoreError::Conflict`] and changes nothing.
    pub fn begin(
        &mut self,
        input: OnboardingInput,
        today: NaiveDate,
    ) -> Result<PendingSubmission, CoreError> {
        if self.is_submitting() {
            return Err(CoreError::Conflict(
                "A submission is already in progress".to_string(),
            ));
        }

        let parsed = schema::safe_parse_on(&input, today);
        self.values = input;

        match parsed {
            Ok(submission) => {
                let attempt_id = Uuid::new_v4();
                self.field_errors = FieldErrors::new();
                self.phase = FlowPhase::Submitting;
                self.attempt_id = Some(attempt_id);
                tracing::debug!(%attempt_id, "Onboarding submission accepted by schema");
                Ok(PendingSubmission {
                    attempt_id,
                    submission,
                })
            }
            Err(errors) => {
                tracing::debug!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "Onboarding submission rejected by schema"
                );
                self.field_errors = errors.clone();
                Err(CoreError::InvalidFields(errors))
            }
        }
    }

    /// Apply the outcome of the in-flight submission.
    ///
    /// Ignored unless the session is `Submitting`. Success clears the form.
    pub fn complete(&mut self, outcome: SubmitOutcome) {
        if !self.is_submitting() {
            tracing::warn!("Submission outcome arrived with no submission in flight");
            return;
        }

        self.dialog = match outcome {
            SubmitOutcome::Delivered(submission) => {
                self.values = OnboardingInput::default();
                self.phase = FlowPhase::Success;
                DialogState::success(submission)
            }
            SubmitOutcome::EndpointMissing => {
                self.phase = FlowPhase::Failure;
                DialogState::failure(MSG_ENDPOINT_MISSING)
            }
            SubmitOutcome::Rejected(_) => {
                self.phase = FlowPhase::Failure;
                DialogState::failure(MSG_RETRY)
            }
            SubmitOutcome::Unreachable(_) => {
                self.phase = FlowPhase::Failure;
                DialogState::failure(MSG_NETWORK)
            }
        };
        self.attempt_id = None;
    }

    /// Dismiss the result dialog and return to idle.
    pub fn close_dialog(&mut self) {
        if matches!(self.phase, FlowPhase::Success | FlowPhase::Failure) {
            self.phase = FlowPhase::Idle;
            self.dialog = DialogState::default();
        }
    }

    /// Validate, dispatch and complete in one go.
    pub async fn submit(
        &mut self,
        input: OnboardingInput,
        today: NaiveDate,
        endpoint: Option<&str>,
        forwarder: &dyn Forwarder,
    ) -> Result<&DialogState, CoreError> {
        let pending = self.begin(input, today)?;
        let outcome = dispatch(endpoint, &pending, forwarder).await;
        self.complete(outcome);
        Ok(&self.dialog)
    }
}

/// Send a pending submission to `endpoint`, exactly once.
///
/// A missing or blank endpoint short-circuits without calling the forwarder.
pub async fn dispatch(
    endpoint: Option<&str>,
    pending: &PendingSubmission,
    forwarder: &dyn Forwarder,
) -> SubmitOutcome {
    let attempt_id = pending.attempt_id;

    let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) else {
        tracing::error!(%attempt_id, "Onboarding endpoint is not configured");
        return SubmitOutcome::EndpointMissing;
    };

    match forwarder.forward(endpoint, &pending.submission).await {
        Ok(()) => {
            tracing::info!(%attempt_id, endpoint, "Onboarding submission delivered");
            SubmitOutcome::Delivered(pending.submission.clone())
        }
        Err(ForwardFailure::Rejected(status)) => {
            tracing::warn!(%attempt_id, endpoint, status, "Onboarding endpoint rejected submission");
            SubmitOutcome::Rejected(status)
        }
        Err(ForwardFailure::Transport(error)) => {
            tracing::warn!(%attempt_id, endpoint, %error, "Onboarding endpoint unreachable");
            SubmitOutcome::Unreachable(error)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
