//! HTTP client for the external onboarding intake endpoint.
//!
//! [`IntakeClient`] posts an accepted [`OnboardingSubmission`] as JSON to the
//! configured URL using [`reqwest`]. One attempt per call: no retries and no
//! client-side timeout.

use async_trait::async_trait;
use onboard_core::flow::{ForwardFailure, Forwarder};
use onboard_core::submission::OnboardingSubmission;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for intake delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The underlying HTTP request failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The intake endpoint returned a non-2xx status code.
    #[error("Intake endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

impl From<ForwardError> for ForwardFailure {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::HttpStatus(status) => ForwardFailure::Rejected(status),
            ForwardError::Request(e) => ForwardFailure::Transport(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// IntakeClient
// ---------------------------------------------------------------------------

/// Delivers onboarding submissions to the intake endpoint.
#[derive(Debug, Clone, Default)]
pub struct IntakeClient {
    client: reqwest::Client,
}

impl IntakeClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST `submission` to `url` with `Content-Type: application/json`.
    ///
    /// Any 2xx status counts as delivered; the response body is ignored.
    pub async fn post_submission(
        &self,
        url: &str,
        submission: &OnboardingSubmission,
    ) -> Result<(), ForwardError> {
        let response = self.client.post(url).json(submission).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::HttpStatus(status.as_u16()));
        }
        tracing::debug!(url, status = status.as_u16(), "Intake endpoint accepted submission");
        Ok(())
    }
}

#[async_trait]
impl Forwarder for IntakeClient {
    async fn forward(
        &self,
        endpoint: &str,
        submission: &OnboardingSubmission,
    ) -> Result<(), ForwardFailure> {
        self.post_submission(endpoint, submission)
            .await
            .map_err(ForwardFailure::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
