//! The accepted onboarding submission and the service catalogue.
//!
//! [`OnboardingSubmission`] is only ever produced by the schema (see
//! [`crate::schema`]); its serialized form is the JSON body posted to the
//! intake endpoint, so field names are the camelCase wire names.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// A service the client can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Branding")]
    Branding,
    #[serde(rename = "Web Dev")]
    WebDev,
    #[serde(rename = "Mobile App")]
    MobileApp,
}

impl Service {
    /// All services, in the order the form lists them.
    pub const ALL: [Service; 4] = [
        Service::UiUx,
        Service::Branding,
        Service::WebDev,
        Service::MobileApp,
    ];

    /// Wire label, also used as the checkbox value.
    pub fn label(self) -> &'static str {
        match self {
            Service::UiUx => "UI/UX",
            Service::Branding => "Branding",
            Service::WebDev => "Web Dev",
            Service::MobileApp => "Mobile App",
        }
    }

    /// Label with whitespace replaced by `-`, usable as an HTML id suffix.
    pub fn slug(self) -> String {
        self.label().replace(char::is_whitespace, "-")
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Service {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.label() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid service '{s}'. Must be one of: {}",
                    service_labels()
                ))
            })
    }
}

/// Comma-separated list of every service label.
pub fn service_labels() -> String {
    Service::ALL
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A fully validated onboarding submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmission {
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub services: Vec<Service>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<u32>,
    pub project_start_date: NaiveDate,
    pub accept_terms: bool,
}

impl OnboardingSubmission {
    /// Services joined with `, ` for display.
    pub fn services_display(&self) -> String {
        self.services
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Budget rendered as `$50,000`, or `N/A` when not given.
    pub fn budget_display(&self) -> String {
        match self.budget_usd {
            Some(amount) => format!("${}", group_thousands(amount)),
            None => "N/A".to_string(),
        }
    }
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
