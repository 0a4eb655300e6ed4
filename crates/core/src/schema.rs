//! Onboarding form validation schema.
//!
//! [`OnboardingInput`] carries the raw, loosely typed form values. The
//! per-field rules live on it as a [`validator::Validate`] derive. The start
//! date rule needs a reference date and the full name charset reports
//! alongside the length rule, so both are checked after the derive runs.
//! Every field is checked independently and all failures are reported
//! together; acceptance is all-or-nothing.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{CoreError, FieldErrors};
use crate::submission::{service_labels, OnboardingSubmission, Service};

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

pub const FULL_NAME_MIN_CHARS: usize = 2;
pub const FULL_NAME_MAX_CHARS: usize = 80;
pub const COMPANY_NAME_MIN_CHARS: usize = 2;
pub const COMPANY_NAME_MAX_CHARS: usize = 100;
pub const MIN_SERVICES: usize = 2;
pub const BUDGET_MIN_USD: u32 = 100;
pub const BUDGET_MAX_USD: u32 = 1_000_000;

/// Letters, whitespace, apostrophes and hyphens.
const FULL_NAME_PATTERN: &str = r"^[A-Za-z\s'-]+$";

static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FULL_NAME_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_COMPANY_NAME: &str = "companyName";
pub const FIELD_SERVICES: &str = "services";
pub const FIELD_BUDGET_USD: &str = "budgetUsd";
pub const FIELD_PROJECT_START_DATE: &str = "projectStartDate";
pub const FIELD_ACCEPT_TERMS: &str = "acceptTerms";

/// Map a struct field name to its wire name.
fn wire_field_name(field: &str) -> &str {
    match field {
        "full_name" => FIELD_FULL_NAME,
        "email" => FIELD_EMAIL,
        "company_name" => FIELD_COMPANY_NAME,
        "services" => FIELD_SERVICES,
        "budget_usd" => FIELD_BUDGET_USD,
        "project_start_date" => FIELD_PROJECT_START_DATE,
        "accept_terms" => FIELD_ACCEPT_TERMS,
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw form values as entered by the user.
///
/// Missing keys deserialize to empty values so they surface as field errors
/// rather than as a structural rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingInput {
    #[validate(custom(function = validate_full_name_length))]
    pub full_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = validate_company_name))]
    pub company_name: String,

    #[validate(custom(function = validate_services))]
    pub services: Vec<String>,

    #[validate(custom(function = validate_budget))]
    pub budget_usd: Option<f64>,

    pub project_start_date: String,

    #[validate(custom(function = validate_accept_terms))]
    pub accept_terms: bool,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_full_name_length(value: &str) -> Result<(), ValidationError> {
    let chars = value.chars().count();
    if chars < FULL_NAME_MIN_CHARS {
        return Err(rule_error(
            "length",
            "Full name must be at least 2 characters",
        ));
    }
    if chars > FULL_NAME_MAX_CHARS {
        return Err(rule_error(
            "length",
            "Full name must be less than 80 characters",
        ));
    }
    Ok(())
}

fn check_full_name_charset(value: &str) -> Result<(), &'static str> {
    if FULL_NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err("Only letters, spaces, apostrophes, and hyphens allowed")
    }
}

fn validate_company_name(value: &str) -> Result<(), ValidationError> {
    let chars = value.chars().count();
    if chars < COMPANY_NAME_MIN_CHARS {
        return Err(rule_error(
            "length",
            "Company name must be at least 2 characters",
        ));
    }
    if chars > COMPANY_NAME_MAX_CHARS {
        return Err(rule_error(
            "length",
            "Company name must be less than 100 characters",
        ));
    }
    Ok(())
}

fn validate_services(values: &[String]) -> Result<(), ValidationError> {
    if let Some(unknown) = values.iter().find(|v| v.parse::<Service>().is_err()) {
        return Err(rule_error(
            "enum",
            format!("Invalid service '{unknown}'. Must be one of: {}", service_labels()),
        ));
    }
    if distinct_services(values).len() < MIN_SERVICES {
        return Err(rule_error("min_items", "Select at least two services"));
    }
    Ok(())
}

/// Non-numeric budget text arrives as NaN and fails the integer rule.
fn validate_budget(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(rule_error("integer", "Budget must be an integer"));
    }
    if value < f64::from(BUDGET_MIN_USD) {
        return Err(rule_error("range", "Minimum budget is 100"));
    }
    if value > f64::from(BUDGET_MAX_USD) {
        return Err(rule_error("range", "Maximum budget is 1,000,000"));
    }
    Ok(())
}

fn validate_accept_terms(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(rule_error("accepted", "You must accept the terms"))
    }
}

/// Known services in first-seen order, duplicates dropped.
fn distinct_services(values: &[String]) -> Vec<Service> {
    let mut services = Vec::with_capacity(values.len());
    for service in values.iter().filter_map(|v| v.parse::<Service>().ok()) {
        if !services.contains(&service) {
            services.push(service);
        }
    }
    services
}

/// Parse a start date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Timestamps are reduced to their local calendar date.
pub fn parse_start_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.with_timezone(&Local).date_naive())
    })
}

fn check_start_date(value: &str, today: NaiveDate) -> Result<NaiveDate, &'static str> {
    if value.trim().is_empty() {
        return Err("Project start date is required");
    }
    match parse_start_date(value) {
        Some(date) if date >= today => Ok(date),
        _ => Err("Project start date must be today or later"),
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                out.add(wire_field_name(&field), message);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate `input` against the schema, using `today` as the earliest
/// acceptable start date.
pub fn safe_parse_on(
    input: &OnboardingInput,
    today: NaiveDate,
) -> Result<OnboardingSubmission, FieldErrors> {
    let mut errors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if let Err(message) = check_full_name_charset(&input.full_name) {
        errors.add(FIELD_FULL_NAME, message);
    }

    let start_date = match check_start_date(&input.project_start_date, today) {
        Ok(date) => Some(date),
        Err(message) => {
            errors.add(FIELD_PROJECT_START_DATE, message);
            None
        }
    };

    match start_date {
        Some(project_start_date) if errors.is_empty() => Ok(OnboardingSubmission {
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            company_name: input.company_name.clone(),
            services: distinct_services(&input.services),
            // Range-checked above, so the cast is lossless.
            budget_usd: input.budget_usd.map(|b| b as u32),
            project_start_date,
            accept_terms: input.accept_terms,
        }),
        _ => Err(errors),
    }
}

/// Validate `input` against today's local date.
pub fn safe_parse(input: &OnboardingInput) -> Result<OnboardingSubmission, FieldErrors> {
    safe_parse_on(input, Local::now().date_naive())
}

/// Like [`safe_parse`], but failures become a [`CoreError`].
pub fn parse(input: &OnboardingInput) -> Result<OnboardingSubmission, CoreError> {
    safe_parse(input).map_err(CoreError::InvalidFields)
}

/// Parse an arbitrary JSON value, rejecting structural mismatches (wrong
/// JSON types) before any field rule runs.
pub fn parse_value(value: serde_json::Value) -> Result<OnboardingSubmission, CoreError> {
    let input: OnboardingInput = serde_json::from_value(value)
        .map_err(|e| CoreError::Validation(format!("Malformed onboarding input: {e}")))?;
    parse(&input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
