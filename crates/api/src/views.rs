//! Server-side rendering of the onboarding page.
//!
//! The page is a plain HTML form posting back to `/`; the result dialog is
//! rendered as an overlay whenever the session has one visible.

use std::fmt::Write;

use onboard_core::error::FieldErrors;
use onboard_core::flow::{DialogState, FormSession};
use onboard_core::schema::{
    OnboardingInput, FIELD_ACCEPT_TERMS, FIELD_BUDGET_USD, FIELD_COMPANY_NAME, FIELD_EMAIL,
    FIELD_FULL_NAME, FIELD_PROJECT_START_DATE, FIELD_SERVICES,
};
use onboard_core::submission::{OnboardingSubmission, Service};

pub const PAGE_TITLE: &str = "Client Onboarding Form";

const STYLE: &str = "\
body{font-family:sans-serif;background:#fef3c7;display:flex;justify-content:center;padding:2rem}\
form.onboarding{background:#f9fafb;border:1px solid #ddd;border-radius:8px;padding:2rem;max-width:28rem;width:100%}\
form.onboarding>div{margin-bottom:1rem}\
label.field{display:block;font-weight:600;margin-bottom:.25rem}\
input[type=text],input[type=email],input[type=number],input[type=date]{width:100%;padding:.5rem}\
.field-error{color:#dc2626;font-size:.875rem;margin:.25rem 0 0}\
.dialog-backdrop{position:fixed;inset:0;background:rgba(0,0,0,.3);display:flex;align-items:center;justify-content:center}\
.dialog{background:#fff;padding:2rem;border-radius:8px;max-width:24rem;width:100%}\
.dialog.success{border-top:4px solid #22c55e}\
.dialog.failure{border-top:4px solid #ef4444}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the full page for the current session state.
pub fn render_page(session: &FormSession) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n\
         <h1>{PAGE_TITLE}</h1>\n"
    );
    render_form(
        &mut html,
        session.values(),
        session.field_errors(),
        session.is_submitting(),
    );
    if session.dialog().visible {
        render_dialog(&mut html, session.dialog());
    }
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, values: &OnboardingInput, errors: &FieldErrors, submitting: bool) {
    html.push_str("<form class=\"onboarding\" method=\"post\" action=\"/\" novalidate>\n");

    text_input(html, FIELD_FULL_NAME, "Full Name", "text", &values.full_name, errors);
    text_input(html, FIELD_EMAIL, "Email", "email", &values.email, errors);
    text_input(html, FIELD_COMPANY_NAME, "Company Name", "text", &values.company_name, errors);

    html.push_str("<div>\n<span class=\"field\">Services Interested In</span>\n");
    for service in Service::ALL {
        let id = format!("service-{}", escape(&service.slug()));
        let label = escape(service.label());
        let checked = if values.services.iter().any(|s| s == service.label()) {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<div><input id=\"{id}\" type=\"checkbox\" name=\"{FIELD_SERVICES}\" value=\"{label}\"{checked}> \
             <label for=\"{id}\">{label}</label></div>"
        );
    }
    field_error(html, errors, FIELD_SERVICES);
    html.push_str("</div>\n");

    let budget = values.budget_usd.map(budget_value).unwrap_or_default();
    let _ = writeln!(
        html,
        "<div>\n<label class=\"field\" for=\"{FIELD_BUDGET_USD}\">Budget (USD)</label>\n\
         <input id=\"{FIELD_BUDGET_USD}\" name=\"{FIELD_BUDGET_USD}\" type=\"number\" value=\"{}\" placeholder=\"e.g., 50000\">",
        escape(budget.as_str())
    );
    field_error(html, errors, FIELD_BUDGET_USD);
    html.push_str("</div>\n");

    text_input(
        html,
        FIELD_PROJECT_START_DATE,
        "Project Start Date",
        "date",
        &values.project_start_date,
        errors,
    );

    let checked = if values.accept_terms { " checked" } else { "" };
    let _ = writeln!(
        html,
        "<div>\n<input id=\"{FIELD_ACCEPT_TERMS}\" name=\"{FIELD_ACCEPT_TERMS}\" type=\"checkbox\" value=\"true\"{checked}> \
         <label for=\"{FIELD_ACCEPT_TERMS}\">I accept the terms</label>"
    );
    field_error(html, errors, FIELD_ACCEPT_TERMS);
    html.push_str("</div>\n");

    if submitting {
        html.push_str("<button type=\"submit\" disabled>Submitting...</button>\n");
    } else {
        html.push_str("<button type=\"submit\">Submit</button>\n");
    }
    html.push_str("</form>\n");
}

fn text_input(
    html: &mut String,
    field: &str,
    label: &str,
    kind: &str,
    value: &str,
    errors: &FieldErrors,
) {
    let _ = writeln!(
        html,
        "<div>\n<label class=\"field\" for=\"{field}\">{label}</label>\n\
         <input id=\"{field}\" name=\"{field}\" type=\"{kind}\" value=\"{}\">",
        escape(value)
    );
    field_error(html, errors, field);
    html.push_str("</div>\n");
}

fn field_error(html: &mut String, errors: &FieldErrors, field: &str) {
    if let Some(message) = errors.first(field) {
        let _ = writeln!(html, "<p class=\"field-error\">{}</p>", escape(message));
    }
}

/// Budget as typed back into the number input.
fn budget_value(budget: f64) -> String {
    if !budget.is_finite() {
        String::new()
    } else if budget.fract() == 0.0 {
        format!("{budget:.0}")
    } else {
        budget.to_string()
    }
}

fn render_dialog(html: &mut String, dialog: &DialogState) {
    let class = if dialog.is_success { "success" } else { "failure" };
    let _ = writeln!(
        html,
        "<div class=\"dialog-backdrop\" role=\"dialog\" aria-modal=\"true\">\n\
         <div class=\"dialog {class}\">\n<h3>{}</h3>",
        escape(&dialog.message)
    );
    if let (true, Some(data)) = (dialog.is_success, &dialog.data) {
        render_echo(html, data);
    }
    html.push_str(
        "<form method=\"post\" action=\"/dialog/close\"><button type=\"submit\">Close</button></form>\n\
         </div>\n</div>\n",
    );
}

fn render_echo(html: &mut String, data: &OnboardingSubmission) {
    let services = data.services_display();
    let budget = data.budget_display();
    let start_date = data.project_start_date.to_string();
    let rows: [(&str, &str); 6] = [
        ("Full Name", data.full_name.as_str()),
        ("Email", data.email.as_str()),
        ("Company Name", data.company_name.as_str()),
        ("Services", services.as_str()),
        ("Budget (USD)", budget.as_str()),
        ("Project Start Date", start_date.as_str()),
    ];
    html.push_str("<div class=\"echo\">\n");
    for (label, value) in rows {
        let _ = writeln!(html, "<p><strong>{label}:</strong> {}</p>", escape(value));
    }
    html.push_str("</div>\n");
}
