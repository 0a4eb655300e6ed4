//! Integration tests for the server-rendered onboarding page.
//!
//! Drives the page the way a browser would: POST the urlencoded form, follow
//! the redirect with a GET, and look at the rendered HTML. The session cookie
//! is carried between requests by [`Browser`].

mod common;

use axum::http::StatusCode;
use common::{
    ada_form, body_text, build_test_app, get, session_cookie, Browser, StubForwarder,
    TEST_ENDPOINT,
};
use onboard_core::flow::ForwardFailure;

const DIALOG: &str = "role=\"dialog\"";

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect location")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn get_renders_empty_form() {
    let app = build_test_app(StubForwarder::ok(), Some(TEST_ENDPOINT));
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    let cookie = session_cookie(&response).expect("session cookie");
    assert!(cookie.starts_with("onboard_session="));

    let html = body_text(response).await;
    assert!(html.contains("<h1>Client Onboarding Form</h1>"));
    assert!(html.contains("<button type=\"submit\">Submit</button>"));
    assert!(!html.contains(DIALOG));
}

#[tokio::test]
async fn valid_post_shows_success_dialog_and_clears_form() {
    let forwarder = StubForwarder::ok();
    let mut browser = Browser::new(build_test_app(forwarder.clone(), Some(TEST_ENDPOINT)));

    let response = browser.post_form("/", &ada_form()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(forwarder.calls(), 1);

    let html = body_text(browser.get("/").await).await;
    assert!(html.contains(DIALOG));
    assert!(html.contains("Form submitted successfully!"));
    assert!(html.contains("<strong>Full Name:</strong> Ada Lovelace"));
    assert!(html.contains("<strong>Services:</strong> UI/UX, Web Dev"));
    assert!(html.contains("<strong>Budget (USD):</strong> $50,000"));
    assert!(html.contains("id=\"fullName\" name=\"fullName\" type=\"text\" value=\"\""));

    // Dismissing the dialog leaves an empty idle form.
    let response = browser.post_form("/dialog/close", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = body_text(browser.get("/").await).await;
    assert!(!html.contains(DIALOG));
}

#[tokio::test]
async fn invalid_post_shows_inline_errors_without_forwarding() {
    let forwarder = StubForwarder::ok();
    let mut browser = Browser::new(build_test_app(forwarder.clone(), Some(TEST_ENDPOINT)));
    let body = ada_form().replace("fullName=Ada+Lovelace", "fullName=A");
    let body = body.replace("&acceptTerms=true", "");

    let response = browser.post_form("/", &body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(forwarder.calls(), 0);

    let html = body_text(browser.get("/").await).await;
    assert!(html.contains("Full name must be at least 2 characters"));
    assert!(html.contains("You must accept the terms"));
    assert!(html.contains("value=\"ada@example.com\""));
    assert!(!html.contains(DIALOG));
}

#[tokio::test]
async fn non_numeric_budget_is_a_field_error() {
    let mut browser = Browser::new(build_test_app(StubForwarder::ok(), Some(TEST_ENDPOINT)));
    let body = ada_form().replace("budgetUsd=50000", "budgetUsd=lots");

    browser.post_form("/", &body).await;

    let html = body_text(browser.get("/").await).await;
    assert!(html.contains("Budget must be an integer"));
}

#[tokio::test]
async fn empty_budget_is_accepted() {
    let forwarder = StubForwarder::ok();
    let mut browser = Browser::new(build_test_app(forwarder.clone(), Some(TEST_ENDPOINT)));
    let body = ada_form().replace("budgetUsd=50000", "budgetUsd=");

    browser.post_form("/", &body).await;

    let received = forwarder.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].1.budget_usd, None);
    let html = body_text(browser.get("/").await).await;
    assert!(html.contains("<strong>Budget (USD):</strong> N/A"));
}

#[tokio::test]
async fn failed_delivery_keeps_values_for_retry() {
    let mut browser = Browser::new(build_test_app(
        StubForwarder::answering(Err(ForwardFailure::Rejected(503))),
        Some(TEST_ENDPOINT),
    ));

    browser.post_form("/", &ada_form()).await;

    let html = body_text(browser.get("/").await).await;
    assert!(html.contains("dialog failure"));
    assert!(html.contains("Please try again."));
    assert!(html.contains("value=\"Ada Lovelace\""));
    assert!(html.contains("value=\"UI/UX\" checked"));
}

#[tokio::test]
async fn missing_endpoint_shows_configuration_dialog() {
    let forwarder = StubForwarder::ok();
    let mut browser = Browser::new(build_test_app(forwarder.clone(), None));

    browser.post_form("/", &ada_form()).await;

    let html = body_text(browser.get("/").await).await;
    assert!(html.contains("API URL is not defined."));
    assert_eq!(forwarder.calls(), 0);
}

// ---------------------------------------------------------------------------
// Each visitor has their own form
// ---------------------------------------------------------------------------

#[tokio::test]
async fn visitors_do_not_see_each_others_form() {
    let app = build_test_app(
        StubForwarder::answering(Err(ForwardFailure::Rejected(503))),
        Some(TEST_ENDPOINT),
    );
    let mut ada = Browser::new(app.clone());
    let mut other = Browser::new(app);

    ada.post_form("/", &ada_form()).await;
    let html = body_text(ada.get("/").await).await;
    assert!(html.contains("value=\"ada@example.com\""));
    assert!(html.contains(DIALOG));

    let html = body_text(other.get("/").await).await;
    assert_ne!(other.cookie(), ada.cookie());
    assert!(!html.contains("ada@example.com"));
    assert!(!html.contains("Ada Lovelace"));
    assert!(!html.contains(DIALOG));

    // A failed delivery for one visitor leaves the other's form untouched.
    let invalid = ada_form().replace("&acceptTerms=true", "");
    other.post_form("/", &invalid).await;
    let html = body_text(ada.get("/").await).await;
    assert!(!html.contains("You must accept the terms"));
    assert!(html.contains("Please try again."));
}

#[tokio::test]
async fn success_echo_is_not_shown_to_a_new_visitor() {
    let app = build_test_app(StubForwarder::ok(), Some(TEST_ENDPOINT));
    let mut ada = Browser::new(app.clone());

    ada.post_form("/", &ada_form()).await;
    assert!(body_text(ada.get("/").await).await.contains("Analytical Engines Ltd"));

    let html = body_text(get(app, "/").await).await;
    assert!(!html.contains("Analytical Engines Ltd"));
    assert!(!html.contains("Form submitted successfully!"));
}
