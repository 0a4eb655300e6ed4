#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::request::Builder;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use onboard_api::config::ServerConfig;
use onboard_api::router::build_app_router;
use onboard_api::state::AppState;
use onboard_core::flow::{ForwardFailure, Forwarder};
use onboard_core::submission::OnboardingSubmission;

pub const TEST_ENDPOINT: &str = "http://intake.test/onboard";

/// Forwarder that records submissions and answers with a fixed result.
pub struct StubForwarder {
    result: Result<(), ForwardFailure>,
    calls: AtomicUsize,
    received: Mutex<Vec<(String, OnboardingSubmission)>>,
}

impl StubForwarder {
    pub fn answering(result: Result<(), ForwardFailure>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn ok() -> Arc<Self> {
        Self::answering(Ok(()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<(String, OnboardingSubmission)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for StubForwarder {
    async fn forward(
        &self,
        endpoint: &str,
        submission: &OnboardingSubmission,
    ) -> Result<(), ForwardFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .unwrap()
            .push((endpoint.to_string(), submission.clone()));
        self.result.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(onboard_url: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        onboard_url: onboard_url.map(str::to_string),
        session_capacity: 100,
        session_idle_secs: 600,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(forwarder: Arc<dyn Forwarder>, onboard_url: Option<&str>) -> Router {
    build_test_app_with(test_config(onboard_url), forwarder)
}

/// Build the router from an explicit config.
pub fn build_test_app_with(config: ServerConfig, forwarder: Arc<dyn Forwarder>) -> Router {
    let state = AppState::new(config.clone(), forwarder);
    build_app_router(state, &config).expect("test router")
}

/// The `name=value` part of a response's `Set-Cookie` header, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Sends requests the way a browser would: the session cookie handed out
/// by the server is stored and sent back on every later request.
#[derive(Clone)]
pub struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    async fn send(&mut self, builder: Builder, body: Body) -> Response<Body> {
        let builder = match &self.cookie {
            Some(cookie) => builder.header("cookie", cookie),
            None => builder,
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        if let Some(cookie) = session_cookie(&response) {
            self.cookie = Some(cookie);
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri), Body::empty()).await
    }

    pub async fn post_json(&mut self, uri: &str, body: Value) -> Response<Body> {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        self.send(builder, Body::from(body.to_string())).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> Response<Body> {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        self.send(builder, Body::from(body.to_string())).await
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// The reference valid submission.
pub fn ada_json() -> Value {
    json!({
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "companyName": "Analytical Engines Ltd",
        "services": ["UI/UX", "Web Dev"],
        "budgetUsd": 50000,
        "projectStartDate": today_iso(),
        "acceptTerms": true,
    })
}

/// The reference valid submission as an urlencoded form body.
pub fn ada_form() -> String {
    format!(
        "fullName=Ada+Lovelace&email=ada%40example.com&companyName=Analytical+Engines+Ltd\
         &services=UI%2FUX&services=Web+Dev&budgetUsd=50000&projectStartDate={}&acceptTerms=true",
        today_iso()
    )
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body is JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("response body is UTF-8")
}
