//! HTTP contract of POST /api/generate-meal-plan, driven against the full
//! router with a scripted text generator in place of Gemini.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
    response::Response,
};
use futures::stream;
use http_body_util::BodyExt;
use mealgen::{AppState, create_app};
use mealgen_llm::{LlmError, TextGenerator, TextStream};
use tower::ServiceExt;

#[derive(Clone, Copy)]
enum Script {
    Fragments(&'static [&'static str]),
    FailBeforeFirstFragment,
    RejectRequest,
}

struct FakeGenerator {
    script: Script,
    calls: AtomicUsize,
    last_prompt: std::sync::Mutex<Option<String>>,
}

impl FakeGenerator {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn stream_text(&self, prompt: &str) -> Result<TextStream, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_owned());

        match self.script {
            Script::Fragments(fragments) => Ok(Box::pin(stream::iter(
                fragments.iter().map(|fragment| Ok(fragment.to_string())),
            ))),
            Script::FailBeforeFirstFragment => Ok(Box::pin(stream::iter([Err(
                LlmError::Stream("connection reset".to_string()),
            )]))),
            Script::RejectRequest => Err(LlmError::Status {
                status: 400,
                body: "API key not valid".to_string(),
            }),
        }
    }
}

fn app_with(generator: &Arc<FakeGenerator>) -> axum::Router {
    let generator: Arc<dyn TextGenerator> = generator.clone();
    create_app(AppState::new(Some(generator)))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate-meal-plan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let generator = FakeGenerator::new(Script::Fragments(&["unused"]));
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/generate-meal-plan")
        .body(Body::empty())
        .unwrap();

    let response = app_with(&generator).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], "Method not allowed");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let app = create_app(AppState::new(None));

    let response = app
        .oneshot(post_json(r#"{"days":7,"people":2}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"],
        "GEMINI_API_KEY environment variable is required"
    );
}

#[tokio::test]
async fn test_missing_people_is_bad_request() {
    let generator = FakeGenerator::new(Script::Fragments(&["unused"]));

    let response = app_with(&generator)
        .oneshot(post_json(r#"{"days":3}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Days and people are required"
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_zero_days_is_bad_request() {
    let generator = FakeGenerator::new(Script::Fragments(&["unused"]));

    let response = app_with(&generator)
        .oneshot(post_json(r#"{"days":0,"people":2}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_out_of_range_is_bad_request() {
    let generator = FakeGenerator::new(Script::Fragments(&["unused"]));

    let response = app_with(&generator)
        .oneshot(post_json(r#"{"days":30,"people":2}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Days must be between 1 and 14")
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let generator = FakeGenerator::new(Script::Fragments(&["unused"]));

    let response = app_with(&generator)
        .oneshot(post_json("{days:"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_streams_fragments_in_order() {
    let generator = FakeGenerator::new(Script::Fragments(&[
        "## Day 1\n",
        "* Porridge\n---SHOPPING",
        " LIST---\n* Oats\n",
    ]));

    let response = app_with(&generator)
        .oneshot(post_json(
            r#"{"days":1,"people":2,"excludedIngredients":"nuts"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        body_text(response).await,
        "## Day 1\n* Porridge\n---SHOPPING LIST---\n* Oats\n"
    );

    assert_eq!(generator.calls(), 1);
    let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("meal plan for 1 days for 2 people"));
    assert!(prompt.contains("nuts"));
}

#[tokio::test]
async fn test_upstream_failure_before_first_fragment() {
    let generator = FakeGenerator::new(Script::FailBeforeFirstFragment);

    let response = app_with(&generator)
        .oneshot(post_json(r#"{"days":7,"people":2}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to generate meal plan");
    assert_eq!(body["details"], "Stream read error: connection reset");
}

#[tokio::test]
async fn test_upstream_rejection_is_server_error() {
    let generator = FakeGenerator::new(Script::RejectRequest);

    let response = app_with(&generator)
        .oneshot(post_json(r#"{"days":7,"people":2}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to generate meal plan");
    assert!(body["details"].as_str().unwrap().contains("400"));
}
