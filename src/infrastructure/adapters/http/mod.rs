//! HTTP adapter - JSON API in front of the dispatcher

use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::application::errors::ApiError;
use crate::application::messaging::IntentDispatcher;
use crate::domain::entities::Command;
use crate::domain::traits::EffectSink;
use crate::infrastructure::speech::Speaker;

type ApiResult = Result<Json<Value>, ApiError>;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<IntentDispatcher>,
    pub speaker: Arc<Speaker>,
    pub effects: Arc<dyn EffectSink>,
}

impl AppState {
    pub fn new(dispatcher: Arc<IntentDispatcher>, speaker: Arc<Speaker>, effects: Arc<dyn EffectSink>) -> Self {
        Self { dispatcher, speaker, effects }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsParams {
    topic: Option<String>,
}

/// API routes with CORS and request tracing. A bundled front end is served
/// for every other path when `static_dir` is set.
pub fn build_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/api/command", post(api_command))
        .route("/api/status", get(api_status))
        .route("/api/test", get(api_test))
        .route("/api/search", get(api_search))
        .route("/api/weather", get(api_weather))
        .route("/api/news", get(api_news))
        .route("/api/gemini", post(api_gemini))
        .with_state(state);

    if let Some(dir) = static_dir {
        tracing::info!("Serving front end from {}", dir.display());
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).not_found_service(index));
    }

    app.layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(TraceLayer::new_for_http())
}

/// The CORS layer answers every OPTIONS request itself; callers expect an
/// empty 204 rather than 200
async fn preflight_no_content(req: Request, next: Next) -> Response {
    let preflight = req.method() == Method::OPTIONS;
    let mut res = next.run(req).await;
    if preflight && res.status().is_success() {
        *res.status_mut() = StatusCode::NO_CONTENT;
    }
    res
}

/// ISO-8601 local time with microseconds, no offset
fn timestamp() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// A JSON object with at least one field, or the "No JSON data" error
fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<serde_json::Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(map))) if !map.is_empty() => Ok(map),
        Ok(_) => Err(ApiError::BadRequest("No JSON data provided".to_string())),
        Err(rejection) => {
            tracing::debug!("JSON body rejected: {}", rejection);
            Err(ApiError::BadRequest("No JSON data provided".to_string()))
        }
    }
}

async fn api_command(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult {
    tracing::info!("Received command request");
    let data = json_object(body)?;

    let raw = data.get("command").and_then(Value::as_str).unwrap_or_default();
    let Some(command) = Command::parse(raw) else {
        return Err(ApiError::BadRequest("No command provided".to_string()));
    };
    tracing::info!("Processing command: {}", command);

    let dispatcher = state.dispatcher.clone();
    let task_command = command.clone();
    let response = tokio::spawn(async move { dispatcher.dispatch(&task_command).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    state.speaker.announce(&response, state.effects.as_ref());

    Ok(Json(json!({
        "command": command.as_str(),
        "response": response,
        "timestamp": timestamp(),
    })))
}

async fn api_status(State(state): State<AppState>) -> ApiResult {
    Ok(Json(json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "tts_available": state.speaker.available(),
        "timestamp": timestamp(),
    })))
}

async fn api_test() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "KAEL API is working" }))
}

async fn api_search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> ApiResult {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::BadRequest("No search query provided".to_string()));
    }

    let result = state.dispatcher.search().search(&query).await;
    Ok(Json(json!({
        "query": query,
        "result": result,
        "timestamp": timestamp(),
    })))
}

async fn api_weather(State(state): State<AppState>, Query(params): Query<WeatherParams>) -> ApiResult {
    let location = params.location.unwrap_or_default();
    let mut rng = StdRng::from_entropy();
    let result = state.dispatcher.weather().report(&location, &mut rng);
    Ok(Json(json!({
        "location": location,
        "result": result,
        "timestamp": timestamp(),
    })))
}

async fn api_news(State(state): State<AppState>, Query(params): Query<NewsParams>) -> ApiResult {
    let topic = params.topic.unwrap_or_default();
    let mut rng = StdRng::from_entropy();
    let result = state.dispatcher.news().headlines(&topic, &mut rng);
    Ok(Json(json!({
        "topic": topic,
        "result": result,
        "timestamp": timestamp(),
    })))
}

async fn api_gemini(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult {
    let llm = state.dispatcher.llm();
    if !llm.is_enabled() {
        return Err(ApiError::BadRequest("Gemini API is not enabled".to_string()));
    }

    let data = json_object(body)?;
    let prompt = data.get("prompt").and_then(Value::as_str).unwrap_or_default().to_string();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("No prompt provided".to_string()));
    }
    let temperature = data
        .get("temperature")
        .and_then(Value::as_f64)
        .map(|t| t as f32)
        .unwrap_or_else(|| llm.default_temperature());

    let result = llm.ask(&prompt, temperature).await;
    Ok(Json(json!({
        "prompt": prompt,
        "result": result,
        "timestamp": timestamp(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::responses::GREETINGS;
    use crate::domain::entities::Effect;
    use crate::domain::traits::WebSearch;
    use crate::infrastructure::config::Mode;
    use crate::infrastructure::llm::{LLMConfig, LLMMessage, LLMResponse, LLMResult, LlmResponder, Sampling, LLM};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedSearch;

    #[async_trait]
    impl WebSearch for FixedSearch {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn search(&self, query: &str) -> String {
            format!("result for {}", query)
        }
    }

    struct NullSink;

    impl EffectSink for NullSink {
        fn submit(&self, _effect: Effect) {}
    }

    fn app() -> Router {
        let effects: Arc<dyn EffectSink> = Arc::new(NullSink);
        let dispatcher = IntentDispatcher::new(Arc::new(FixedSearch), effects.clone());
        let state = AppState::new(Arc::new(dispatcher), Arc::new(Speaker::disabled()), effects);
        build_app(state, None)
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_command_greeting() {
        let (status, json) = send(post_json("/api/command", r#"{"command":"  HELLO "}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["command"], "hello");
        assert!(GREETINGS.contains(&json["response"].as_str().unwrap()));
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[tokio::test]
    async fn test_command_rejections() {
        let empty = Request::builder().method("POST").uri("/api/command").body(Body::empty()).unwrap();
        let (status, json) = send(empty).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No JSON data provided");

        let (status, json) = send(post_json("/api/command", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No JSON data provided");

        let (status, json) = send(post_json("/api/command", r#"{"command":"   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No command provided");

        let (status, json) = send(post_json("/api/command", r#"{"other":1}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No command provided");
    }

    #[tokio::test]
    async fn test_preflight() {
        let req = Request::builder().method("OPTIONS").uri("/api/command").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/command")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_status_is_stable() {
        let (status, first) = send(get_req("/api/status")).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send(get_req("/api/status")).await;
        assert_eq!(first["status"], "online");
        assert_eq!(first["version"], second["version"]);
        assert_eq!(first["tts_available"], false);
        assert_eq!(first["tts_available"], second["tts_available"]);
    }

    #[tokio::test]
    async fn test_test_endpoint() {
        let (status, json) = send(get_req("/api/test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ok", "message": "KAEL API is working" }));
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (status, json) = send(get_req("/api/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No search query provided");

        let (status, json) = send(get_req("/api/search?q=rust%20lang")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"], "rust lang");
        assert_eq!(json["result"], "result for rust lang");
    }

    #[tokio::test]
    async fn test_weather_and_news_endpoints() {
        let (status, json) = send(get_req("/api/weather?location=Oslo")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["location"], "Oslo");
        assert!(json["result"].as_str().unwrap().contains("Oslo"));

        let (status, json) = send(get_req("/api/news?topic=science")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["result"].as_str().unwrap().contains("science headlines"));

        let (_, json) = send(get_req("/api/news")).await;
        assert_eq!(json["topic"], "");
        assert!(json["result"].as_str().unwrap().contains("general headlines"));
    }

    struct EchoLLM;

    #[async_trait]
    impl LLM for EchoLLM {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(&self, messages: Vec<LLMMessage>, sampling: Sampling) -> LLMResult<LLMResponse> {
            Ok(LLMResponse {
                content: format!("{} @ {}", messages[0].content, sampling.temperature),
                model: "echo".to_string(),
                usage: None,
                finish_reason: None,
            })
        }
    }

    #[tokio::test]
    async fn test_gemini_enabled() {
        let effects: Arc<dyn EffectSink> = Arc::new(NullSink);
        let llm = LlmResponder::new(Some(Arc::new(EchoLLM)), LLMConfig::default(), Mode::Online);
        let dispatcher = IntentDispatcher::new(Arc::new(FixedSearch), effects.clone()).with_llm(llm);
        let app = build_app(AppState::new(Arc::new(dispatcher), Arc::new(Speaker::disabled()), effects), None);

        let res = app.clone().oneshot(post_json("/api/gemini", r#"{"prompt":"Hi","temperature":0.25}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["prompt"], "Hi");
        assert_eq!(json["result"], "Hi @ 0.25");

        let res = app.oneshot(post_json("/api/gemini", r#"{"temperature":0.25}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_gemini_disabled() {
        let (status, json) = send(post_json("/api/gemini", r#"{"prompt":"hi"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Gemini API is not enabled");
    }
}
