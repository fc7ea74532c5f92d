//! Axum route handlers for the StudentVibe HTTP adapter.
//!
//! # Routes
//!
//! - `GET     /health`       Returns `{"status": "ok", "version": "..."}`
//! - `POST    /api/humanize` Accepts `{"text", "persona"}`, returns `{original, humanized, persona}`
//! - `OPTIONS /api/humanize` Pre-flight, answered by the CORS layer

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::engine::HumanizerEngine;
use crate::error::{Error, Result};
use crate::persona::PersonaCatalog;

/// Worst-case UTF-8 bytes per character of request text.
const BYTES_PER_CHAR: usize = 4;

/// Room for the JSON envelope and escapes around the text.
const BODY_SLACK_BYTES: usize = 4096;

/// Shared application state for the HTTP server.
///
/// Engines are built once per persona at startup and shared read-only
/// across requests.
#[derive(Clone)]
pub struct AppState {
    engines: Arc<HashMap<String, Arc<HumanizerEngine>>>,
    default_persona: String,
    max_input_chars: usize,
}

impl AppState {
    /// Build one engine per catalog persona using the configured tuning.
    pub fn new(catalog: &PersonaCatalog, config: &AppConfig) -> Result<Self> {
        if !catalog.contains(&config.personas.default) {
            return Err(Error::persona_not_found(&config.personas.default));
        }

        let mut engines = HashMap::with_capacity(catalog.len());
        for persona in catalog.iter() {
            let engine = HumanizerEngine::with_settings(persona, &config.engine)?;
            engines.insert(persona.name.clone(), Arc::new(engine));
        }

        debug!(personas = engines.len(), "HTTP engines prepared");

        Ok(Self {
            engines: Arc::new(engines),
            default_persona: config.personas.default.clone(),
            max_input_chars: config.server.max_input_chars,
        })
    }

    fn engine(&self, persona: &str) -> Result<Arc<HumanizerEngine>> {
        self.engines
            .get(persona)
            .cloned()
            .ok_or_else(|| Error::persona_not_found(persona))
    }

    /// Largest body buffered for a request, `None` when input is uncapped.
    fn max_body_bytes(&self) -> Option<usize> {
        (self.max_input_chars > 0)
            .then(|| self.max_input_chars * BYTES_PER_CHAR + BODY_SLACK_BYTES)
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let body_limit = match state.max_body_bytes() {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/humanize", post(humanize_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body of `POST /api/humanize`.
#[derive(Debug, Deserialize)]
pub struct HumanizeRequest {
    #[serde(default)]
    pub text: String,

    /// Absent means the default persona; an explicit `null` names no persona.
    #[serde(default, deserialize_with = "present")]
    pub persona: Option<Option<String>>,
}

/// Mark a field as present even when its value is `null`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Successful response of `POST /api/humanize`.
#[derive(Debug, Serialize)]
pub struct HumanizeResponse {
    pub original: String,
    pub humanized: String,
    pub persona: String,
}

/// Errors become `{"error": "..."}` with the status their code maps to.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// GET /health: liveness check.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/humanize: run the pipeline for one request.
///
/// The pipeline is synchronous, so it runs on the blocking pool.
async fn humanize_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Json<HumanizeResponse>, Error> {
    let request_id = Uuid::new_v4();

    let request = read_body(&state, body)
        .and_then(|bytes| parse_request(&bytes))
        .map_err(|e| {
            warn!(request_id = %request_id, error = %e.format_for_log(), "Rejected humanize request");
            e
        })?;

    let persona = match request.persona {
        None => state.default_persona.clone(),
        Some(Some(name)) => name,
        Some(None) => return Err(Error::persona_not_found("null")),
    };

    let actual = request.text.chars().count();
    if state.max_input_chars > 0 && actual > state.max_input_chars {
        warn!(request_id = %request_id, chars = actual, "Input too large");
        return Err(Error::InputTooLarge {
            limit: state.max_input_chars,
            actual,
        });
    }

    let engine = state.engine(&persona).map_err(|e| {
        warn!(request_id = %request_id, error = %e.format_for_log(), "Unknown persona");
        e
    })?;

    info!(request_id = %request_id, persona = %persona, chars = actual, "Humanize request");

    let original = request.text;
    let text = original.clone();
    let humanized = tokio::task::spawn_blocking(move || engine.process(&text))
        .await
        .map_err(|e| {
            error!(request_id = %request_id, error = %e, "Humanize task failed");
            Error::Internal(format!("Humanize task failed: {}", e))
        })?;

    debug!(request_id = %request_id, output_chars = humanized.chars().count(), "Humanize request complete");

    Ok(Json(HumanizeResponse {
        original,
        humanized,
        persona,
    }))
}

/// Buffered body, or the error a failed read maps to.
fn read_body(state: &AppState, body: std::result::Result<Bytes, BytesRejection>) -> Result<Bytes> {
    match body {
        Ok(bytes) => Ok(bytes),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(Error::BodyTooLarge {
                limit_bytes: state.max_body_bytes().unwrap_or_default(),
            })
        }
        Err(rejection) => Err(Error::Internal(rejection.body_text())),
    }
}

fn parse_request(body: &[u8]) -> Result<HumanizeRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::missing_input("Empty request body"));
    }
    serde_json::from_slice::<HumanizeRequest>(body).map_err(|e| Error::RequestMalformed {
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app_with(&AppConfig::default())
    }

    fn app_with(config: &AppConfig) -> Router {
        let catalog = PersonaCatalog::bundled().unwrap();
        app_router(AppState::new(&catalog, config).unwrap())
    }

    fn humanize_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/humanize")
            .header(header::ORIGIN, "http://localhost:3000")
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_humanize_success() {
        let body = r#"{"text": "The tapestry was intricate.", "persona": "High School"}"#;
        let response = test_app().oneshot(humanize_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["original"], "The tapestry was intricate.");
        assert_eq!(json["persona"], "High School");
        let humanized = json["humanized"].as_str().unwrap();
        assert!(!humanized.contains("tapestry"));
        assert!(!humanized.contains("intricate"));
    }

    #[tokio::test]
    async fn test_humanize_defaults_to_college() {
        let response = test_app()
            .oneshot(humanize_request(r#"{"text": "Hello there."}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["persona"], "College");
    }

    #[tokio::test]
    async fn test_humanize_missing_text_is_empty() {
        let response = test_app()
            .oneshot(humanize_request(r#"{"persona": "Creative"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["original"], "");
        assert_eq!(json["humanized"], "");
    }

    #[tokio::test]
    async fn test_empty_body_rejected() {
        let response = test_app().oneshot(humanize_request(Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert_eq!(json["error"], "Empty request body");
    }

    #[tokio::test]
    async fn test_malformed_json_is_server_error() {
        let response = test_app().oneshot(humanize_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("Malformed request"));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_server_error() {
        for body in [r#""hi""#, r#"{"text": 123}"#, r#"{"text": null}"#] {
            let response = test_app().oneshot(humanize_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body {}", body);

            let json = json_body(response).await;
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_null_persona_is_unknown() {
        let response = test_app()
            .oneshot(humanize_request(r#"{"text": "Hi.", "persona": null}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert_eq!(json["error"], "Persona 'null' not found");
    }

    #[tokio::test]
    async fn test_unknown_persona_rejected() {
        let response = test_app()
            .oneshot(humanize_request(r#"{"text": "Hi.", "persona": "Pirate"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert_eq!(json["error"], "Persona 'Pirate' not found");
    }

    #[tokio::test]
    async fn test_input_cap_enforced() {
        let mut config = AppConfig::default();
        config.server.max_input_chars = 10;

        let response = app_with(&config)
            .oneshot(humanize_request(r#"{"text": "This sentence is far too long."}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("10 characters"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_error() {
        let mut config = AppConfig::default();
        config.server.max_input_chars = 10;

        let body = format!(r#"{{"text": "{}"}}"#, "a".repeat(10_000));
        let response = app_with(&config)
            .oneshot(humanize_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("bytes"));
    }

    #[tokio::test]
    async fn test_body_over_default_axum_limit_is_json_error() {
        let body = format!(r#"{{"text": "{}"}}"#, "a".repeat(2_400_000));
        let response = test_app().oneshot(humanize_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_uncapped_input_accepts_large_body() {
        let mut config = AppConfig::default();
        config.server.max_input_chars = 0;

        let body = format!(r#"{{"text": "{}"}}"#, "a".repeat(2_200_000));
        let response = app_with(&config)
            .oneshot(humanize_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_preflight_headers() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/humanize")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let methods: Vec<&str> = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .split(',')
            .map(str::trim)
            .collect();
        assert_eq!(methods, vec!["POST", "OPTIONS"]);

        assert!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .eq_ignore_ascii_case("content-type"));
    }

    #[tokio::test]
    async fn test_post_allows_any_origin() {
        let response = test_app()
            .oneshot(humanize_request(r#"{"text": "Hello there."}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let rejected = test_app()
            .oneshot(humanize_request(r#"{"text": "Hi.", "persona": "Pirate"}"#))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_unknown_default_persona_fails_startup() {
        let catalog = PersonaCatalog::bundled().unwrap();
        let mut config = AppConfig::default();
        config.personas.default = "Pirate".to_string();

        assert!(matches!(
            AppState::new(&catalog, &config),
            Err(Error::PersonaNotFound { .. })
        ));
    }
}
