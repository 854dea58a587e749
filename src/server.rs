//! HTTP server
//!
//! `GET /query?text=...` interprets the question, runs the SQL and returns
//! `{columns, rows}`. `GET /` serves a small browser page over that endpoint,
//! and `GET /health` reports liveness.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::engine::Store;
use crate::error::{DrillError, DrillResult};
use crate::interpreter::Interpreter;

pub const MISSING_TEXT: &str = "Please provide a 'text' query parameter.";
pub const NOT_UNDERSTOOD: &str = "Could not understand your query. Please try rephrasing.";

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPTS_JS: &str = include_str!("../static/scripts.js");

/// Shared state for request handlers
pub struct AppState {
    pub interpreter: Interpreter,
    pub store: Store,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Create the router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/static/scripts.js", get(scripts))
        .route(
            "/.well-known/appspecific/com.chrome.devtools.json",
            get(devtools_config),
        )
        .route("/health", get(health_check))
        .route("/query", get(run_query))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn scripts() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPTS_JS,
    )
}

/// Chrome DevTools requests this on every page; answer with an empty object.
pub async fn devtools_config() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn run_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Response {
    let Some(text) = params.text.filter(|t| !t.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_TEXT);
    };

    let Some(sql) = state.interpreter.interpret(&text) else {
        tracing::info!(query = %text, "query not understood");
        return error_response(StatusCode::BAD_REQUEST, NOT_UNDERSTOOD);
    };

    match state.store.fetch(&sql).await {
        Ok(result) => {
            tracing::info!(query = %text, rows = result.rows.len(), "query answered");
            Json(result).into_response()
        }
        Err(e) => {
            tracing::error!(query = %text, error = %e, "query execution failed");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error_response(status, e.to_string())
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> DrillResult<()> {
    let router = create_router(state);

    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|e| DrillError::Server(format!("Failed to bind to {}: {}", config.bind, e)))?;

    tracing::info!("DataDrill listening on {}", config.bind);
    tracing::info!("   GET /                - Browser page");
    tracing::info!("   GET /query?text=...  - Ask a question");
    tracing::info!("   GET /health          - Health check");

    axum::serve(listener, router)
        .await
        .map_err(|e| DrillError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let store = Store::connect_lazy(&DatabaseConfig::default()).unwrap();
        create_router(Arc::new(AppState {
            interpreter: Interpreter::default(),
            store,
        }))
    }

    async fn get_raw(uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, body) = get_raw(uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, content_type, body) = get_raw("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("id=\"queryInput\""));
        assert!(body.contains("/static/scripts.js"));
    }

    #[tokio::test]
    async fn test_page_script() {
        let (status, content_type, body) = get_raw("/static/scripts.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/javascript"));
        assert!(body.contains("/query?text="));
        assert!(body.contains("No results found."));
    }

    #[tokio::test]
    async fn test_devtools_config() {
        let (status, body) = get("/.well-known/appspecific/com.chrome.devtools.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_missing_text() {
        let (status, body) = get("/query").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_TEXT);
    }

    #[tokio::test]
    async fn test_blank_text() {
        let (status, body) = get("/query?text=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_TEXT);
    }

    #[tokio::test]
    async fn test_not_understood() {
        let (status, body) = get("/query?text=what%27s%20the%20weather").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], NOT_UNDERSTOOD);
    }

    #[tokio::test]
    async fn test_failed_extraction_is_not_understood() {
        let (status, body) = get("/query?text=show%20orders%20for").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], NOT_UNDERSTOOD);
    }
}
