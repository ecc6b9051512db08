//! `prax serve` -- HTTP JSON API server over pre-loaded model bundles.
//!
//! Exposes the registry views and the consistency checker as an async
//! HTTP service using `axum` + `tokio`.
//!
//! Security features:
//! - CORS headers on all responses (permissive for local dev)
//! - Per-IP rate limiting (default: 60 req/min, configurable)
//! - Optional API key authentication via PRAX_API_KEY env var
//!
//! Endpoints:
//! - GET  /health                            - Server status (exempt from auth)
//! - GET  /models                            - List pre-loaded model bundles
//! - GET  /models/{id}/systems               - System summaries for one model
//! - GET  /models/{id}/fragments/{system}    - Documentation view for one system
//! - GET  /models/{id}/manifest              - Manifest with ETag / If-None-Match
//! - POST /check                             - Stateless consistency check of a posted bundle
//!
//! All responses use Content-Type: application/json. Pre-loaded models
//! are immutable for the life of the process; each request reads them
//! through a shared `Arc` without taking a lock.

mod handlers;
mod middleware;
mod state;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_check, handle_get_fragments, handle_get_systems, handle_health, handle_list_models,
    handle_manifest, handle_not_found,
};
use self::middleware::{auth_middleware, rate_limit_middleware};
use self::state::{AppState, PreloadedModel, RateLimiter};

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default rate limit: 60 requests per minute per IP.
const DEFAULT_RATE_LIMIT: u64 = 60;

/// Rate limit window duration in seconds (1 minute).
const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Start the HTTP server on the given port, optionally pre-loading models.
///
/// When TLS cert/key paths are provided, the server listens over HTTPS
/// using `axum-server` with rustls. Otherwise it uses plain HTTP.
///
/// Security:
/// - CORS: Permissive (`Any` origin) for local dev; tighten for production.
/// - Rate limit: Per-IP, configurable via PRAX_RATE_LIMIT (default 60 req/min).
/// - API key: If PRAX_API_KEY is set, all endpoints except /health require auth.
pub async fn start_server(
    port: u16,
    model_paths: Vec<PathBuf>,
    _tls_cert: Option<PathBuf>,
    _tls_key: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut models = BTreeMap::new();

    // Pre-load models; a file that fails to load is skipped with a warning
    for path in &model_paths {
        match load_model(path) {
            Ok(preloaded) => {
                eprintln!(
                    "Loaded model: {} (from {})",
                    preloaded.model.id,
                    path.display()
                );
                models.insert(preloaded.model.id.clone(), preloaded);
            }
            Err(e) => {
                eprintln!("Warning: failed to load {}: {}", path.display(), e);
            }
        }
    }

    // Rate limit: from PRAX_RATE_LIMIT env var, or default
    let rate_limit = std::env::var("PRAX_RATE_LIMIT")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT);

    // API key: from PRAX_API_KEY env var (None = no auth)
    let api_key = std::env::var("PRAX_API_KEY").ok().filter(|k| !k.is_empty());

    if api_key.is_some() {
        eprintln!("API key authentication enabled");
    }
    eprintln!("Rate limit: {} requests per minute per IP", rate_limit);

    let state = Arc::new(AppState {
        models,
        rate_limiter: RateLimiter::new(rate_limit),
        api_key,
    });

    // CORS: permissive for local dev
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/models", get(handle_list_models))
        .route("/models/{id}/systems", get(handle_get_systems))
        .route("/models/{id}/fragments/{system}", get(handle_get_fragments))
        .route("/models/{id}/manifest", get(handle_manifest))
        .route("/check", post(handle_check))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);

    // TLS support via axum-server + rustls (requires `tls` feature)
    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) = (&_tls_cert, &_tls_key) {
        let config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;
        let socket_addr: std::net::SocketAddr = addr.parse()?;
        eprintln!("Prax model server listening on https://0.0.0.0:{}", port);
        axum_server::bind_rustls(socket_addr, config)
            .serve(app.into_make_service_with_connect_info::<std::net::SocketAddr>())
            .await?;
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Prax model server listening on http://0.0.0.0:{}", port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Read one bundle file and prepare its request-time views: the typed
/// registry plus the manifest envelope, computed once at startup.
fn load_model(path: &std::path::Path) -> Result<PreloadedModel, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let doc: serde_json::Value = serde_json::from_str(&text)?;
    let model = prax_interchange::from_bundle(&doc)?;
    let canonical = prax_interchange::to_bundle(&model.registry, &model.id)?;
    let manifest = crate::manifest::build_manifest(canonical);
    let etag = manifest
        .get("etag")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Ok(PreloadedModel {
        model,
        manifest,
        etag,
    })
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    eprintln!("\nReceived shutdown signal...");
}
