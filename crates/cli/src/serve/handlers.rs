//! HTTP route handlers: health, model views, manifest, and the
//! stateless consistency check.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use prax_core::SystemId;

use super::json_error;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "prax_version": prax_core::PRAX_BUNDLE_VERSION,
    });
    (StatusCode::OK, Json(response))
}

/// GET /models
pub(crate) async fn handle_list_models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let model_list: Vec<serde_json::Value> = state
        .models
        .values()
        .map(|preloaded| {
            let registry = &preloaded.model.registry;
            let systems: Vec<&SystemId> = registry.systems().map(|s| &s.id).collect();
            let fault_trees: Vec<&prax_core::FaultTreeId> =
                registry.fault_trees().map(|t| &t.id).collect();
            serde_json::json!({
                "id": preloaded.model.id,
                "system_count": systems.len(),
                "systems": systems,
                "fault_trees": fault_trees,
                "fragment_count": registry.documentation().len(),
            })
        })
        .collect();

    let response = serde_json::json!({ "models": model_list });
    (StatusCode::OK, Json(response))
}

/// GET /models/{id}/systems
pub(crate) async fn handle_get_systems(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let preloaded = match state.models.get(&id) {
        Some(m) => m,
        None => {
            return json_error(StatusCode::NOT_FOUND, &format!("model '{}' not found", id))
                .into_response()
        }
    };

    let registry = &preloaded.model.registry;
    let adjacency = registry.dependency_adjacency();

    let systems: Vec<serde_json::Value> = registry
        .systems()
        .map(|system| {
            let supporting: Vec<&SystemId> = adjacency
                .get(&system.id)
                .map(|targets| targets.clone())
                .unwrap_or_default();
            let fault_trees: Vec<&prax_core::FaultTreeId> = registry
                .fault_trees_for_system(&system.id)
                .iter()
                .map(|t| &t.id)
                .collect();
            serde_json::json!({
                "id": system.id,
                "name": system.name,
                "component_count": system.modeled_components.len(),
                "supporting_systems": supporting,
                "fault_trees": fault_trees,
            })
        })
        .collect();

    let response = serde_json::json!({ "systems": systems });
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /models/{id}/fragments/{system}
pub(crate) async fn handle_get_fragments(
    State(state): State<Arc<AppState>>,
    Path((id, system)): Path<(String, String)>,
) -> Response {
    let preloaded = match state.models.get(&id) {
        Some(m) => m,
        None => {
            return json_error(StatusCode::NOT_FOUND, &format!("model '{}' not found", id))
                .into_response()
        }
    };

    let registry = &preloaded.model.registry;
    let system_id = SystemId::from(system.as_str());
    if registry.system(&system_id).is_none() {
        return json_error(
            StatusCode::NOT_FOUND,
            &format!("system '{}' not found in model '{}'", system, id),
        )
        .into_response();
    }

    let fragments: Vec<serde_json::Value> = registry
        .fragments_for_system(&system_id)
        .iter()
        .map(|(category, fragment)| {
            serde_json::json!({
                "category": category.key(),
                "fragment": fragment,
            })
        })
        .collect();

    let response = serde_json::json!({
        "model": id,
        "system": system,
        "fragments": fragments,
    });
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /models/{id}/manifest
///
/// Returns the manifest envelope for one pre-loaded model. Sets the
/// ETag response header and supports If-None-Match for conditional
/// requests (304 Not Modified).
pub(crate) async fn handle_manifest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let preloaded = match state.models.get(&id) {
        Some(m) => m,
        None => {
            return json_error(StatusCode::NOT_FOUND, &format!("model '{}' not found", id))
                .into_response()
        }
    };

    let etag_quoted = format!("\"{}\"", preloaded.etag);

    // Check If-None-Match
    if let Some(inm) = headers.get(header::IF_NONE_MATCH) {
        if let Ok(inm_str) = inm.to_str() {
            if inm_str == etag_quoted || inm_str == preloaded.etag {
                return StatusCode::NOT_MODIFIED.into_response();
            }
        }
    }

    let mut response = Json(preloaded.manifest.clone()).into_response();
    if let Ok(val) = etag_quoted.parse() {
        response.headers_mut().insert(header::ETAG, val);
    }
    response
}

/// POST /check
///
/// Stateless consistency check: the request body is a complete model
/// bundle, a fresh registry is built from it, and the diagnostic
/// report is returned. Nothing is retained between requests.
pub(crate) async fn handle_check(Json(body): Json<serde_json::Value>) -> Response {
    let model = match prax_interchange::from_bundle(&body) {
        Ok(m) => m,
        Err(e) => {
            let err_response = serde_json::json!({
                "error": "invalid model bundle",
                "details": format!("{}", e),
            });
            return (StatusCode::BAD_REQUEST, Json(err_response)).into_response();
        }
    };

    let report = prax_check::check(&model.registry);
    let mut response = match serde_json::to_value(&report) {
        Ok(v) => v,
        Err(e) => {
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("serialization error: {}", e),
            )
            .into_response()
        }
    };
    if let Some(obj) = response.as_object_mut() {
        obj.insert("id".to_string(), serde_json::Value::String(model.id));
    }

    (StatusCode::OK, Json(response)).into_response()
}
