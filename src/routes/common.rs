//! Service routes next to the product API: liveness, readiness and build info.

use crate::error::StoreResult;
use crate::state::AppState;
use crate::API_PREFIX;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    api_prefix: &'static str,
}

/// Outcome of a store round trip, rendered as 200 or 503.
struct Readiness(StoreResult<()>);

impl IntoResponse for Readiness {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(()) => Json(ServiceStatus {
                status: "ok",
                database: Some("ok"),
                reason: None,
            })
            .into_response(),
            Err(e) => {
                tracing::warn!(error = %e, reason = e.reason(), "product store not ready");
                let body = ServiceStatus {
                    status: "degraded",
                    database: Some("unavailable"),
                    reason: Some(e.reason()),
                };
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
        }
    }
}

async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok",
        database: None,
        reason: None,
    })
}

async fn ready(State(state): State<AppState>) -> Readiness {
    Readiness(state.store.ping().await)
}

async fn version() -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api_prefix: API_PREFIX,
    })
}

/// GET /health, GET /ready (store round trip), GET /version.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
