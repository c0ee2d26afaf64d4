// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, service info, health and the catch-all 404.

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

pub mod login;

pub use login::login;

/// GET / - service name, version and route overview
pub async fn root(State(state): State<AppState>) -> ApiResponse<Value> {
    let version = env!("CARGO_PKG_VERSION");

    ApiResponse::success(
        json!({
            "name": "Person API (Rust)",
            "version": version,
            "environment": state.config.environment.as_str(),
            "endpoints": {
                "login": "POST /login (public)",
                "person": "/api/v1/person[/:id]",
                "whoami": "GET /api/v1/auth/whoami (bearer token)",
                "health": "GET /health (public)",
            },
            "auth_required": state.config.security.require_auth,
        }),
        "Person API",
    )
}

/// GET /health - 503 when the configured store cannot be reached
pub async fn health(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Value> {
    let backend = state.people.backend();

    if let Err(e) = state.people.health_check(&ctx).await {
        tracing::error!(backend, "health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::success(
        json!({
            "status": "ok",
            "backend": backend,
            "timestamp": chrono::Utc::now(),
        }),
        "Service healthy",
    ))
}

/// Fallback for every unmatched route
pub async fn not_found() -> ApiError {
    ApiError::NotRegistered
}
