// handlers/public/login.rs - POST /login handler

use axum::{body::Bytes, extract::State};

use crate::api::{decode_body, LoginRequest, LoginResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Exchange the configured admin credentials for a bearer token.
///
/// Credentials are compared literally against `ADMIN_EMAIL`/`ADMIN_PASSWORD`;
/// the person store is never consulted. The auth service is only called once
/// both match.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<LoginResponse> {
    let request: LoginRequest = decode_body(&body)?;

    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::invalid_input("Invalid credentials"));
    }

    let security = &state.config.security;
    if request.email != security.admin_email || request.password != security.admin_password {
        tracing::warn!(email = %request.email, "login rejected");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.auth.generate_token(&security.admin_email)?;

    tracing::info!(email = %request.email, "admin logged in");
    Ok(ApiResponse::success(LoginResponse { token }, "Login successful"))
}
