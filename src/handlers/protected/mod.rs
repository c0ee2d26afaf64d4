// handlers/protected/mod.rs - Handlers that always sit behind the bearer middleware

use axum::Extension;

use crate::api::WhoAmI;
use crate::middleware::{ApiResponse, AuthSubject};

/// GET /api/v1/auth/whoami - echo the subject of the presented token
pub async fn whoami(Extension(AuthSubject(subject)): Extension<AuthSubject>) -> ApiResponse<WhoAmI> {
    ApiResponse::success(WhoAmI { subject }, "Token is valid")
}
