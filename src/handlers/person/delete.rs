// handlers/person/delete.rs - DELETE /api/v1/person/:id handler

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::context::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};

use super::parse_person_id;

pub async fn person_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_person_id(&id)?;

    state.people.delete_person(&ctx, id).await?;

    tracing::info!(person_id = %id, "person deleted");
    Ok(ApiResponse::message_only(format!("Successfully deleted person with ID: {}", id)))
}
