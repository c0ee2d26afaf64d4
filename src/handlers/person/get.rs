// handlers/person/get.rs - GET /api/v1/person/:id handler

use axum::extract::{Path, State};

use crate::api::PersonView;
use crate::app::AppState;
use crate::context::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};

use super::parse_person_id;

pub async fn person_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<PersonView> {
    let id = parse_person_id(&id)?;

    let person = state.people.get_person(&ctx, id).await?;

    Ok(ApiResponse::success(PersonView::from(person), "Person retrieved successfully"))
}
