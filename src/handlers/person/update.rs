// handlers/person/update.rs - PUT /api/v1/person/:id handler

use axum::{
    body::Bytes,
    extract::{Path, State},
};

use crate::api::{decode_body, PersonRequest, PersonView};
use crate::app::AppState;
use crate::context::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};

use super::parse_person_id;

/// Full replace of name, age and hobbies. Responds with the new state.
pub async fn person_update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<PersonView> {
    let id = parse_person_id(&id)?;
    let request: PersonRequest = decode_body(&body)?;
    request.validate()?;

    let person = request.into_person(id);
    state.people.update_person(&ctx, person.clone()).await?;

    tracing::info!(person_id = %id, "person updated");
    Ok(ApiResponse::success(
        PersonView::from(person),
        format!("Successfully updated person with ID: {}", id),
    ))
}
