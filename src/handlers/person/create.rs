// handlers/person/create.rs - POST /api/v1/person/create handler

use axum::{body::Bytes, extract::State};
use uuid::Uuid;

use crate::api::{decode_body, CreatedPerson, PersonRequest};
use crate::app::AppState;
use crate::context::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};

/// Create a person from `{name, age, hobbies}`. The id is generated here and
/// returned both in the message and in `data.id`.
pub async fn person_create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> ApiResult<CreatedPerson> {
    let request: PersonRequest = decode_body(&body)?;
    request.validate()?;

    let id = Uuid::new_v4();
    state.people.create_person(&ctx, request.into_person(id)).await?;

    tracing::info!(person_id = %id, "person created");
    Ok(ApiResponse::success(
        CreatedPerson { id },
        format!("successfully created person with ID: {}", id),
    ))
}
