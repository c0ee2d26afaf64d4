// handlers/person/list.rs - GET /api/v1/person handler

use axum::extract::{Query, State};

use crate::api::{ListQuery, PersonView};
use crate::app::AppState;
use crate::context::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};

/// List persons newest first. `limit` defaults to the configured page size
/// and is clamped to the maximum; `offset` defaults to 0.
pub async fn person_list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<PersonView>> {
    let api = &state.config.api;
    let page = query.page(api.default_page_size, api.max_page_size);

    let persons = state.people.get_all_persons(&ctx, page).await?;

    Ok(ApiResponse::success(
        persons.into_iter().map(PersonView::from).collect(),
        "Persons retrieved successfully",
    ))
}
