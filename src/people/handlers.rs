// HTTP handlers for person endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::pagination::{Page, PageParams, PageRequest};
use crate::people::{Person, PersonRequest};
use crate::AppState;

/// Handler for GET /api/person/v1
pub async fn list_people_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Person>>, ApiError> {
    let request = PageRequest::try_from(params)?;
    let page = state.people.find_all(request).await?;
    Ok(Json(page))
}

/// Handler for GET /api/person/v1/findPersonByName/{firstName}
pub async fn find_people_by_name_handler(
    State(state): State<AppState>,
    ApiPath(first_name): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Person>>, ApiError> {
    let request = PageRequest::try_from(params)?;
    let page = state.people.find_by_name(&first_name, request).await?;
    Ok(Json(page))
}

/// Handler for GET /api/person/v1/{id}
pub async fn get_person_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Person>, ApiError> {
    let person = state.people.find_by_id(id).await?;
    Ok(Json(person))
}

/// Handler for POST /api/person/v1
pub async fn create_person_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PersonRequest>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let person = state.people.create(request).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// Handler for PUT /api/person/v1
/// The body carries the id of the person to replace
pub async fn update_person_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PersonRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state.people.update(request).await?;
    Ok(Json(person))
}

/// Handler for PATCH /api/person/v1/{id}
/// Soft-disables the person
pub async fn disable_person_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Person>, ApiError> {
    let person = state.people.disable(id).await?;
    Ok(Json(person))
}

/// Handler for DELETE /api/person/v1/{id}
pub async fn delete_person_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.people.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
