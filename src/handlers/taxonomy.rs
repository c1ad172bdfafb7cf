//! Reference-data admin for the classification taxonomy: categories, the
//! unit types beneath them, and the read-only painter and base-size lists.
//!
//! Deletions are guarded: a row still referenced by dependent data is a
//! conflict, not a cascade.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{
    base_size, category, mini_category, mini_proxy_type, mini_unit_type, painter, unit_type,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::taxonomy::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List categories",
    responses(
        (status = 200, description = "All categories, ordered by name", body = Vec<CategoryResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name already taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_category(&payload)?;
    let name = payload.name.trim();

    if category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!("category '{name}' already exists")));
    }

    let created = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Rename a category",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    validate_update_category(&payload)?;
    let existing = category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let mut active: category::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        let name = name.trim();
        let taken = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .filter(category::Column::Id.ne(id))
            .one(&state.db)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict(format!("category '{name}' already exists")));
        }
        active.name = Set(name.to_string());
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(CategoryResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Refused with 409 while unit types still belong to the category or minis are still assigned to it.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Category still has unit types or mini assignments (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let child_types = unit_type::Entity::find()
        .filter(unit_type::Column::CategoryId.eq(id))
        .count(&state.db)
        .await?;
    if child_types > 0 {
        return Err(AppError::Conflict(format!(
            "category has {child_types} unit type(s); move or delete them first"
        )));
    }

    let assignments = mini_category::Entity::find()
        .filter(mini_category::Column::CategoryId.eq(id))
        .count(&state.db)
        .await?;
    if assignments > 0 {
        return Err(AppError::Conflict(format!(
            "category is assigned to {assignments} mini(s)"
        )));
    }

    category::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Unit types",
    operation_id = "listUnitTypes",
    summary = "List unit types",
    responses(
        (status = 200, description = "All unit types, ordered by name", body = Vec<UnitTypeResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_unit_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<UnitTypeResponse>>, AppError> {
    let rows = unit_type::Entity::find()
        .order_by_asc(unit_type::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(UnitTypeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Unit types",
    operation_id = "createUnitType",
    summary = "Create a unit type",
    request_body = CreateUnitTypeRequest,
    responses(
        (status = 201, description = "Unit type created", body = UnitTypeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_unit_type(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUnitTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_unit_type(&payload)?;

    if category::Entity::find_by_id(payload.category_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "category {} does not exist",
            payload.category_id
        )));
    }

    let created = unit_type::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        category_id: Set(payload.category_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(UnitTypeResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Unit types",
    operation_id = "updateUnitType",
    summary = "Update a unit type",
    params(("id" = i32, Path, description = "Unit type ID")),
    request_body = UpdateUnitTypeRequest,
    responses(
        (status = 200, description = "Unit type updated", body = UnitTypeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Unit type not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_unit_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUnitTypeRequest>,
) -> Result<Json<UnitTypeResponse>, AppError> {
    validate_update_unit_type(&payload)?;
    let existing = unit_type::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Unit type not found".into()))?;

    let mut active: unit_type::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(category_id) = payload.category_id {
        if category::Entity::find_by_id(category_id)
            .one(&state.db)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "category {category_id} does not exist"
            )));
        }
        active.category_id = Set(category_id);
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(UnitTypeResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Unit types",
    operation_id = "deleteUnitType",
    summary = "Delete a unit type",
    description = "Refused with 409 while minis still reference the type in either role.",
    params(("id" = i32, Path, description = "Unit type ID")),
    responses(
        (status = 204, description = "Unit type deleted"),
        (status = 404, description = "Unit type not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Unit type still referenced by minis (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_unit_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    unit_type::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Unit type not found".into()))?;

    let regular = mini_unit_type::Entity::find()
        .filter(mini_unit_type::Column::UnitTypeId.eq(id))
        .count(&state.db)
        .await?;
    let proxy = mini_proxy_type::Entity::find()
        .filter(mini_proxy_type::Column::UnitTypeId.eq(id))
        .count(&state.db)
        .await?;
    if regular + proxy > 0 {
        return Err(AppError::Conflict(format!(
            "unit type is referenced by {} mini association(s)",
            regular + proxy
        )));
    }

    unit_type::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Painters",
    operation_id = "listPainters",
    summary = "List painter statuses",
    responses(
        (status = 200, description = "All painter rows, ordered by id", body = Vec<PainterResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_painters(
    State(state): State<AppState>,
) -> Result<Json<Vec<PainterResponse>>, AppError> {
    let rows = painter::Entity::find()
        .order_by_asc(painter::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(PainterResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Base sizes",
    operation_id = "listBaseSizes",
    summary = "List base sizes",
    responses(
        (status = 200, description = "All base-size rows, ordered by id", body = Vec<BaseSizeResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_base_sizes(
    State(state): State<AppState>,
) -> Result<Json<Vec<BaseSizeResponse>>, AppError> {
    let rows = base_size::Entity::find()
        .order_by_asc(base_size::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(BaseSizeResponse::from).collect()))
}
