//! Reference-data admin for the product hierarchy:
//! manufacturer -> product line -> product set.
//!
//! Same guard discipline as the taxonomy handlers: deleting a row that
//! dependents still point at is a conflict.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{manufacturer, mini, product_line, product_set};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::product::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Manufacturers",
    operation_id = "listManufacturers",
    summary = "List manufacturers",
    responses(
        (status = 200, description = "All manufacturers, ordered by name", body = Vec<ManufacturerResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_manufacturers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ManufacturerResponse>>, AppError> {
    let rows = manufacturer::Entity::find()
        .order_by_asc(manufacturer::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(ManufacturerResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Manufacturers",
    operation_id = "createManufacturer",
    summary = "Create a manufacturer",
    request_body = CreateManufacturerRequest,
    responses(
        (status = 201, description = "Manufacturer created", body = ManufacturerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name already taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_manufacturer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateManufacturerRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_manufacturer(&payload)?;
    let name = payload.name.trim();

    if manufacturer::Entity::find()
        .filter(manufacturer::Column::Name.eq(name))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "manufacturer '{name}' already exists"
        )));
    }

    let created = manufacturer::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ManufacturerResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Manufacturers",
    operation_id = "updateManufacturer",
    summary = "Rename a manufacturer",
    params(("id" = i32, Path, description = "Manufacturer ID")),
    request_body = UpdateManufacturerRequest,
    responses(
        (status = 200, description = "Manufacturer updated", body = ManufacturerResponse),
        (status = 404, description = "Manufacturer not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateManufacturerRequest>,
) -> Result<Json<ManufacturerResponse>, AppError> {
    validate_update_manufacturer(&payload)?;
    let existing = manufacturer::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Manufacturer not found".into()))?;

    let mut active: manufacturer::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(ManufacturerResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Manufacturers",
    operation_id = "deleteManufacturer",
    summary = "Delete a manufacturer",
    params(("id" = i32, Path, description = "Manufacturer ID")),
    responses(
        (status = 204, description = "Manufacturer deleted"),
        (status = 404, description = "Manufacturer not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Manufacturer still has product lines (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    manufacturer::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Manufacturer not found".into()))?;

    let dependents = product_line::Entity::find()
        .filter(product_line::Column::ManufacturerId.eq(id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(format!(
            "manufacturer has {dependents} product line(s); delete them first"
        )));
    }

    manufacturer::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Product lines",
    operation_id = "listProductLines",
    summary = "List product lines",
    responses(
        (status = 200, description = "All product lines, ordered by name", body = Vec<ProductLineResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_product_lines(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductLineResponse>>, AppError> {
    let rows = product_line::Entity::find()
        .order_by_asc(product_line::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(ProductLineResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Product lines",
    operation_id = "createProductLine",
    summary = "Create a product line",
    request_body = CreateProductLineRequest,
    responses(
        (status = 201, description = "Product line created", body = ProductLineResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_product_line(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductLineRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_product_line(&payload)?;

    if manufacturer::Entity::find_by_id(payload.manufacturer_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "manufacturer {} does not exist",
            payload.manufacturer_id
        )));
    }

    let created = product_line::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        manufacturer_id: Set(payload.manufacturer_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ProductLineResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Product lines",
    operation_id = "updateProductLine",
    summary = "Update a product line",
    params(("id" = i32, Path, description = "Product line ID")),
    request_body = UpdateProductLineRequest,
    responses(
        (status = 200, description = "Product line updated", body = ProductLineResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Product line not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product_line(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateProductLineRequest>,
) -> Result<Json<ProductLineResponse>, AppError> {
    validate_update_product_line(&payload)?;
    let existing = product_line::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product line not found".into()))?;

    let mut active: product_line::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(manufacturer_id) = payload.manufacturer_id {
        if manufacturer::Entity::find_by_id(manufacturer_id)
            .one(&state.db)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "manufacturer {manufacturer_id} does not exist"
            )));
        }
        active.manufacturer_id = Set(manufacturer_id);
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(ProductLineResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Product lines",
    operation_id = "deleteProductLine",
    summary = "Delete a product line",
    params(("id" = i32, Path, description = "Product line ID")),
    responses(
        (status = 204, description = "Product line deleted"),
        (status = 404, description = "Product line not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Product line still has product sets (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_product_line(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    product_line::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product line not found".into()))?;

    let dependents = product_set::Entity::find()
        .filter(product_set::Column::ProductLineId.eq(id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(format!(
            "product line has {dependents} product set(s); delete them first"
        )));
    }

    product_line::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Product sets",
    operation_id = "listProductSets",
    summary = "List product sets",
    responses(
        (status = 200, description = "All product sets, ordered by name", body = Vec<ProductSetResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_product_sets(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductSetResponse>>, AppError> {
    let rows = product_set::Entity::find()
        .order_by_asc(product_set::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(ProductSetResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Product sets",
    operation_id = "createProductSet",
    summary = "Create a product set",
    request_body = CreateProductSetRequest,
    responses(
        (status = 201, description = "Product set created", body = ProductSetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_product_set(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_product_set(&payload)?;

    if product_line::Entity::find_by_id(payload.product_line_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "product line {} does not exist",
            payload.product_line_id
        )));
    }

    let created = product_set::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        product_line_id: Set(payload.product_line_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ProductSetResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Product sets",
    operation_id = "updateProductSet",
    summary = "Update a product set",
    params(("id" = i32, Path, description = "Product set ID")),
    request_body = UpdateProductSetRequest,
    responses(
        (status = 200, description = "Product set updated", body = ProductSetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Product set not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product_set(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateProductSetRequest>,
) -> Result<Json<ProductSetResponse>, AppError> {
    validate_update_product_set(&payload)?;
    let existing = product_set::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product set not found".into()))?;

    let mut active: product_set::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(product_line_id) = payload.product_line_id {
        if product_line::Entity::find_by_id(product_line_id)
            .one(&state.db)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "product line {product_line_id} does not exist"
            )));
        }
        active.product_line_id = Set(product_line_id);
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(ProductSetResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Product sets",
    operation_id = "deleteProductSet",
    summary = "Delete a product set",
    params(("id" = i32, Path, description = "Product set ID")),
    responses(
        (status = 204, description = "Product set deleted"),
        (status = 404, description = "Product set not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Product set still referenced by minis (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_product_set(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    product_set::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product set not found".into()))?;

    let dependents = mini::Entity::find()
        .filter(mini::Column::ProductSetId.eq(id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(format!(
            "product set is referenced by {dependents} mini(s)"
        )));
    }

    product_set::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
