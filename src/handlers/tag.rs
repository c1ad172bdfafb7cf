//! Tag vocabulary: lazily-created labels shared across minis.
//!
//! Tags enter the vocabulary implicitly, by being named on a mini write,
//! and leave it only through the explicit unused-tag sweep. Matching is
//! exact and case-sensitive.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{mini_tag, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::tag::{CreateTagRequest, SweepResponse, TagResponse, validate_create_tag};
use crate::state::AppState;

/// Resolve a tag name to its id, creating the row if the name is new.
///
/// Lookup is exact (case-sensitive). Runs on whatever connection the caller
/// holds, so a mini write resolves its tags inside its own transaction.
pub async fn resolve_or_create<C: ConnectionTrait>(conn: &C, name: &str) -> Result<i32, AppError> {
    if let Some(existing) = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }
    let created = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(created.id)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Tags",
    operation_id = "listTags",
    summary = "List the tag vocabulary",
    responses(
        (status = 200, description = "All tags, ordered by id", body = Vec<TagResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = tag::Entity::find()
        .order_by_asc(tag::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Tags",
    operation_id = "createTag",
    summary = "Resolve or create a tag",
    description = "Idempotent: posting an existing name returns the existing tag with 200, a new name creates it and returns 201.",
    request_body = CreateTagRequest,
    responses(
        (status = 200, description = "Tag already existed", body = TagResponse),
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_tag(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_tag(&payload)?;
    let name = payload.name.trim();

    if let Some(existing) = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(&state.db)
        .await?
    {
        return Ok((StatusCode::OK, Json(TagResponse::from(existing))));
    }

    let txn = state.db.begin().await?;
    let id = resolve_or_create(&txn, name).await?;
    let created = tag::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Internal("tag vanished after insert".into()))?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TagResponse::from(created))))
}

#[utoipa::path(
    post,
    path = "/sweep",
    tag = "Tags",
    operation_id = "sweepUnusedTags",
    summary = "Remove tags no mini references",
    description = "Deletes every tag with no association rows and reports how many were removed. The only way a tag leaves the vocabulary.",
    responses(
        (status = 200, description = "Sweep result", body = SweepResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn sweep_unused(State(state): State<AppState>) -> Result<Json<SweepResponse>, AppError> {
    let txn = state.db.begin().await?;

    let referenced: Vec<i32> = mini_tag::Entity::find()
        .select_only()
        .column(mini_tag::Column::TagId)
        .distinct()
        .into_tuple()
        .all(&txn)
        .await?;

    let mut delete = tag::Entity::delete_many();
    if !referenced.is_empty() {
        delete = delete.filter(tag::Column::Id.is_not_in(referenced));
    }
    let result = delete.exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(SweepResponse {
        removed: result.rows_affected,
    }))
}
