use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{
    base_size, category, manufacturer, mini, mini_category, mini_proxy_type, mini_tag,
    mini_unit_type, painter, product_line, product_set, tag, unit_type,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::mini::*;
use crate::state::AppState;
use crate::storage;

#[utoipa::path(
    post,
    path = "/",
    tag = "Minis",
    operation_id = "createMini",
    summary = "Create a mini with its associations",
    description = "Creates a mini together with its category, type, proxy-type and tag associations and an optional base64-encoded image, as one atomic unit of work. Unknown tag names are created on the fly; referenced category/type/product-set ids must already exist.",
    request_body = CreateMiniRequest,
    responses(
        (status = 201, description = "Mini created", body = MiniDetailResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 422, description = "Image payload could not be decoded (IMAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_mini(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateMiniRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fields = payload.validate()?;
    let assoc = AssociationInput::new(
        &payload.category_ids,
        &payload.type_ids,
        &payload.proxy_type_ids,
        &payload.tag_names,
    )?;

    // Reject malformed payloads before any transaction begins.
    let image_bytes = match payload.image.as_deref() {
        Some(encoded) => Some(BASE64.decode(encoded.trim()).map_err(|e| {
            AppError::Image(format!("image payload is not valid base64: {e}"))
        })?),
        None => None,
    };

    let txn = state.db.begin().await?;
    check_references(&txn, &fields, &assoc).await?;

    let now = chrono::Utc::now();
    let new_mini = mini::ActiveModel {
        name: Set(fields.name.to_string()),
        description: Set(fields.description.map(str::to_string)),
        location: Set(fields.location.to_string()),
        quantity: Set(fields.quantity),
        painted_by_id: Set(fields.painted_by_id),
        base_size_id: Set(fields.base_size_id),
        product_set_id: Set(fields.product_set_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_mini.insert(&txn).await?;

    // The image write happens inside the unit of work: a decode, encode or
    // I/O failure here drops the transaction and the mini row with it.
    if let Some(bytes) = image_bytes {
        state.images.store(model.id, bytes).await?;
    }

    insert_associations(&txn, model.id, &assoc).await?;
    txn.commit().await?;

    let view = fetch_detail(&state.db, model.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Minis",
    operation_id = "listMinis",
    summary = "List minis as aggregate views",
    description = "Returns aggregate views of all minis, newest first by default. Supports case-insensitive name search and sorting by `id`, `name` or `created_at`.",
    params(MiniListQuery),
    responses(
        (status = 200, description = "List of minis", body = Vec<MiniResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_minis(
    State(state): State<AppState>,
    Query(query): Query<MiniListQuery>,
) -> Result<Json<Vec<MiniResponse>>, AppError> {
    let mut select = mini::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(mini::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };
    let sort_column = match query.sort_by.as_deref().unwrap_or("id") {
        "id" => mini::Column::Id,
        "name" => mini::Column::Name,
        "created_at" => mini::Column::CreatedAt,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: id, name, created_at".into(),
            ));
        }
    };

    let minis = select.order_by(sort_column, sort_order).all(&state.db).await?;
    let views = aggregate(&state.db, minis).await?;
    Ok(Json(views.into_iter().map(MiniResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Minis",
    operation_id = "getMini",
    summary = "Get a mini's aggregate view by ID",
    description = "Returns the denormalized view of one mini, including parallel id lists for each association relation so editors can round-trip them.",
    params(("id" = i32, Path, description = "Mini ID")),
    responses(
        (status = 200, description = "Mini details", body = MiniDetailResponse),
        (status = 404, description = "Mini not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_mini(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MiniDetailResponse>, AppError> {
    Ok(Json(fetch_detail(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Minis",
    operation_id = "updateMini",
    summary = "Replace a mini and all its associations",
    description = "Full-replace update: scalar fields are rewritten, `updated_at` is refreshed, and every association relation is cleared and re-inserted from the supplied lists (an omitted list empties that relation). `painted_by_id` and `base_size_id` fall back to their defaults when omitted. The stored image is not touched; use the image endpoint to replace it.",
    params(("id" = i32, Path, description = "Mini ID")),
    request_body = UpdateMiniRequest,
    responses(
        (status = 200, description = "Mini updated", body = MiniDetailResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Mini not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_mini(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateMiniRequest>,
) -> Result<Json<MiniDetailResponse>, AppError> {
    let fields = payload.validate()?;
    let assoc = AssociationInput::new(
        &payload.category_ids,
        &payload.type_ids,
        &payload.proxy_type_ids,
        &payload.tag_names,
    )?;

    // Missing minis short-circuit before a transaction is opened.
    let existing = find_mini(&state.db, id).await?;

    let txn = state.db.begin().await?;
    check_references(&txn, &fields, &assoc).await?;

    let mut active: mini::ActiveModel = existing.into();
    active.name = Set(fields.name.to_string());
    active.description = Set(fields.description.map(str::to_string));
    active.location = Set(fields.location.to_string());
    active.quantity = Set(fields.quantity);
    active.painted_by_id = Set(fields.painted_by_id);
    active.base_size_id = Set(fields.base_size_id);
    active.product_set_id = Set(fields.product_set_id);
    active.updated_at = Set(chrono::Utc::now());
    active.update(&txn).await?;

    // Replace-all semantics: clear every relation, then re-insert the
    // supplied sets. No diffing.
    delete_associations(&txn, id).await?;
    insert_associations(&txn, id, &assoc).await?;

    txn.commit().await?;

    Ok(Json(fetch_detail(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/image",
    tag = "Minis",
    operation_id = "replaceMiniImage",
    summary = "Replace a mini's image",
    description = "Accepts raw image bytes and re-derives both artifacts in place at the mini's shard path. The mini's `updated_at` is refreshed in the same unit of work.",
    params(("id" = i32, Path, description = "Mini ID")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image replaced", body = MiniDetailResponse),
        (status = 404, description = "Mini not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Payload is not a decodable image (IMAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, body), fields(id))]
pub async fn replace_mini_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<MiniDetailResponse>, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("image payload must not be empty".into()));
    }
    let existing = find_mini(&state.db, id).await?;

    let txn = state.db.begin().await?;
    let mut active: mini::ActiveModel = existing.into();
    active.updated_at = Set(chrono::Utc::now());
    active.update(&txn).await?;

    state.images.store(id, body.to_vec()).await?;
    txn.commit().await?;

    Ok(Json(fetch_detail(&state.db, id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Minis",
    operation_id = "deleteMini",
    summary = "Delete a mini and its associations",
    description = "Deletes all four association relations' rows for the mini, then the mini row itself, as one unit of work. Image artifacts are left on disk; orphaned tags are reclaimed by the tag sweep.",
    params(("id" = i32, Path, description = "Mini ID")),
    responses(
        (status = 204, description = "Mini deleted"),
        (status = 404, description = "Mini not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_mini(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_mini(&state.db, id).await?;

    let txn = state.db.begin().await?;
    delete_associations(&txn, id).await?;
    mini::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_mini<C: ConnectionTrait>(db: &C, id: i32) -> Result<mini::Model, AppError> {
    mini::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Mini not found".into()))
}

/// Referenced ids must exist before junction rows are written. The source
/// implementation left this to the datastore's foreign-key behavior; here
/// dangling ids are rejected up front as validation errors.
async fn check_references<C: ConnectionTrait>(
    conn: &C,
    fields: &MiniFields<'_>,
    assoc: &AssociationInput,
) -> Result<(), AppError> {
    if painter::Entity::find_by_id(fields.painted_by_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "painter {} does not exist",
            fields.painted_by_id
        )));
    }
    if base_size::Entity::find_by_id(fields.base_size_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "base size {} does not exist",
            fields.base_size_id
        )));
    }
    if let Some(set_id) = fields.product_set_id
        && product_set::Entity::find_by_id(set_id).one(conn).await?.is_none()
    {
        return Err(AppError::Validation(format!(
            "product set {set_id} does not exist"
        )));
    }

    if !assoc.category_ids.is_empty() {
        let found = category::Entity::find()
            .filter(category::Column::Id.is_in(assoc.category_ids.clone()))
            .count(conn)
            .await?;
        if found != assoc.category_ids.len() as u64 {
            return Err(AppError::Validation(
                "one or more category ids do not exist".into(),
            ));
        }
    }

    let mut type_ids: Vec<i32> = assoc.type_ids.clone();
    type_ids.extend(&assoc.proxy_type_ids);
    if !type_ids.is_empty() {
        let distinct: HashSet<i32> = type_ids.iter().copied().collect();
        let found = unit_type::Entity::find()
            .filter(unit_type::Column::Id.is_in(distinct.iter().copied().collect::<Vec<_>>()))
            .count(conn)
            .await?;
        if found != distinct.len() as u64 {
            return Err(AppError::Validation(
                "one or more unit type ids do not exist".into(),
            ));
        }
    }

    Ok(())
}

/// Insert the full association set for a mini. Inputs are already
/// deduplicated, so each (mini_id, target_id) pair is written once.
async fn insert_associations(
    txn: &DatabaseTransaction,
    mini_id: i32,
    assoc: &AssociationInput,
) -> Result<(), AppError> {
    for name in &assoc.tag_names {
        let tag_id = super::tag::resolve_or_create(txn, name).await?;
        mini_tag::ActiveModel {
            mini_id: Set(mini_id),
            tag_id: Set(tag_id),
        }
        .insert(txn)
        .await?;
    }

    for &category_id in &assoc.category_ids {
        mini_category::ActiveModel {
            mini_id: Set(mini_id),
            category_id: Set(category_id),
        }
        .insert(txn)
        .await?;
    }

    for &unit_type_id in &assoc.type_ids {
        mini_unit_type::ActiveModel {
            mini_id: Set(mini_id),
            unit_type_id: Set(unit_type_id),
        }
        .insert(txn)
        .await?;
    }

    for &unit_type_id in &assoc.proxy_type_ids {
        mini_proxy_type::ActiveModel {
            mini_id: Set(mini_id),
            unit_type_id: Set(unit_type_id),
        }
        .insert(txn)
        .await?;
    }

    Ok(())
}

async fn delete_associations(txn: &DatabaseTransaction, mini_id: i32) -> Result<(), AppError> {
    mini_category::Entity::delete_many()
        .filter(mini_category::Column::MiniId.eq(mini_id))
        .exec(txn)
        .await?;
    mini_unit_type::Entity::delete_many()
        .filter(mini_unit_type::Column::MiniId.eq(mini_id))
        .exec(txn)
        .await?;
    mini_proxy_type::Entity::delete_many()
        .filter(mini_proxy_type::Column::MiniId.eq(mini_id))
        .exec(txn)
        .await?;
    mini_tag::Entity::delete_many()
        .filter(mini_tag::Column::MiniId.eq(mini_id))
        .exec(txn)
        .await?;
    Ok(())
}

pub(crate) async fn fetch_detail<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<MiniDetailResponse, AppError> {
    let model = find_mini(db, id).await?;
    let mut views = aggregate(db, vec![model]).await?;
    views
        .pop()
        .ok_or_else(|| AppError::Internal("aggregation dropped a mini".into()))
}

/// Reconstruct the denormalized view for a batch of minis.
///
/// Each association relation is fetched once for the whole batch, joined to
/// its name table in memory, and collapsed per mini into a deduplicated list
/// ordered by referenced id. Derived image paths come from the shard law and
/// do not depend on a file existing.
async fn aggregate<C: ConnectionTrait>(
    db: &C,
    minis: Vec<mini::Model>,
) -> Result<Vec<MiniDetailResponse>, AppError> {
    if minis.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = minis.iter().map(|m| m.id).collect();

    let cat_rows: Vec<(i32, i32)> = mini_category::Entity::find()
        .filter(mini_category::Column::MiniId.is_in(ids.clone()))
        .order_by_asc(mini_category::Column::CategoryId)
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.mini_id, r.category_id))
        .collect();
    let type_rows: Vec<(i32, i32)> = mini_unit_type::Entity::find()
        .filter(mini_unit_type::Column::MiniId.is_in(ids.clone()))
        .order_by_asc(mini_unit_type::Column::UnitTypeId)
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.mini_id, r.unit_type_id))
        .collect();
    let proxy_rows: Vec<(i32, i32)> = mini_proxy_type::Entity::find()
        .filter(mini_proxy_type::Column::MiniId.is_in(ids.clone()))
        .order_by_asc(mini_proxy_type::Column::UnitTypeId)
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.mini_id, r.unit_type_id))
        .collect();
    let tag_rows: Vec<(i32, i32)> = mini_tag::Entity::find()
        .filter(mini_tag::Column::MiniId.is_in(ids.clone()))
        .order_by_asc(mini_tag::Column::TagId)
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.mini_id, r.tag_id))
        .collect();

    let category_names = category_name_map(db, &cat_rows).await?;
    let unit_type_names = unit_type_name_map(db, &type_rows, &proxy_rows).await?;
    let tag_names = tag_name_map(db, &tag_rows).await?;

    let painter_names: HashMap<i32, String> = painter::Entity::find()
        .filter(painter::Column::Id.is_in(minis.iter().map(|m| m.painted_by_id).collect::<Vec<_>>()))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let base_size_names: HashMap<i32, String> = base_size::Entity::find()
        .filter(base_size::Column::Id.is_in(minis.iter().map(|m| m.base_size_id).collect::<Vec<_>>()))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.name))
        .collect();

    // Product hierarchy: set -> line -> manufacturer, walked level by level.
    let set_ids: Vec<i32> = minis.iter().filter_map(|m| m.product_set_id).collect();
    let sets: HashMap<i32, (String, i32)> = if set_ids.is_empty() {
        HashMap::new()
    } else {
        product_set::Entity::find()
            .filter(product_set::Column::Id.is_in(set_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, (s.name, s.product_line_id)))
            .collect()
    };
    let line_ids: Vec<i32> = sets.values().map(|(_, line_id)| *line_id).collect();
    let lines: HashMap<i32, (String, i32)> = if line_ids.is_empty() {
        HashMap::new()
    } else {
        product_line::Entity::find()
            .filter(product_line::Column::Id.is_in(line_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|l| (l.id, (l.name, l.manufacturer_id)))
            .collect()
    };
    let manufacturer_ids: Vec<i32> = lines.values().map(|(_, mid)| *mid).collect();
    let manufacturers: HashMap<i32, String> = if manufacturer_ids.is_empty() {
        HashMap::new()
    } else {
        manufacturer::Entity::find()
            .filter(manufacturer::Column::Id.is_in(manufacturer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect()
    };

    let views = minis
        .into_iter()
        .map(|m| {
            let (category_ids, category_names) = collapse(&cat_rows, m.id, &category_names);
            let (type_ids, type_names) = collapse(&type_rows, m.id, &unit_type_names);
            let (proxy_type_ids, proxy_type_names) = collapse(&proxy_rows, m.id, &unit_type_names);
            let (tag_ids, tag_names) = collapse(&tag_rows, m.id, &tag_names);

            let set = m.product_set_id.and_then(|id| sets.get(&id));
            let line = set.and_then(|(_, line_id)| lines.get(line_id));
            let manufacturer_name =
                line.and_then(|(_, mid)| manufacturers.get(mid)).cloned();

            MiniDetailResponse {
                mini: MiniResponse {
                    id: m.id,
                    painted_by: painter_names.get(&m.painted_by_id).cloned(),
                    base_size: base_size_names.get(&m.base_size_id).cloned(),
                    product_set_name: set.map(|(name, _)| name.clone()),
                    product_line_name: line.map(|(name, _)| name.clone()),
                    manufacturer_name,
                    category_names,
                    type_names,
                    proxy_type_names,
                    tag_names,
                    image_path: storage::thumbnail_rel_path(m.id),
                    original_image_path: storage::original_rel_path(m.id),
                    name: m.name,
                    description: m.description,
                    location: m.location,
                    quantity: m.quantity,
                    painted_by_id: m.painted_by_id,
                    base_size_id: m.base_size_id,
                    product_set_id: m.product_set_id,
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                },
                category_ids,
                type_ids,
                proxy_type_ids,
                tag_ids,
            }
        })
        .collect();

    Ok(views)
}

async fn category_name_map<C: ConnectionTrait>(
    db: &C,
    rows: &[(i32, i32)],
) -> Result<HashMap<i32, String>, AppError> {
    let ids = target_ids(rows);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(category::Entity::find()
        .filter(category::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

async fn unit_type_name_map<C: ConnectionTrait>(
    db: &C,
    regular: &[(i32, i32)],
    proxy: &[(i32, i32)],
) -> Result<HashMap<i32, String>, AppError> {
    let mut ids = target_ids(regular);
    ids.extend(target_ids(proxy));
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(unit_type::Entity::find()
        .filter(unit_type::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect())
}

async fn tag_name_map<C: ConnectionTrait>(
    db: &C,
    rows: &[(i32, i32)],
) -> Result<HashMap<i32, String>, AppError> {
    let ids = target_ids(rows);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(tag::Entity::find()
        .filter(tag::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect())
}

fn target_ids(rows: &[(i32, i32)]) -> Vec<i32> {
    let distinct: HashSet<i32> = rows.iter().map(|&(_, target)| target).collect();
    distinct.into_iter().collect()
}

/// Collapse one relation's rows for a mini into parallel id/name lists,
/// deduplicated and in the rows' (referenced-id ascending) order.
fn collapse(
    rows: &[(i32, i32)],
    mini_id: i32,
    names: &HashMap<i32, String>,
) -> (Vec<i32>, Vec<String>) {
    let mut ids = Vec::new();
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for &(m, target) in rows {
        if m == mini_id && seen.insert(target) {
            ids.push(target);
            if let Some(name) = names.get(&target) {
                out.push(name.clone());
            }
        }
    }
    (ids, out)
}
