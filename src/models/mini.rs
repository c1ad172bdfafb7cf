use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use super::shared::{dedup_ids, escape_like};
use super::shared::validate_required_name;

/// Painter row used when `painted_by_id` is omitted.
pub const DEFAULT_PAINTER_ID: i32 = 1;
/// Base-size row used when `base_size_id` is omitted.
pub const DEFAULT_BASE_SIZE_ID: i32 = 3;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateMiniRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    /// Coerced to >= 1; defaults to 1.
    pub quantity: Option<i32>,
    pub painted_by_id: Option<i32>,
    pub base_size_id: Option<i32>,
    pub product_set_id: Option<i32>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub type_ids: Vec<i32>,
    #[serde(default)]
    pub proxy_type_ids: Vec<i32>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    /// Base64-encoded still image, stored through the derivation pipeline.
    pub image: Option<String>,
}

/// Full-replace update payload. Association lists are replaced wholesale:
/// an omitted or empty list clears that relation.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateMiniRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub quantity: Option<i32>,
    pub painted_by_id: Option<i32>,
    pub base_size_id: Option<i32>,
    pub product_set_id: Option<i32>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub type_ids: Vec<i32>,
    #[serde(default)]
    pub proxy_type_ids: Vec<i32>,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct MiniListQuery {
    /// Case-insensitive substring match on the mini name.
    pub search: Option<String>,
    /// One of `id` (default), `name`, `created_at`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `desc`).
    pub sort_order: Option<String>,
}

/// Aggregate view of a mini as returned by list endpoints. Each relation is
/// collapsed into a deduplicated name list ordered by referenced id.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MiniResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub quantity: i32,
    pub painted_by_id: i32,
    pub painted_by: Option<String>,
    pub base_size_id: i32,
    pub base_size: Option<String>,
    pub product_set_id: Option<i32>,
    pub product_set_name: Option<String>,
    pub product_line_name: Option<String>,
    pub manufacturer_name: Option<String>,
    pub category_names: Vec<String>,
    pub type_names: Vec<String>,
    pub proxy_type_names: Vec<String>,
    pub tag_names: Vec<String>,
    /// Thumbnail path relative to the image root, derived from the shard
    /// law whether or not a file exists there.
    pub image_path: String,
    pub original_image_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-entity aggregate view: the list view plus parallel id lists so
/// editors can round-trip the association sets.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MiniDetailResponse {
    #[serde(flatten)]
    #[schema(inline)]
    pub mini: MiniResponse,
    pub category_ids: Vec<i32>,
    pub type_ids: Vec<i32>,
    pub proxy_type_ids: Vec<i32>,
    pub tag_ids: Vec<i32>,
}

impl From<MiniDetailResponse> for MiniResponse {
    fn from(detail: MiniDetailResponse) -> Self {
        detail.mini
    }
}

/// Scalar fields shared by create and update after validation.
pub struct MiniFields<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub location: &'a str,
    pub quantity: i32,
    pub painted_by_id: i32,
    pub base_size_id: i32,
    pub product_set_id: Option<i32>,
}

fn validate_scalars(name: &str, location: &str) -> Result<(), AppError> {
    validate_required_name(name, "name")?;
    validate_required_name(location, "location")
}

impl CreateMiniRequest {
    pub fn validate(&self) -> Result<MiniFields<'_>, AppError> {
        validate_scalars(&self.name, &self.location)?;
        Ok(self.fields())
    }

    fn fields(&self) -> MiniFields<'_> {
        MiniFields {
            name: self.name.trim(),
            description: self.description.as_deref(),
            location: self.location.trim(),
            quantity: self.quantity.unwrap_or(1).max(1),
            painted_by_id: self.painted_by_id.unwrap_or(DEFAULT_PAINTER_ID),
            base_size_id: self.base_size_id.unwrap_or(DEFAULT_BASE_SIZE_ID),
            product_set_id: self.product_set_id,
        }
    }
}

impl UpdateMiniRequest {
    pub fn validate(&self) -> Result<MiniFields<'_>, AppError> {
        validate_scalars(&self.name, &self.location)?;
        Ok(MiniFields {
            name: self.name.trim(),
            description: self.description.as_deref(),
            location: self.location.trim(),
            quantity: self.quantity.unwrap_or(1).max(1),
            painted_by_id: self.painted_by_id.unwrap_or(DEFAULT_PAINTER_ID),
            base_size_id: self.base_size_id.unwrap_or(DEFAULT_BASE_SIZE_ID),
            product_set_id: self.product_set_id,
        })
    }
}

/// The association sets a write carries, normalized for the writer:
/// ids deduplicated preserving order, tag names trimmed with blanks and
/// duplicates dropped (exact case preserved).
pub struct AssociationInput {
    pub category_ids: Vec<i32>,
    pub type_ids: Vec<i32>,
    pub proxy_type_ids: Vec<i32>,
    pub tag_names: Vec<String>,
}

impl AssociationInput {
    pub fn new(
        category_ids: &[i32],
        type_ids: &[i32],
        proxy_type_ids: &[i32],
        tag_names: &[String],
    ) -> Result<Self, AppError> {
        let type_ids = dedup_ids(type_ids);
        let proxy_type_ids = dedup_ids(proxy_type_ids);

        // A type may serve a mini in one role only.
        if let Some(id) = type_ids.iter().find(|id| proxy_type_ids.contains(id)) {
            return Err(AppError::Validation(format!(
                "unit type {id} cannot be both a regular and a proxy type"
            )));
        }

        let mut seen = std::collections::HashSet::new();
        let tag_names = tag_names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .filter(|n| seen.insert(n.clone()))
            .collect();

        Ok(Self {
            category_ids: dedup_ids(category_ids),
            type_ids,
            proxy_type_ids,
            tag_names,
        })
    }
}
