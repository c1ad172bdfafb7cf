use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_required_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTagRequest {
    /// Exact, case-sensitive label. "Hero" and "hero" are distinct tags.
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

/// Result of an unused-tag sweep.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SweepResponse {
    /// Number of tags removed.
    pub removed: u64,
}

impl From<crate::entity::tag::Model> for TagResponse {
    fn from(m: crate::entity::tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

pub fn validate_create_tag(req: &CreateTagRequest) -> Result<(), AppError> {
    validate_required_name(&req.name, "name")
}
