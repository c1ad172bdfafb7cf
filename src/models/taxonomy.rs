use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_required_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUnitTypeRequest {
    pub name: String,
    pub category_id: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateUnitTypeRequest {
    pub name: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UnitTypeResponse {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PainterResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BaseSizeResponse {
    pub id: i32,
    pub name: String,
}

impl From<crate::entity::category::Model> for CategoryResponse {
    fn from(m: crate::entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<crate::entity::unit_type::Model> for UnitTypeResponse {
    fn from(m: crate::entity::unit_type::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category_id: m.category_id,
        }
    }
}

impl From<crate::entity::painter::Model> for PainterResponse {
    fn from(m: crate::entity::painter::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<crate::entity::base_size::Model> for BaseSizeResponse {
    fn from(m: crate::entity::base_size::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

pub fn validate_create_category(req: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_required_name(&req.name, "name")
}

pub fn validate_update_category(req: &UpdateCategoryRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_name(name, "name")?;
    }
    Ok(())
}

pub fn validate_create_unit_type(req: &CreateUnitTypeRequest) -> Result<(), AppError> {
    validate_required_name(&req.name, "name")
}

pub fn validate_update_unit_type(req: &UpdateUnitTypeRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_name(name, "name")?;
    }
    Ok(())
}
