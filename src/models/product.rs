use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_required_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateManufacturerRequest {
    pub name: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateManufacturerRequest {
    pub name: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ManufacturerResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductLineRequest {
    pub name: String,
    pub manufacturer_id: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProductLineRequest {
    pub name: Option<String>,
    pub manufacturer_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductLineResponse {
    pub id: i32,
    pub name: String,
    pub manufacturer_id: i32,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductSetRequest {
    pub name: String,
    pub product_line_id: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProductSetRequest {
    pub name: Option<String>,
    pub product_line_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductSetResponse {
    pub id: i32,
    pub name: String,
    pub product_line_id: i32,
}

impl From<crate::entity::manufacturer::Model> for ManufacturerResponse {
    fn from(m: crate::entity::manufacturer::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<crate::entity::product_line::Model> for ProductLineResponse {
    fn from(m: crate::entity::product_line::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            manufacturer_id: m.manufacturer_id,
        }
    }
}

impl From<crate::entity::product_set::Model> for ProductSetResponse {
    fn from(m: crate::entity::product_set::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            product_line_id: m.product_line_id,
        }
    }
}

pub fn validate_create_manufacturer(req: &CreateManufacturerRequest) -> Result<(), AppError> {
    validate_required_name(&req.name, "name")
}

pub fn validate_update_manufacturer(req: &UpdateManufacturerRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_name(name, "name")?;
    }
    Ok(())
}

pub fn validate_create_product_line(req: &CreateProductLineRequest) -> Result<(), AppError> {
    validate_required_name(&req.name, "name")
}

pub fn validate_update_product_line(req: &UpdateProductLineRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_name(name, "name")?;
    }
    Ok(())
}

pub fn validate_create_product_set(req: &CreateProductSetRequest) -> Result<(), AppError> {
    validate_required_name(&req.name, "name")
}

pub fn validate_update_product_set(req: &UpdateProductSetRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_name(name, "name")?;
    }
    Ok(())
}
