use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A unit type a mini can be fielded as (the "Type" classification).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unit_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: Option<super::category::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
