use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Regular-role type assignment. A unit type id must not also appear in
/// `mini_proxy_type` for the same mini; the writer enforces this.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mini_unit_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub mini_id: i32,
    #[sea_orm(primary_key)]
    pub unit_type_id: i32,
    #[sea_orm(belongs_to, from = "mini_id", to = "id")]
    pub mini: Option<super::mini::Entity>,
    #[sea_orm(belongs_to, from = "unit_type_id", to = "id")]
    pub unit_type: Option<super::unit_type::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
