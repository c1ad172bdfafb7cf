use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mini")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub description: Option<String>,
    pub location: String,
    #[sea_orm(default_value = 1)]
    pub quantity: i32,

    pub painted_by_id: i32,
    #[sea_orm(belongs_to, from = "painted_by_id", to = "id")]
    pub painter: Option<super::painter::Entity>,

    pub base_size_id: i32,
    #[sea_orm(belongs_to, from = "base_size_id", to = "id")]
    pub base_size: Option<super::base_size::Entity>,

    pub product_set_id: Option<i32>,
    #[sea_orm(belongs_to, from = "product_set_id", to = "id")]
    pub product_set: Option<super::product_set::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
