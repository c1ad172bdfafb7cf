use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_line")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub manufacturer_id: i32,
    #[sea_orm(belongs_to, from = "manufacturer_id", to = "id")]
    pub manufacturer: Option<super::manufacturer::Entity>,

    #[sea_orm(has_many)]
    pub product_sets: HasMany<super::product_set::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
