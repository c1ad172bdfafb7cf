use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mini_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub mini_id: i32,
    #[sea_orm(primary_key)]
    pub category_id: i32,
    #[sea_orm(belongs_to, from = "mini_id", to = "id")]
    pub mini: Option<super::mini::Entity>,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: Option<super::category::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
