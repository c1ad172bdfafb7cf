use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_set")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub product_line_id: i32,
    #[sea_orm(belongs_to, from = "product_line_id", to = "id")]
    pub product_line: Option<super::product_line::Entity>,

    #[sea_orm(has_many)]
    pub minis: HasMany<super::mini::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
