use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Painting state a mini can be in ("painted by" lookup). Seeded on startup.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "painter")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(has_many)]
    pub minis: HasMany<super::mini::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
