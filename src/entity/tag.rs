use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Freeform label vocabulary. Names are case-sensitive and unique; rows are
/// created lazily on first reference and removed only by the unused sweep.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

impl ActiveModelBehavior for ActiveModel {}
