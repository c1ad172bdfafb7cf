use sea_orm::*;
use tracing::info;

use crate::entity::{base_size, painter};

/// Painter statuses seeded on startup. The first row is the fallback for
/// minis created without an explicit painter.
const DEFAULT_PAINTERS: &[(i32, &str)] = &[
    (1, "Unpainted"),
    (2, "Primed"),
    (3, "Painted by me"),
    (4, "Painted by another"),
];

/// Base sizes seeded on startup. Row 3 (32mm round) is the fallback for
/// minis created without an explicit base size.
const DEFAULT_BASE_SIZES: &[(i32, &str)] = &[
    (1, "20mm round"),
    (2, "25mm round"),
    (3, "32mm round"),
    (4, "40mm round"),
    (5, "50mm round"),
    (6, "60mm round"),
    (7, "75x42mm oval"),
    (8, "105x70mm oval"),
];

/// Seed the painter and base-size reference tables. Idempotent: rows that
/// already exist are left untouched.
pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut painters_inserted = 0u32;
    for &(id, name) in DEFAULT_PAINTERS {
        let model = painter::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        };

        let result = painter::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(painter::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => painters_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if painters_inserted > 0 {
        info!("Seeded {} new painter rows", painters_inserted);
    }

    let mut sizes_inserted = 0u32;
    for &(id, name) in DEFAULT_BASE_SIZES {
        let model = base_size::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        };

        let result = base_size::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(base_size::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => sizes_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if sizes_inserted > 0 {
        info!("Seeded {} new base-size rows", sizes_inserted);
    }

    Ok(())
}
