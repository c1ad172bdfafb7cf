use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::storage::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub images: Arc<ImageStore>,
    pub config: AppConfig,
}
