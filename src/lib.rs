pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod storage;

use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Minibase API",
        version = "1.0.0",
        description = "Catalog persistence service for a collection of miniatures"
    ),
    tags(
        (name = "Minis", description = "Mini aggregate CRUD and image management"),
        (name = "Tags", description = "Tag vocabulary and unused-tag sweep"),
        (name = "Categories", description = "Category reference data"),
        (name = "Unit types", description = "Unit type reference data"),
        (name = "Painters", description = "Painter status reference data"),
        (name = "Base sizes", description = "Base size reference data"),
        (name = "Manufacturers", description = "Manufacturer reference data"),
        (name = "Product lines", description = "Product line reference data"),
        (name = "Product sets", description = "Product set reference data"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &config::CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    router
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}
