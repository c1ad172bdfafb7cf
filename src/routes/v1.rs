use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/minis", mini_routes())
        .nest("/tags", tag_routes())
        .nest("/categories", category_routes())
        .nest("/unit-types", unit_type_routes())
        .nest("/painters", painter_routes())
        .nest("/base-sizes", base_size_routes())
        .nest("/manufacturers", manufacturer_routes())
        .nest("/product-lines", product_line_routes())
        .nest("/product-sets", product_set_routes())
}

fn mini_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::mini::list_minis,
            handlers::mini::create_mini
        ))
        .routes(routes!(
            handlers::mini::get_mini,
            handlers::mini::update_mini,
            handlers::mini::delete_mini
        ))
        .routes(routes!(handlers::mini::replace_mini_image))
}

fn tag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::tag::list_tags, handlers::tag::create_tag))
        .routes(routes!(handlers::tag::sweep_unused))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::taxonomy::list_categories,
            handlers::taxonomy::create_category
        ))
        .routes(routes!(
            handlers::taxonomy::update_category,
            handlers::taxonomy::delete_category
        ))
}

fn unit_type_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::taxonomy::list_unit_types,
            handlers::taxonomy::create_unit_type
        ))
        .routes(routes!(
            handlers::taxonomy::update_unit_type,
            handlers::taxonomy::delete_unit_type
        ))
}

fn painter_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::taxonomy::list_painters))
}

fn base_size_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::taxonomy::list_base_sizes))
}

fn manufacturer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::product::list_manufacturers,
            handlers::product::create_manufacturer
        ))
        .routes(routes!(
            handlers::product::update_manufacturer,
            handlers::product::delete_manufacturer
        ))
}

fn product_line_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::product::list_product_lines,
            handlers::product::create_product_line
        ))
        .routes(routes!(
            handlers::product::update_product_line,
            handlers::product::delete_product_line
        ))
}

fn product_set_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::product::list_product_sets,
            handlers::product::create_product_set
        ))
        .routes(routes!(
            handlers::product::update_product_set,
            handlers::product::delete_product_set
        ))
}
