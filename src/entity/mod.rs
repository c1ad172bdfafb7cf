pub mod base_size;
pub mod category;
pub mod manufacturer;
pub mod mini;
pub mod mini_category;
pub mod mini_proxy_type;
pub mod mini_tag;
pub mod mini_unit_type;
pub mod painter;
pub mod product_line;
pub mod product_set;
pub mod tag;
pub mod unit_type;
