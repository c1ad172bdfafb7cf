pub mod mini;
pub mod product;
pub mod tag;
pub mod taxonomy;
