pub mod mini;
pub mod product;
pub mod shared;
pub mod tag;
pub mod taxonomy;
