mod error;
mod shard;
mod store;

pub use error::ImageStoreError;
pub use shard::{IMAGE_EXT, original_rel_path, shard_segments, thumbnail_rel_path};
pub use store::{ImageStore, StoredImage};
