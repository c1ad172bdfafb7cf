//! Deterministic shard-path law for image artifacts.
//!
//! A mini's artifacts live two directory levels deep, derived from the
//! decimal representation of its id left-padded to two digits: id 7 maps to
//! `0/7`, id 42 to `4/2`, id 123 to `1/2` (only the first two digits are
//! used). The layout bounds the number of files per directory without any
//! lookup table, and the path can be recomputed from the id alone.

/// Extension used for both the original and the thumbnail artifact.
pub const IMAGE_EXT: &str = "jpg";

/// Directory pair for a mini id.
pub fn shard_segments(id: i32) -> (char, char) {
    let digits = format!("{:02}", id.max(0));
    let mut chars = digits.chars();
    let x = chars.next().unwrap_or('0');
    let y = chars.next().unwrap_or('0');
    (x, y)
}

/// Thumbnail path relative to the image root, `/`-separated.
pub fn thumbnail_rel_path(id: i32) -> String {
    let (x, y) = shard_segments(id);
    format!("{x}/{y}/{id}.{IMAGE_EXT}")
}

/// Original path relative to the image root, `/`-separated.
pub fn original_rel_path(id: i32) -> String {
    format!("originals/{}", thumbnail_rel_path(id))
}
