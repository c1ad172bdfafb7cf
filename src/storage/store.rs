use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, imageops};
use tokio::fs;

use super::error::ImageStoreError;
use super::shard::{original_rel_path, thumbnail_rel_path};

/// Square bounding box for thumbnails, in pixels.
const THUMBNAIL_SIZE: u32 = 50;
/// JPEG quality for thumbnails.
const THUMBNAIL_QUALITY: u8 = 60;
/// JPEG quality for re-encoded originals.
const ORIGINAL_QUALITY: u8 = 100;

/// Paths of the two artifacts written for a mini.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub original: PathBuf,
    pub thumbnail: PathBuf,
}

/// Filesystem store for derived image artifacts.
///
/// Thumbnails are written under `{root}/{x}/{y}/{id}.jpg` and originals under
/// `{root}/originals/{x}/{y}/{id}.jpg`, where `x`/`y` follow the shard law.
/// Writing the same id twice overwrites both artifacts in place.
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open the store, pre-provisioning the 10x10 shard skeleton under both
    /// the thumbnail root and `originals/`.
    pub async fn new(root: PathBuf) -> Result<Self, ImageStoreError> {
        for x in 0..10u8 {
            for y in 0..10u8 {
                let tail = format!("{x}/{y}");
                fs::create_dir_all(root.join(&tail)).await?;
                fs::create_dir_all(root.join("originals").join(&tail)).await?;
            }
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode `bytes`, then write the max-quality original and the 50x50
    /// contain-fit thumbnail for `mini_id`, overwriting prior artifacts.
    pub async fn store(
        &self,
        mini_id: i32,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, ImageStoreError> {
        let (original_bytes, thumbnail_bytes) =
            tokio::task::spawn_blocking(move || derive_artifacts(&bytes))
                .await
                .map_err(|e| ImageStoreError::Io(std::io::Error::other(e)))??;

        let original = self.root.join(original_rel_path(mini_id));
        let thumbnail = self.root.join(thumbnail_rel_path(mini_id));
        fs::write(&original, original_bytes).await?;
        fs::write(&thumbnail, thumbnail_bytes).await?;

        Ok(StoredImage {
            original,
            thumbnail,
        })
    }
}

/// Decode once, encode both artifacts. CPU-bound; runs off the async threads.
fn derive_artifacts(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>), ImageStoreError> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageStoreError::Decode(e.to_string()))?;

    let original = encode_jpeg(img.to_rgb8(), ORIGINAL_QUALITY)?;
    let thumbnail = encode_jpeg(contain_thumbnail(&img), THUMBNAIL_QUALITY)?;

    Ok((original, thumbnail))
}

/// Scale to fit a 50x50 box preserving aspect ratio, centered on an opaque
/// white canvas.
fn contain_thumbnail(img: &DynamicImage) -> RgbImage {
    let scaled = img
        .resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, imageops::FilterType::Lanczos3)
        .to_rgb8();

    let mut canvas = RgbImage::from_pixel(THUMBNAIL_SIZE, THUMBNAIL_SIZE, Rgb([255, 255, 255]));
    let x = i64::from((THUMBNAIL_SIZE - scaled.width()) / 2);
    let y = i64::from((THUMBNAIL_SIZE - scaled.height()) / 2);
    imageops::replace(&mut canvas, &scaled, x, y);
    canvas
}

fn encode_jpeg(img: RgbImage, quality: u8) -> Result<Vec<u8>, ImageStoreError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
    img.write_with_encoder(encoder)
        .map_err(|e| ImageStoreError::Encode(e.to_string()))?;
    Ok(buf)
}
