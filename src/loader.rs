use image::DynamicImage;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Decode one file and normalize it to 8-bit RGB.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Decode every path, keeping input order for the ones that succeed.
///
/// Undecodable files are logged and reported back instead of aborting the
/// batch.
pub fn load_images<P: AsRef<Path>>(paths: &[P]) -> (Vec<DynamicImage>, Vec<LoadFailure>) {
    let mut images = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match load_image(path) {
            Ok(img) => images.push(img),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                failures.push(LoadFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (images, failures)
}
