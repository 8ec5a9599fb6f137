use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::CollageConfig;
use crate::error::{CollageError, Result};
use crate::layout::{CellPlan, LayoutPlan};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Serialize)]
pub struct CollageMetadata {
    pub image: String,
    pub layout: String,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellPlan>,
    pub skipped: usize,
}

/// Encode the collage as JPEG into memory.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(CollageError::InvalidParameter(format!(
            "JPEG quality must be 1-100, got {}",
            quality
        )));
    }

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(image)?;
    Ok(buf)
}

/// Write the collage to disk. `.jpg`/`.jpeg` honour `quality`; any other
/// extension is encoded by format inference.
pub fn save_collage(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => {
            let bytes = encode_jpeg(image, quality)?;
            std::fs::write(path, bytes)?;
        }
        _ => image.save(path)?,
    }

    log::info!(
        "Saved {}x{} collage to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

/// Write the plan next to `output_path` as `<name>.json`.
pub fn write_plan_metadata(
    plan: &LayoutPlan,
    config: &CollageConfig,
    output_path: &Path,
) -> Result<PathBuf> {
    let metadata_path = output_path.with_extension("json");
    let metadata = CollageMetadata {
        image: output_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("collage.jpg")
            .to_string(),
        layout: config.layout().to_string(),
        width: plan.canvas_width,
        height: plan.canvas_height,
        cells: plan.cells.clone(),
        skipped: plan.skipped,
    };

    let json = serde_json::to_string_pretty(&metadata)?;
    std::fs::write(&metadata_path, json)?;
    Ok(metadata_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_encode_jpeg_roundtrips_dimensions() {
        let img = RgbImage::from_pixel(31, 17, Rgb([200, 100, 50]));
        let bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (31, 17));
    }

    #[test]
    fn test_encode_jpeg_rejects_bad_quality() {
        let img = RgbImage::new(2, 2);
        assert!(matches!(encode_jpeg(&img, 0), Err(CollageError::InvalidParameter(_))));
        assert!(matches!(encode_jpeg(&img, 101), Err(CollageError::InvalidParameter(_))));
    }

    #[test]
    fn test_plan_metadata_sidecar() {
        let dir = std::env::temp_dir().join(format!("photo-collage-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("collage.jpg");

        let plan = LayoutPlan {
            canvas_width: 60,
            canvas_height: 40,
            cells: vec![CellPlan { x: 5, y: 5, width: 50, height: 30 }],
            skipped: 0,
        };
        let path = write_plan_metadata(&plan, &CollageConfig::default(), &output).unwrap();

        assert_eq!(path, dir.join("collage.json"));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["image"], "collage.jpg");
        assert_eq!(json["layout"], "grid");
        assert_eq!(json["width"], 60);
        assert_eq!(json["cells"][0]["width"], 50);

        std::fs::remove_dir_all(&dir).ok();
    }
}
