use image::{DynamicImage, RgbImage, RgbaImage};
use rayon::prelude::*;

use crate::config::CollageConfig;
use crate::layout::LayoutPlan;
use crate::render::render_cell;

/// Paint every planned cell onto a background canvas and flatten to RGB.
///
/// Tiles render in parallel; pasting happens afterwards on this thread in
/// input order. Images beyond `plan.cells` (grid overflow) are not drawn.
pub fn composite(images: &[DynamicImage], plan: &LayoutPlan, config: &CollageConfig) -> RgbImage {
    let tiles: Vec<RgbaImage> = images
        .par_iter()
        .zip(plan.cells.par_iter())
        .map(|(image, cell)| {
            render_cell(
                image,
                cell.width,
                cell.height,
                config.keep_aspect(),
                config.background(),
                config.border_px(),
            )
        })
        .collect();

    let mut canvas = RgbaImage::from_pixel(
        plan.canvas_width.max(1),
        plan.canvas_height.max(1),
        config.background(),
    );

    for (tile, cell) in tiles.iter().zip(&plan.cells) {
        image::imageops::overlay(&mut canvas, tile, cell.x as i64, cell.y as i64);
    }

    DynamicImage::ImageRgba8(canvas).to_rgb8()
}
