//! Cell Renderer
//!
//! Produces one fixed-size RGBA tile per source image. Tiles are always
//! exactly the requested size:
//! - letterbox: contain-fit inside the border inset, centered on the background
//! - stretch: resized independently per axis to fill the tile
//!
//! A border, when requested, is stroked inward from the tile edge on top of
//! the content.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::color::BLACK;

const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Render `image` into a `target_w` x `target_h` tile.
pub fn render_cell(
    image: &DynamicImage,
    target_w: u32,
    target_h: u32,
    keep_aspect: bool,
    background: Rgba<u8>,
    border_px: u32,
) -> RgbaImage {
    let target_w = target_w.max(1);
    let target_h = target_h.max(1);
    let mut tile = RgbaImage::from_pixel(target_w, target_h, background);

    let (src_w, src_h) = image.dimensions();
    if src_w > 0 && src_h > 0 {
        if keep_aspect {
            let box_w = target_w.saturating_sub(border_px.saturating_mul(2)).max(1);
            let box_h = target_h.saturating_sub(border_px.saturating_mul(2)).max(1);
            let (fit_w, fit_h) = contain_size(src_w, src_h, box_w, box_h);

            let scaled = image.resize_exact(fit_w, fit_h, RESAMPLE_FILTER).to_rgba8();
            let x = (target_w - fit_w) / 2;
            let y = (target_h - fit_h) / 2;
            imageops::overlay(&mut tile, &scaled, x as i64, y as i64);
        } else {
            tile = image.resize_exact(target_w, target_h, RESAMPLE_FILTER).to_rgba8();
        }
    }

    if border_px > 0 {
        draw_border(&mut tile, border_px, BLACK);
    }

    tile
}

/// Largest size with the source's aspect ratio that fits in the box.
///
/// The limiting axis takes the box extent; the other is rounded to nearest
/// and never drops below 1 pixel.
pub fn contain_size(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let (sw, sh) = (src_w.max(1) as u64, src_h.max(1) as u64);
    let (bw, bh) = (box_w.max(1) as u64, box_h.max(1) as u64);

    if sw * bh > sh * bw {
        let h = round_div(sh * bw, sw).clamp(1, bh);
        (bw as u32, h as u32)
    } else if sw * bh < sh * bw {
        let w = round_div(sw * bh, sh).clamp(1, bw);
        (w as u32, bh as u32)
    } else {
        (bw as u32, bh as u32)
    }
}

fn round_div(num: u64, den: u64) -> u64 {
    (num + den / 2) / den
}

/// Stroke `width` concentric one-pixel outlines starting at the tile edge.
fn draw_border(tile: &mut RgbaImage, width: u32, color: Rgba<u8>) {
    let (w, h) = tile.dimensions();

    for i in 0..width {
        if 2 * i >= w || 2 * i >= h {
            break;
        }
        let rect = Rect::at(i as i32, i as i32).of_size(w - 2 * i, h - 2 * i);
        draw_hollow_rect_mut(tile, rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, image::Rgb(rgb)))
    }

    fn near(p: &Rgba<u8>, expected: [u8; 4]) -> bool {
        p.0.iter()
            .zip(expected.iter())
            .all(|(&a, &b)| (a as i16 - b as i16).abs() <= 2)
    }

    /// Bounding box of pixels that are not the background color.
    fn content_box(tile: &RgbaImage, background: Rgba<u8>) -> (u32, u32, u32, u32) {
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0, 0);
        for (x, y, p) in tile.enumerate_pixels() {
            if *p != background {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x + 1);
                y1 = y1.max(y + 1);
            }
        }
        (x0, y0, x1 - x0, y1 - y0)
    }

    #[test]
    fn test_contain_size() {
        assert_eq!(contain_size(200, 100, 100, 100), (100, 50));
        assert_eq!(contain_size(100, 200, 100, 100), (50, 100));
        assert_eq!(contain_size(400, 300, 200, 150), (200, 150));
        assert_eq!(contain_size(1000, 1, 10, 10), (10, 1));
        // 3 * 100 / 7 = 42.86 rounds up
        assert_eq!(contain_size(3, 7, 100, 100), (43, 100));
    }

    #[test]
    fn test_tile_has_exact_size() {
        let img = solid(37, 91, [10, 20, 30]);
        for keep_aspect in [true, false] {
            for border in [0, 3] {
                let tile = render_cell(&img, 64, 48, keep_aspect, WHITE, border);
                assert_eq!(tile.dimensions(), (64, 48));
            }
        }
    }

    #[test]
    fn test_letterbox_centers_content() {
        let img = solid(200, 100, [255, 0, 0]);
        let tile = render_cell(&img, 100, 100, true, WHITE, 0);

        assert_eq!(content_box(&tile, WHITE), (0, 25, 100, 50));
        assert_eq!(*tile.get_pixel(50, 0), WHITE);
        assert_eq!(*tile.get_pixel(50, 99), WHITE);
        assert!(near(tile.get_pixel(50, 50), [255, 0, 0, 255]));
    }

    #[test]
    fn test_letterbox_preserves_aspect() {
        let img = solid(300, 200, [0, 0, 255]);
        let tile = render_cell(&img, 120, 200, true, WHITE, 0);
        let (_, _, w, h) = content_box(&tile, WHITE);

        assert_eq!(w, 120);
        let expected_h = 120.0 * 200.0 / 300.0;
        assert!((h as f64 - expected_h).abs() <= 1.0);
    }

    #[test]
    fn test_letterbox_respects_border_inset() {
        let img = solid(100, 100, [0, 255, 0]);
        let tile = render_cell(&img, 100, 60, true, WHITE, 5);

        // 50x50 content box inside a 90x50 inset, centered in the full tile
        assert!(near(tile.get_pixel(25, 30), [0, 255, 0, 255]));
        assert!(near(tile.get_pixel(74, 30), [0, 255, 0, 255]));
        assert_eq!(*tile.get_pixel(24, 30), WHITE);
        assert_eq!(*tile.get_pixel(75, 30), WHITE);
    }

    #[test]
    fn test_stretch_fills_tile() {
        let img = solid(10, 300, [0, 128, 0]);
        let tile = render_cell(&img, 80, 40, false, WHITE, 0);
        assert!(tile.pixels().all(|p| near(p, [0, 128, 0, 255])));
    }

    #[test]
    fn test_border_is_drawn_inward() {
        let img = solid(50, 50, [200, 200, 200]);
        let tile = render_cell(&img, 50, 50, false, WHITE, 3);

        for i in 0..3 {
            assert_eq!(*tile.get_pixel(i, 25), BLACK);
            assert_eq!(*tile.get_pixel(49 - i, 25), BLACK);
            assert_eq!(*tile.get_pixel(25, i), BLACK);
            assert_eq!(*tile.get_pixel(25, 49 - i), BLACK);
        }
        assert!(near(tile.get_pixel(3, 25), [200, 200, 200, 255]));
        assert!(near(tile.get_pixel(25, 25), [200, 200, 200, 255]));
    }

    #[test]
    fn test_border_wider_than_tile() {
        let img = solid(10, 10, [1, 2, 3]);
        let tile = render_cell(&img, 4, 4, true, WHITE, 20);
        assert!(tile.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_zero_target_is_clamped() {
        let img = solid(10, 10, [1, 2, 3]);
        let tile = render_cell(&img, 0, 0, true, WHITE, 0);
        assert_eq!(tile.dimensions(), (1, 1));
    }

    #[test]
    fn test_does_not_mutate_source() {
        let img = solid(20, 20, [9, 9, 9]);
        let before = img.clone();
        let _ = render_cell(&img, 7, 7, true, WHITE, 1);
        assert_eq!(img, before);
    }
}
