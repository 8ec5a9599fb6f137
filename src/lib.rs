//! Photo collage layout and compositing.
//!
//! ```no_run
//! use photo_collage::{compute_collage, CollageSettings, Layout};
//!
//! let images = vec![image::open("a.jpg").unwrap(), image::open("b.jpg").unwrap()];
//! let config = CollageSettings {
//!     layout: Layout::HorizontalStrip,
//!     ..Default::default()
//! }
//! .build();
//! let collage = compute_collage(&images, &config).unwrap();
//! collage.save("collage.png").unwrap();
//! ```

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod loader;
pub mod render;

use image::{DynamicImage, GenericImageView, RgbImage};

pub use color::resolve_color;
pub use config::{CollageConfig, CollageSettings, Layout};
pub use error::{CollageError, Result};
pub use layout::{CellPlan, LayoutPlan};

/// Plan cell geometry for `images` without touching pixels.
pub fn plan_collage(images: &[DynamicImage], config: &CollageConfig) -> Result<LayoutPlan> {
    let sizes: Vec<(u32, u32)> = images.iter().map(|img| img.dimensions()).collect();
    layout::plan_layout(&sizes, config)
}

/// Arrange `images` into one opaque collage.
///
/// Fails only with [`CollageError::EmptyInput`]. Inputs are never modified.
pub fn compute_collage(images: &[DynamicImage], config: &CollageConfig) -> Result<RgbImage> {
    let plan = plan_collage(images, config)?;
    let collage = compositor::composite(images, &plan, config);

    log::info!(
        "Composited {} images into {}x{} {} collage",
        plan.cells.len(),
        collage.width(),
        collage.height(),
        config.layout()
    );
    Ok(collage)
}
