use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::resolve_color;
use crate::error::CollageError;

// ============================================================================
// PARAMETER RANGES
// ============================================================================

pub const GRID_COLUMNS_RANGE: (u32, u32) = (1, 10);
pub const GRID_ROWS_RANGE: (u32, u32) = (0, 10);
pub const GAP_RANGE: (u32, u32) = (0, 40);
pub const PADDING_RANGE: (u32, u32) = (0, 100);
pub const BORDER_RANGE: (u32, u32) = (1, 20);
pub const MAX_DIMENSION_RANGE: (u32, u32) = (0, 10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Grid,
    HorizontalStrip,
    VerticalStrip,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Grid => "grid",
            Layout::HorizontalStrip => "horizontal_strip",
            Layout::VerticalStrip => "vertical_strip",
        };
        f.write_str(name)
    }
}

impl FromStr for Layout {
    type Err = CollageError;

    /// Accepts snake_case names as well as the picker labels ("Horizontal strip").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "grid" => Ok(Layout::Grid),
            "horizontal_strip" | "horizontal" => Ok(Layout::HorizontalStrip),
            "vertical_strip" | "vertical" => Ok(Layout::VerticalStrip),
            _ => Err(CollageError::InvalidParameter(format!("Unknown layout: {}", s))),
        }
    }
}

// ============================================================================
// RAW SETTINGS
// ============================================================================

/// Unvalidated collage parameters as a caller collects them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageSettings {
    pub layout: Layout,
    /// Hex, CSS keyword or `rgb()` spec (default: "#FFFFFF")
    pub background: String,
    /// Space between neighbouring cells (default: 8)
    pub gap: u32,
    /// Outer margin around all cells (default: 24)
    pub padding: u32,
    /// Letterbox images instead of stretching them (default: true)
    pub keep_aspect: bool,
    pub add_border: bool,
    /// Border stroke, only used when `add_border` is set (default: 4)
    pub border_px: u32,
    pub grid_columns: u32,
    /// 0 = derive from image count
    pub grid_rows: u32,
    /// 0 = unconstrained
    pub max_width: u32,
    /// 0 = unconstrained
    pub max_height: u32,
}

impl Default for CollageSettings {
    fn default() -> Self {
        Self {
            layout: Layout::Grid,
            background: "#FFFFFF".to_string(),
            gap: 8,
            padding: 24,
            keep_aspect: true,
            add_border: false,
            border_px: 4,
            grid_columns: 3,
            grid_rows: 0,
            max_width: 0,
            max_height: 0,
        }
    }
}

fn clamp_field(name: &str, value: u32, (min, max): (u32, u32)) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::debug!("Clamped {} from {} to {}", name, value, clamped);
    }
    clamped
}

impl CollageSettings {
    /// Clamp every field into its accepted range and resolve the background.
    ///
    /// Never fails: out-of-range values are pulled to the nearest bound and an
    /// unparseable background becomes white.
    pub fn build(&self) -> CollageConfig {
        let border_px = if self.add_border {
            clamp_field("border_px", self.border_px, BORDER_RANGE)
        } else {
            0
        };

        CollageConfig {
            layout: self.layout,
            gap: clamp_field("gap", self.gap, GAP_RANGE),
            padding: clamp_field("padding", self.padding, PADDING_RANGE),
            keep_aspect: self.keep_aspect,
            border_px,
            background: resolve_color(&self.background),
            grid_columns: clamp_field("grid_columns", self.grid_columns, GRID_COLUMNS_RANGE),
            grid_rows: clamp_field("grid_rows", self.grid_rows, GRID_ROWS_RANGE),
            max_width: clamp_field("max_width", self.max_width, MAX_DIMENSION_RANGE),
            max_height: clamp_field("max_height", self.max_height, MAX_DIMENSION_RANGE),
        }
    }
}

// ============================================================================
// RESOLVED CONFIG
// ============================================================================

/// Validated, immutable collage parameters.
///
/// Only obtainable through [`CollageSettings::build`], so every field is
/// within range. Grid fields are ignored by the strip layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollageConfig {
    layout: Layout,
    gap: u32,
    padding: u32,
    keep_aspect: bool,
    border_px: u32,
    background: Rgba<u8>,
    grid_columns: u32,
    grid_rows: u32,
    max_width: u32,
    max_height: u32,
}

impl CollageConfig {
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn keep_aspect(&self) -> bool {
        self.keep_aspect
    }

    /// Border stroke in pixels, 0 when borders are off.
    pub fn border_px(&self) -> u32 {
        self.border_px
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn grid_columns(&self) -> u32 {
        self.grid_columns
    }

    pub fn grid_rows(&self) -> u32 {
        self.grid_rows
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }
}

impl Default for CollageConfig {
    fn default() -> Self {
        CollageSettings::default().build()
    }
}
