//! Layout Planner
//!
//! Turns a list of source image sizes and a [`CollageConfig`] into a
//! [`LayoutPlan`]: one rectangle per placed image plus the canvas size.
//!
//! Each layout is a [`LayoutStrategy`] that knows two things:
//! 1. Initial cell sizes, before any output cap is applied
//! 2. How to position a given set of cell sizes and size the canvas around them
//!
//! Output caps are enforced by [`fit_to_bounds`], shared by all strategies:
//! width first, then height. Each pass repeatedly multiplies every cell
//! dimension by `cap / canvas` (truncating) and re-arranges, until the canvas
//! fits or the cells can shrink no further. Gap and padding never scale.
//!
//! Pure geometry: no pixel access, no allocation beyond the plan itself.

use serde::Serialize;

use crate::config::{CollageConfig, Layout};
use crate::error::{CollageError, Result};

/// Grid cells never start larger than this on either axis.
pub const GRID_MAX_CELL: u32 = 400;
/// Horizontal strip cell height ceiling.
pub const STRIP_MAX_HEIGHT: u32 = 600;
/// Vertical strip cell width ceiling.
pub const STRIP_MAX_WIDTH: u32 = 1000;

/// (width, height) in pixels.
pub type CellSize = (u32, u32);

/// Rectangle assigned to one image, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellPlan {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellPlan {
    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn intersects(&self, other: &CellPlan) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// One cell per placed image, in input order.
    pub cells: Vec<CellPlan>,
    /// Trailing input images left out because a fixed grid was full.
    pub skipped: usize,
}

impl LayoutPlan {
    pub fn contains(&self, cell: &CellPlan) -> bool {
        cell.right() <= self.canvas_width as u64 && cell.bottom() <= self.canvas_height as u64
    }
}

// ============================================================================
// STRATEGIES
// ============================================================================

pub trait LayoutStrategy {
    /// Cell sizes before any output cap, one per image that will be placed.
    fn initial_cells(&self, sizes: &[CellSize], config: &CollageConfig) -> Vec<CellSize>;

    /// Position `cells` and size the canvas around them.
    fn arrange(&self, cells: &[CellSize], config: &CollageConfig) -> LayoutPlan;

    fn compute_initial_plan(&self, sizes: &[CellSize], config: &CollageConfig) -> LayoutPlan {
        let cells = self.initial_cells(sizes, config);
        self.arrange(&cells, config)
    }
}

/// Uniform tiling: every image gets the same cell, filled row-major.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
}

impl GridLayout {
    /// Rows come from the config, or `ceil(count / columns)` when it says 0.
    pub fn new(config: &CollageConfig, count: usize) -> Self {
        let columns = config.grid_columns().max(1);
        let rows = if config.grid_rows() > 0 {
            config.grid_rows()
        } else {
            saturate(((count as u64) + columns as u64 - 1) / columns as u64)
        };
        Self { columns, rows }
    }

    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

impl LayoutStrategy for GridLayout {
    fn initial_cells(&self, sizes: &[CellSize], _config: &CollageConfig) -> Vec<CellSize> {
        let n = sizes.len().max(1) as u64;
        let avg_w = sizes.iter().map(|&(w, _)| w as u64).sum::<u64>() / n;
        let avg_h = sizes.iter().map(|&(_, h)| h as u64).sum::<u64>() / n;

        let cell = (
            saturate(avg_w).clamp(1, GRID_MAX_CELL),
            saturate(avg_h).clamp(1, GRID_MAX_CELL),
        );
        let placed = sizes.len().min(self.capacity());
        vec![cell; placed]
    }

    fn arrange(&self, cells: &[CellSize], config: &CollageConfig) -> LayoutPlan {
        let (cell_w, cell_h) = cells.first().copied().unwrap_or((1, 1));
        let gap = config.gap() as u64;
        let padding = config.padding() as u64;

        let placed = cells
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let col = (i as u64) % self.columns as u64;
                let row = (i as u64) / self.columns as u64;
                CellPlan {
                    x: saturate(padding + col * (cell_w as u64 + gap)),
                    y: saturate(padding + row * (cell_h as u64 + gap)),
                    width: w,
                    height: h,
                }
            })
            .collect();

        LayoutPlan {
            canvas_width: span(self.columns as u64, cell_w, gap, padding),
            canvas_height: span(self.rows as u64, cell_h, gap, padding),
            cells: placed,
            skipped: 0,
        }
    }
}

/// Left-to-right strip, all cells sharing one height.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalStrip;

impl LayoutStrategy for HorizontalStrip {
    fn initial_cells(&self, sizes: &[CellSize], _config: &CollageConfig) -> Vec<CellSize> {
        let tallest = sizes.iter().map(|&(_, h)| h).max().unwrap_or(1);
        let cell_h = tallest.clamp(1, STRIP_MAX_HEIGHT);

        sizes
            .iter()
            .map(|&(w, h)| (proportional(cell_h, w, h), cell_h))
            .collect()
    }

    fn arrange(&self, cells: &[CellSize], config: &CollageConfig) -> LayoutPlan {
        let gap = config.gap() as u64;
        let padding = config.padding() as u64;

        let mut x = padding;
        let mut placed = Vec::with_capacity(cells.len());
        for &(w, h) in cells {
            placed.push(CellPlan {
                x: saturate(x),
                y: saturate(padding),
                width: w,
                height: h,
            });
            x += w as u64 + gap;
        }

        let total_w: u64 = cells.iter().map(|&(w, _)| w as u64).sum();
        let cell_h = cells.iter().map(|&(_, h)| h).max().unwrap_or(1);

        LayoutPlan {
            canvas_width: strip_length(total_w, cells.len(), gap, padding),
            canvas_height: saturate(cell_h as u64 + 2 * padding).max(1),
            cells: placed,
            skipped: 0,
        }
    }
}

/// Top-to-bottom strip, all cells sharing one width.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalStrip;

impl LayoutStrategy for VerticalStrip {
    fn initial_cells(&self, sizes: &[CellSize], _config: &CollageConfig) -> Vec<CellSize> {
        let widest = sizes.iter().map(|&(w, _)| w).max().unwrap_or(1);
        let cell_w = widest.clamp(1, STRIP_MAX_WIDTH);

        sizes
            .iter()
            .map(|&(w, h)| (cell_w, proportional(cell_w, h, w)))
            .collect()
    }

    fn arrange(&self, cells: &[CellSize], config: &CollageConfig) -> LayoutPlan {
        let gap = config.gap() as u64;
        let padding = config.padding() as u64;

        let mut y = padding;
        let mut placed = Vec::with_capacity(cells.len());
        for &(w, h) in cells {
            placed.push(CellPlan {
                x: saturate(padding),
                y: saturate(y),
                width: w,
                height: h,
            });
            y += h as u64 + gap;
        }

        let total_h: u64 = cells.iter().map(|&(_, h)| h as u64).sum();
        let cell_w = cells.iter().map(|&(w, _)| w).max().unwrap_or(1);

        LayoutPlan {
            canvas_width: saturate(cell_w as u64 + 2 * padding).max(1),
            canvas_height: strip_length(total_h, cells.len(), gap, padding),
            cells: placed,
            skipped: 0,
        }
    }
}

pub fn strategy_for(config: &CollageConfig, count: usize) -> Box<dyn LayoutStrategy> {
    match config.layout() {
        Layout::Grid => Box::new(GridLayout::new(config, count)),
        Layout::HorizontalStrip => Box::new(HorizontalStrip),
        Layout::VerticalStrip => Box::new(VerticalStrip),
    }
}

// ============================================================================
// PLANNING
// ============================================================================

/// Plan a collage for images of the given (width, height) sizes.
pub fn plan_layout(sizes: &[CellSize], config: &CollageConfig) -> Result<LayoutPlan> {
    if sizes.is_empty() {
        return Err(CollageError::EmptyInput);
    }

    // Zero-area sources would divide by zero in the aspect math.
    let sizes: Vec<CellSize> = sizes.iter().map(|&(w, h)| (w.max(1), h.max(1))).collect();

    let strategy = strategy_for(config, sizes.len());
    let initial = strategy.compute_initial_plan(&sizes, config);
    let mut plan = fit_to_bounds(strategy.as_ref(), initial, config);
    plan.skipped = sizes.len() - plan.cells.len();

    if plan.skipped > 0 {
        log::warn!(
            "Grid is full: {} of {} images left out",
            plan.skipped,
            sizes.len()
        );
    }
    log::debug!(
        "{} layout: {} cells on {}x{} canvas",
        config.layout(),
        plan.cells.len(),
        plan.canvas_width,
        plan.canvas_height
    );

    Ok(plan)
}

/// Shrink cells until the canvas respects the configured maximum width, then
/// the maximum height. A cap of 0 means unconstrained.
pub fn fit_to_bounds(
    strategy: &dyn LayoutStrategy,
    plan: LayoutPlan,
    config: &CollageConfig,
) -> LayoutPlan {
    let plan = shrink_axis(strategy, plan, config, config.max_width(), |p| p.canvas_width);
    shrink_axis(strategy, plan, config, config.max_height(), |p| p.canvas_height)
}

fn shrink_axis(
    strategy: &dyn LayoutStrategy,
    mut plan: LayoutPlan,
    config: &CollageConfig,
    cap: u32,
    extent: impl Fn(&LayoutPlan) -> u32,
) -> LayoutPlan {
    if cap == 0 {
        return plan;
    }

    while extent(&plan) > cap {
        let current = extent(&plan);
        let cells: Vec<CellSize> = plan
            .cells
            .iter()
            .map(|c| (scale_down(c.width, cap, current), scale_down(c.height, cap, current)))
            .collect();

        let unchanged = cells
            .iter()
            .zip(&plan.cells)
            .all(|(&(w, h), c)| w == c.width && h == c.height);
        if unchanged {
            log::debug!(
                "Cannot shrink below {} px to meet the {} px cap; margins alone exceed it",
                current,
                cap
            );
            break;
        }

        plan = strategy.arrange(&cells, config);
    }

    plan
}

// ============================================================================
// ARITHMETIC HELPERS
// ============================================================================

/// `value * num / den`, truncated, never below 1.
fn scale_down(value: u32, num: u32, den: u32) -> u32 {
    saturate(value as u64 * num as u64 / den.max(1) as u64).max(1)
}

/// Length along `base` of an image scaled so its `other` side equals `base`.
fn proportional(base: u32, along: u32, other: u32) -> u32 {
    scale_down(base, along, other)
}

fn span(count: u64, cell: u32, gap: u64, padding: u64) -> u32 {
    let gaps = count.saturating_sub(1) * gap;
    saturate(count * cell as u64 + gaps + 2 * padding).max(1)
}

fn strip_length(total: u64, count: usize, gap: u64, padding: u64) -> u32 {
    let gaps = (count as u64).saturating_sub(1) * gap;
    saturate(total + gaps + 2 * padding).max(1)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
