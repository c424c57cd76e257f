//! Grid snapping and overlay geometry.
//!
//! ```text
//!  0        100       200
//!  ┊  ┊  ┊  │  ┊  ┊  ┊  │     ┊ minor line every 25 px
//!                             │ major line every 100 px
//! ```

use serde::Serialize;

use crate::page::CanvasSize;

/// Grid cell size in canvas pixels.
pub const GRID_SIZE: f64 = 25.0;

/// Spacing of ruler labels and major grid lines.
pub const RULER_STEP: f64 = 100.0;

/// Round a coordinate to the nearest grid line.
///
/// Halves round away from zero, so 12.5 snaps to 25.
#[inline]
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub offset: f64,
    /// Falls on a ruler step
    pub major: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GridOverlay {
    /// Vertical lines, by x offset
    pub vertical: Vec<GridLine>,
    /// Horizontal lines, by y offset
    pub horizontal: Vec<GridLine>,
    /// Ruler label positions along the top edge
    pub ruler_x: Vec<f64>,
    /// Ruler label positions along the left edge
    pub ruler_y: Vec<f64>,
}

fn lines(extent: f64, grid_size: f64) -> Vec<GridLine> {
    (1..)
        .map(|i| i as f64 * grid_size)
        .take_while(|&offset| offset < extent)
        .map(|offset| GridLine {
            offset,
            major: offset % RULER_STEP == 0.0,
        })
        .collect()
}

fn ruler(extent: f64) -> Vec<f64> {
    (0..)
        .map(|i| i as f64 * RULER_STEP)
        .take_while(|&offset| offset < extent)
        .collect()
}

/// Grid lines strictly inside the canvas (none at 0) and ruler labels from 0.
pub fn grid_lines(canvas: CanvasSize, grid_size: f64) -> GridOverlay {
    if grid_size <= 0.0 {
        return GridOverlay::default();
    }
    GridOverlay {
        vertical: lines(canvas.width, grid_size),
        horizontal: lines(canvas.height, grid_size),
        ruler_x: ruler(canvas.width),
        ruler_y: ruler(canvas.height),
    }
}
