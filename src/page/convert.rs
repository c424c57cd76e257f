//! # Coordinate Conversion
//!
//! Variables are authored in canvas pixel space; exporters work in the page's
//! physical unit. This module maps between the two.
//!
//! ## Calculations
//!
//! ```text
//! mm pages:   px = mm × 2.83
//! in pages:   px = in × 72 × 2.83 / 25.4
//! otherwise:  794 × 1123 px
//!
//! For A4:
//!   210 mm × 2.83 = 594.3 px
//!   297 mm × 2.83 = 840.51 px
//! ```
//!
//! The inch formula mixes 72 pt/in with the millimetre scale factor. Exported
//! output was tuned against these exact numbers, so they are kept as is.

use serde::{Deserialize, Serialize};

use super::size::{PageSize, PageSizeTable, Unit};

/// Canvas pixels per physical millimetre.
pub const SCALE_FACTOR: f64 = 2.83;

/// Canvas size used when a page's unit has no pixel mapping.
pub const FALLBACK_CANVAS: CanvasSize = CanvasSize {
    width: 794.0,
    height: 1123.0,
};

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// A position in the page's physical unit, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalPoint {
    pub x: f64,
    pub y: f64,
}

impl PageSize {
    /// Canvas pixel size for this page.
    pub fn canvas_size(&self) -> CanvasSize {
        match self.unit {
            Unit::Mm => CanvasSize {
                width: self.width * SCALE_FACTOR,
                height: self.height * SCALE_FACTOR,
            },
            Unit::In => CanvasSize {
                width: self.width * 72.0 * SCALE_FACTOR / 25.4,
                height: self.height * 72.0 * SCALE_FACTOR / 25.4,
            },
            _ => FALLBACK_CANVAS,
        }
    }
}

impl PageSizeTable {
    /// Canvas pixel size for a page size key. Unknown keys use A4.
    pub fn canvas_size(&self, key: &str) -> CanvasSize {
        self.resolve(key).canvas_size()
    }
}

/// Canvas pixel size for a key in the built-in page size table.
///
/// ```
/// use template_composer::page::canvas_size;
///
/// assert_eq!(canvas_size("a4"), canvas_size("no-such-size"));
/// ```
pub fn canvas_size(key: &str) -> CanvasSize {
    PageSizeTable::builtin().canvas_size(key)
}

/// Rescale a canvas pixel position onto the physical page.
///
/// The mapping is a pure ratio: the canvas centre lands on the page centre
/// whatever the page's unit.
pub fn to_physical(x: f64, y: f64, canvas: CanvasSize, page: &PageSize) -> PhysicalPoint {
    PhysicalPoint {
        x: (x / canvas.width) * page.width,
        y: (y / canvas.height) * page.height,
    }
}

// ============================================================================
// TESTS
// ============================================================================
