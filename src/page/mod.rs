//! # Page Module
//!
//! Page sizes and the coordinate model that maps them onto the editor canvas.
//!
//! ## Modules
//!
//! - [`size`]: Page size table (A4, Letter, Legal, plus user entries)
//! - [`convert`]: Canvas pixel size and pixel → physical unit conversion
//!
//! ## Usage
//!
//! ```
//! use template_composer::page::{self, PageSizeTable};
//!
//! let canvas = page::canvas_size("a4");
//! assert!((canvas.width - 210.0 * 2.83).abs() < 1e-9);
//!
//! // Unknown keys fall back to A4
//! let table = PageSizeTable::builtin();
//! assert_eq!(table.resolve("tabloid").key, "a4");
//! ```

pub mod convert;
pub mod size;

pub use convert::{CanvasSize, PhysicalPoint, SCALE_FACTOR, canvas_size, to_physical};
pub use size::{PageSize, PageSizeTable, Unit};
