//! # Page Sizes
//!
//! Physical page dimensions known to the editor.
//!
//! ## Built-in Sizes
//!
//! | Key | Label | Width | Height | Unit |
//! |-----|-------|-------|--------|------|
//! | `a4` | A4 (210 × 297 mm) | 210 | 297 | mm |
//! | `letter` | Letter (8.5 × 11 in) | 8.5 | 11 | in |
//! | `legal` | Legal (8.5 × 14 in) | 8.5 | 14 | in |
//!
//! Additional sizes can be registered with [`PageSizeTable::insert`] or loaded
//! from a JSON array with [`PageSizeTable::extend_from_json`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Measurement unit of a page size.
///
/// Unrecognised unit strings are kept verbatim in [`Unit::Other`] so that a
/// table loaded from configuration serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Mm,
    Cm,
    In,
    Pt,
    Px,
    Other(String),
}

impl Unit {
    /// The unit's short name as written in page size tables.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
            Self::Pt => "pt",
            Self::Px => "px",
            Self::Other(s) => s,
        }
    }

    /// PDF points (1/72 inch) per one unit.
    ///
    /// Returns `None` for units the PDF backend does not understand.
    pub fn points_per_unit(&self) -> Option<f64> {
        match self {
            Self::Mm => Some(72.0 / 25.4),
            Self::Cm => Some(72.0 / 2.54),
            Self::In => Some(72.0),
            Self::Pt => Some(1.0),
            Self::Px => Some(0.75),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "mm" => Self::Mm,
            "cm" => Self::Cm,
            "in" => Self::In,
            "pt" => Self::Pt,
            "px" => Self::Px,
            _ => Self::Other(s),
        }
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named physical page dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Lookup key stored in `Template::page_size` (e.g. "a4")
    pub key: Cow<'static, str>,
    /// Human-readable label for page size pickers
    pub label: Cow<'static, str>,
    /// Physical width in `unit`
    pub width: f64,
    /// Physical height in `unit`
    pub height: f64,
    pub unit: Unit,
}

impl PageSize {
    /// ISO A4, 210 × 297 mm.
    pub const A4: Self = Self {
        key: Cow::Borrowed("a4"),
        label: Cow::Borrowed("A4 (210 × 297 mm)"),
        width: 210.0,
        height: 297.0,
        unit: Unit::Mm,
    };

    /// US Letter, 8.5 × 11 in.
    pub const LETTER: Self = Self {
        key: Cow::Borrowed("letter"),
        label: Cow::Borrowed("Letter (8.5 × 11 in)"),
        width: 8.5,
        height: 11.0,
        unit: Unit::In,
    };

    /// US Legal, 8.5 × 14 in.
    pub const LEGAL: Self = Self {
        key: Cow::Borrowed("legal"),
        label: Cow::Borrowed("Legal (8.5 × 14 in)"),
        width: 8.5,
        height: 14.0,
        unit: Unit::In,
    };

    /// Create a custom page size.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        width: f64,
        height: f64,
        unit: Unit,
    ) -> Self {
        Self {
            key: Cow::Owned(key.into()),
            label: Cow::Owned(label.into()),
            width,
            height,
            unit,
        }
    }

    /// Whether the page is wider than it is tall.
    #[inline]
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Ordered lookup table of page sizes.
///
/// Lookups never fail: an unknown key resolves to the table's `a4` entry, or
/// to [`PageSize::A4`] if the table has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSizeTable {
    sizes: Vec<PageSize>,
}

impl PageSizeTable {
    /// The three sizes that ship by default.
    pub fn builtin() -> Self {
        Self {
            sizes: vec![PageSize::A4, PageSize::LETTER, PageSize::LEGAL],
        }
    }

    /// An empty table. Every lookup falls back to [`PageSize::A4`].
    pub fn empty() -> Self {
        Self { sizes: Vec::new() }
    }

    /// Look up a size by key without fallback.
    pub fn get(&self, key: &str) -> Option<&PageSize> {
        self.sizes.iter().find(|s| s.key == key)
    }

    /// Look up a size by key, falling back to A4.
    pub fn resolve(&self, key: &str) -> &PageSize {
        const FALLBACK: &PageSize = &PageSize::A4;
        self.get(key)
            .or_else(|| self.get(FALLBACK.key.as_ref()))
            .unwrap_or(FALLBACK)
    }

    /// Add a size, replacing any entry with the same key in place.
    pub fn insert(&mut self, size: PageSize) {
        match self.sizes.iter_mut().find(|s| s.key == size.key) {
            Some(existing) => *existing = size,
            None => self.sizes.push(size),
        }
    }

    /// Merge sizes from a JSON array of page size objects.
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let sizes: Vec<PageSize> = serde_json::from_str(json)?;
        for size in sizes {
            self.insert(size);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageSize> {
        self.sizes.iter()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl Default for PageSizeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// TESTS
// ============================================================================
