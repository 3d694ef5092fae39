//! Static sheet and layout catalog.
//!
//! Sheets are physical pages rendered at [`PRINT_DPI`]; layouts name a
//! sheet plus a tile grid. Keys are stable and meant to be shown to users
//! and stored by callers (`"4x6-8"`, `"A4-36"`).

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::distribution::distribution;
use crate::error::SheetError;
use crate::geometry::Size;

/// Print resolution of every cataloged sheet.
pub const PRINT_DPI: u32 = 600;

/// A physical output page at a fixed print resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SheetSpec {
    /// Catalog id, e.g. `"4x6"`.
    pub id: &'static str,
    /// Width in pixels.
    pub width_px: u32,
    /// Height in pixels.
    pub height_px: u32,
    /// Resolution the pixel size was computed at.
    pub dpi: u32,
    /// Human-readable description.
    pub label: &'static str,
    /// CSS `@page size` value for a print dialog.
    pub page_size: &'static str,
}

impl SheetSpec {
    /// Sheet size in pixels.
    pub const fn size(&self) -> Size {
        Size::new(self.width_px, self.height_px)
    }

    /// Look up a cataloged sheet by id.
    pub fn find(id: &str) -> Option<&'static SheetSpec> {
        SHEETS.iter().find(|s| s.id == id)
    }
}

/// A tile grid on a cataloged sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutSpec {
    /// Catalog key, e.g. `"4x6-8"`.
    pub key: &'static str,
    /// Id of the [`SheetSpec`] this layout is printed on.
    pub sheet: &'static str,
    /// Number of tiles placed. Trailing cells beyond this stay blank.
    pub tile_count: u32,
    pub rows: u32,
    pub cols: u32,
}

impl LayoutSpec {
    /// Look up a cataloged layout by key.
    pub fn find(key: &str) -> Option<&'static LayoutSpec> {
        LAYOUTS.iter().find(|l| l.key == key)
    }

    /// Check the grid can hold every tile.
    pub fn validate(&self) -> Result<(), SheetError> {
        let cells = self.rows as u64 * self.cols as u64;
        if self.tile_count == 0 || self.rows == 0 || self.cols == 0 || cells < self.tile_count as u64 {
            return Err(SheetError::InvalidLayout {
                key: self.key,
                rows: self.rows,
                cols: self.cols,
                tiles: self.tile_count,
            });
        }
        Ok(())
    }

    /// Slots per source image if `image_count` images share this layout.
    pub fn distribution_for(&self, image_count: usize) -> Result<Vec<usize>, SheetError> {
        distribution(image_count, self.tile_count as usize)
    }
}

/// Resolve a layout key to the layout and its sheet.
pub fn resolve(key: &str) -> Result<(&'static LayoutSpec, &'static SheetSpec), SheetError> {
    let layout = LayoutSpec::find(key).ok_or_else(|| SheetError::UnknownLayout(key.to_string()))?;
    let sheet =
        SheetSpec::find(layout.sheet).ok_or_else(|| SheetError::UnknownLayout(key.to_string()))?;
    layout.validate()?;
    Ok((layout, sheet))
}

/// `round(mm / 25.4 * dpi)` in integer arithmetic, for const tables.
const fn mm_px(mm: u32, dpi: u32) -> u32 {
    (mm * dpi * 20 + 254) / 508
}

/// Cataloged sheets.
pub static SHEETS: [SheetSpec; 2] = [
    SheetSpec {
        id: "4x6",
        width_px: 6 * PRINT_DPI,
        height_px: 4 * PRINT_DPI,
        dpi: PRINT_DPI,
        label: "4x6 inches (Landscape)",
        page_size: "6in 4in",
    },
    SheetSpec {
        id: "A4",
        width_px: mm_px(210, PRINT_DPI),
        height_px: mm_px(297, PRINT_DPI),
        dpi: PRINT_DPI,
        label: "A4 (210x297 mm)",
        page_size: "A4",
    },
];

/// Cataloged layouts.
pub static LAYOUTS: [LayoutSpec; 4] = [
    LayoutSpec {
        key: "4x6-8",
        sheet: "4x6",
        tile_count: 8,
        rows: 2,
        cols: 4,
    },
    LayoutSpec {
        key: "4x6-10",
        sheet: "4x6",
        tile_count: 10,
        rows: 2,
        cols: 5,
    },
    LayoutSpec {
        key: "A4-36",
        sheet: "A4",
        tile_count: 36,
        rows: 6,
        cols: 6,
    },
    LayoutSpec {
        key: "A4-32",
        sheet: "A4",
        tile_count: 32,
        rows: 6,
        cols: 6,
    },
];
