//! Tile geometry: how large one tile may be on a sheet, and where each
//! grid cell lands.
//!
//! Pure integer/float math, no pixel operations. The gap between tiles is
//! fixed; the tile size absorbs all rounding so spacing stays deterministic.
//!
//! # Example
//!
//! ```
//! use photosheet::{Size, TileGeometry};
//!
//! // 4x6 in at 600 DPI, 2 rows x 4 columns, 35x45 mm tiles, 15 px gap.
//! let g = TileGeometry::compute(Size::new(3600, 2400), 2, 4, Size::new(827, 1063), 15).unwrap();
//! assert_eq!((g.width, g.height), (827, 1063));
//! assert_eq!(g.cell(1, 3).x, 15 + 3 * (827 + 15));
//! ```

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::error::SheetError;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether this rect lies entirely within `(0, 0, w, h)`.
    pub const fn fits_within(&self, w: u32, h: u32) -> bool {
        self.right() <= w && self.bottom() <= h
    }

    /// Whether `other` lies entirely within this rect.
    pub const fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rects share any pixel.
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether this rect covers the full source (no actual crop).
    pub const fn is_full(&self, source_w: u32, source_h: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == source_w && self.height == source_h
    }
}

/// Convert a physical length to pixels at `dpi`, rounded to the nearest pixel.
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64).round() as u32
}

/// Scale a pixel length defined at `reference_dpi` to `dpi`, rounded.
pub fn scale_px(px: u32, reference_dpi: u32, dpi: u32) -> u32 {
    if reference_dpi == 0 {
        return px;
    }
    ((px as u64 * dpi as u64 + reference_dpi as u64 / 2) / reference_dpi as u64) as u32
}

/// Pixel size of one tile and the gap kept around it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileGeometry {
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
    /// Gap between columns and at the left/right sheet margins.
    pub h_gap: u32,
    /// Gap between rows and at the top/bottom sheet margins.
    pub v_gap: u32,
}

impl TileGeometry {
    /// Largest tile no bigger than `nominal` that fits a `rows × cols` grid
    /// on `sheet` while keeping `gap` pixels between tiles and at the edges.
    ///
    /// The tile keeps the nominal aspect ratio; only the tighter axis decides
    /// the shrink factor, and tiles are never upscaled.
    pub fn compute(
        sheet: Size,
        rows: u32,
        cols: u32,
        nominal: Size,
        gap: u32,
    ) -> Result<Self, SheetError> {
        if rows == 0 || cols == 0 {
            return Err(SheetError::InvalidInput("grid needs at least one row and column"));
        }
        if nominal.is_empty() {
            return Err(SheetError::InvalidInput("nominal tile size is zero"));
        }
        let does_not_fit = SheetError::LayoutDoesNotFit {
            width: sheet.width,
            height: sheet.height,
            gap,
        };

        let avail_w = sheet.width as i64 - (cols as i64 + 1) * gap as i64;
        let avail_h = sheet.height as i64 - (rows as i64 + 1) * gap as i64;
        if avail_w <= 0 || avail_h <= 0 {
            return Err(does_not_fit);
        }

        let col_w = avail_w as f64 / cols as f64;
        let row_h = avail_h as f64 / rows as f64;
        let nw = nominal.width as f64;
        let nh = nominal.height as f64;

        let scale_w = col_w / nw;
        let scale_h = row_h / nh;

        // The limiting axis takes the column/row size directly; the other
        // axis is derived from it. Same result as `floor(nominal * scale)`
        // without the divide-then-multiply drift.
        let (width, height) = if scale_w >= 1.0 && scale_h >= 1.0 {
            (nominal.width, nominal.height)
        } else if scale_w <= scale_h {
            (col_w.floor() as u32, (nh * col_w / nw).floor() as u32)
        } else {
            ((nw * row_h / nh).floor() as u32, row_h.floor() as u32)
        };

        if width == 0 || height == 0 {
            return Err(does_not_fit);
        }

        Ok(Self {
            width,
            height,
            h_gap: gap,
            v_gap: gap,
        })
    }

    /// Tile size as a [`Size`].
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rectangle of the cell at `(row, col)`.
    pub const fn cell(&self, row: u32, col: u32) -> Rect {
        Rect::new(
            self.h_gap + col * (self.width + self.h_gap),
            self.v_gap + row * (self.height + self.v_gap),
            self.width,
            self.height,
        )
    }

    /// Shrink factor applied to the nominal tile (`≤ 1`).
    pub fn scale(&self, nominal: Size) -> f64 {
        (self.width as f64 / nominal.width as f64).min(self.height as f64 / nominal.height as f64)
    }
}

/// Row-major cell coordinates of a `rows × cols` grid, truncated to `count`.
pub fn grid_cells(rows: u32, cols: u32, count: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..rows)
        .flat_map(move |row| (0..cols).map(move |col| (row, col)))
        .take(count as usize)
}
