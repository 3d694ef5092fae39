//! Sheet planning: every rectangle the compositor will touch, computed
//! up front without a raster.

use alloc::vec::Vec;

use crate::catalog::{LayoutSpec, SheetSpec};
use crate::crop::fit_crop;
use crate::distribution::SlotAssignment;
use crate::error::SheetError;
use crate::geometry::{Rect, Size, TileGeometry, grid_cells, scale_px};
use crate::options::{REFERENCE_DPI, SheetOptions};

/// Label glyph cell width in font units (5 px glyph + 1 px spacing).
pub const GLYPH_ADVANCE: u32 = 6;
/// Label glyph height in font units.
pub const GLYPH_HEIGHT: u32 = 7;
/// Badge inset from the tile's top-left corner, px at 600 DPI.
const BADGE_INSET_PX: u32 = 10;
/// Font unit size at 600 DPI.
const BADGE_UNIT_PX: u32 = 4;

/// One placed tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilePlacement {
    /// Position in placement order (0-based).
    pub slot: usize,
    pub row: u32,
    pub col: u32,
    /// Where the tile lands on the sheet.
    pub cell: Rect,
    /// Index of the source image drawn here.
    pub image_index: usize,
    /// Label badge, in tile-local coordinates.
    pub badge: Option<Badge>,
}

/// Opaque label badge showing the 1-based source index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Badge {
    /// Badge rectangle, tile-local.
    pub rect: Rect,
    /// Top-left of the first glyph, tile-local.
    pub text_origin: (u32, u32),
    /// Pixels per font unit.
    pub unit: u32,
    /// The number shown.
    pub number: usize,
}

impl Badge {
    /// Lay out a badge for `number` at `dpi`, or `None` when it would crowd `tile`.
    fn layout(number: usize, tile: Size, dpi: u32) -> Option<Self> {
        let unit = scale_px(BADGE_UNIT_PX, REFERENCE_DPI, dpi).max(1);
        let inset = scale_px(BADGE_INSET_PX, REFERENCE_DPI, dpi).max(1);
        let digits = decimal_digits(number);
        let pad = unit * 2;
        let text_w = digits * GLYPH_ADVANCE * unit - unit;
        let text_h = GLYPH_HEIGHT * unit;
        let rect = Rect::new(inset, inset, text_w + 2 * pad, text_h + 2 * pad);
        // A badge that would cover more than half the tile hides the face.
        if rect.right() * 2 > tile.width || rect.bottom() * 2 > tile.height {
            return None;
        }
        Some(Self {
            rect,
            text_origin: (inset + pad, inset + pad),
            unit,
            number,
        })
    }
}

fn decimal_digits(mut n: usize) -> u32 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Pure geometry for one sheet: tile size, cell rectangles, and which
/// source each cell shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetPlan {
    /// The layout being filled.
    pub layout: LayoutSpec,
    /// The page it is printed on.
    pub sheet: SheetSpec,
    /// Tile size and gaps.
    pub geometry: TileGeometry,
    /// Nominal (unscaled) tile size at the sheet's DPI.
    pub nominal: Size,
    /// Cut-guide width in pixels at the sheet's DPI.
    pub border: u32,
    /// Placed tiles in row-major order.
    pub tiles: Vec<TilePlacement>,
    assignment: SlotAssignment,
}

impl SheetPlan {
    /// Plan a sheet for `image_count` sources.
    pub fn new(
        layout: &LayoutSpec,
        sheet: &SheetSpec,
        image_count: usize,
        options: &SheetOptions,
    ) -> Result<Self, SheetError> {
        layout.validate()?;
        if layout.sheet != sheet.id {
            return Err(SheetError::SheetMismatch {
                layout: layout.key,
                expected: layout.sheet,
                found: sheet.id,
            });
        }
        options.validate()?;
        let assignment = SlotAssignment::plan(image_count, layout.tile_count as usize)?;

        let nominal = options.tile_size.to_px(sheet.dpi);
        let gap = scale_px(options.gap_px, REFERENCE_DPI, sheet.dpi);
        let geometry = TileGeometry::compute(sheet.size(), layout.rows, layout.cols, nominal, gap)?;
        let border = match options.border_px {
            0 => 0,
            px => scale_px(px, REFERENCE_DPI, sheet.dpi).max(1),
        };
        let labeled = options.labels.applies(image_count);

        let tiles = grid_cells(layout.rows, layout.cols, layout.tile_count)
            .zip(assignment.iter())
            .enumerate()
            .map(|(slot, ((row, col), image_index))| TilePlacement {
                slot,
                row,
                col,
                cell: geometry.cell(row, col),
                image_index,
                badge: if labeled {
                    Badge::layout(image_index + 1, geometry.size(), sheet.dpi)
                } else {
                    None
                },
            })
            .collect();

        tracing::debug!(
            layout = layout.key,
            images = image_count,
            tile_w = geometry.width,
            tile_h = geometry.height,
            gap,
            "planned sheet"
        );

        Ok(Self {
            layout: *layout,
            sheet: *sheet,
            geometry,
            nominal,
            border,
            tiles,
            assignment,
        })
    }

    /// Output raster size.
    pub fn canvas(&self) -> Size {
        self.sheet.size()
    }

    /// Tile size.
    pub fn tile_size(&self) -> Size {
        self.geometry.size()
    }

    /// Slot assignment backing [`tiles`](Self::tiles).
    pub fn assignment(&self) -> &SlotAssignment {
        &self.assignment
    }

    /// Number of sources this plan expects.
    pub fn image_count(&self) -> usize {
        self.assignment.image_count()
    }

    /// Source region to sample for an image of size `source`.
    pub fn source_crop(&self, source: Size) -> Result<Rect, SheetError> {
        fit_crop(source, self.tile_size())
    }

    /// Source crops for every image, in image-index order.
    pub fn source_crops(&self, sources: &[Size]) -> Result<Vec<Rect>, SheetError> {
        if sources.len() != self.image_count() {
            return Err(SheetError::InvalidInput("source count does not match the plan"));
        }
        sources.iter().map(|&s| self.source_crop(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolve;
    use crate::options::LabelMode;

    fn plan(key: &str, images: usize) -> SheetPlan {
        let (layout, sheet) = resolve(key).unwrap();
        SheetPlan::new(layout, sheet, images, &SheetOptions::default()).unwrap()
    }

    #[test]
    fn single_image_four_by_six() {
        let p = plan("4x6-8", 1);
        assert_eq!(p.canvas(), Size::new(3600, 2400));
        assert_eq!(p.tiles.len(), 8);
        assert!(p.tiles.iter().all(|t| t.image_index == 0));
        assert!(p.tiles.iter().all(|t| t.badge.is_none()));
        assert!(p.tiles.iter().all(|t| t.cell.width == 827 && t.cell.height == 1063));
        assert_eq!(p.border, 2);
    }

    #[test]
    fn multi_image_tiles_are_labeled_in_order() {
        let p = plan("4x6-10", 3);
        let order: Vec<usize> = p.tiles.iter().map(|t| t.image_index).collect();
        assert_eq!(order, [0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
        for t in &p.tiles {
            let badge = t.badge.unwrap();
            assert_eq!(badge.number, t.image_index + 1);
            assert!(badge.rect.fits_within(t.cell.width, t.cell.height));
            assert!(badge.rect.x >= p.border && badge.rect.y >= p.border);
        }
    }

    #[test]
    fn row_major_placement() {
        let p = plan("4x6-10", 1);
        assert_eq!((p.tiles[4].row, p.tiles[4].col), (0, 4));
        assert_eq!((p.tiles[5].row, p.tiles[5].col), (1, 0));
        assert_eq!(p.tiles[5].cell.x, p.geometry.h_gap);
    }

    #[test]
    fn a4_32_leaves_last_row_partial() {
        let p = plan("A4-32", 6);
        assert_eq!(p.tiles.len(), 32);
        let last = p.tiles.last().unwrap();
        assert_eq!((last.row, last.col), (5, 1));
    }

    #[test]
    fn every_catalog_plan_stays_on_sheet() {
        for layout in &crate::catalog::LAYOUTS {
            let p = plan(layout.key, 1);
            let canvas = p.canvas();
            assert!(p.geometry.scale(p.nominal) <= 1.0);
            for t in &p.tiles {
                assert!(t.cell.fits_within(canvas.width, canvas.height), "{}", layout.key);
            }
        }
    }

    #[test]
    fn labels_can_be_forced() {
        let (layout, sheet) = resolve("4x6-8").unwrap();
        let options = SheetOptions::default().labels(LabelMode::Always);
        let p = SheetPlan::new(layout, sheet, 1, &options).unwrap();
        assert!(p.tiles.iter().all(|t| t.badge.is_some_and(|b| b.number == 1)));

        let options = SheetOptions::default().labels(LabelMode::Never);
        let p = SheetPlan::new(layout, sheet, 2, &options).unwrap();
        assert!(p.tiles.iter().all(|t| t.badge.is_none()));
    }

    #[test]
    fn badge_scales_with_dpi() {
        let b = Badge::layout(3, Size::new(827, 1063), 600).unwrap();
        assert_eq!(b.unit, 4);
        assert_eq!(b.rect, Rect::new(10, 10, 5 * 4 + 16, 7 * 4 + 16));
        assert_eq!(b.text_origin, (18, 18));

        let wide = Badge::layout(12, Size::new(827, 1063), 600).unwrap();
        assert_eq!(wide.rect.width, 2 * 6 * 4 - 4 + 16);
    }

    #[test]
    fn badge_dropped_on_tiny_tiles() {
        assert!(Badge::layout(1, Size::new(40, 40), 600).is_none());
    }

    #[test]
    fn layout_must_match_its_sheet() {
        let layout = LayoutSpec::find("A4-36").unwrap();
        let sheet = SheetSpec::find("4x6").unwrap();
        let err = SheetPlan::new(layout, sheet, 1, &SheetOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SheetError::SheetMismatch {
                layout: "A4-36",
                expected: "A4",
                found: "4x6"
            }
        ));
    }

    #[test]
    fn too_many_images_for_slots() {
        let (layout, sheet) = resolve("4x6-8").unwrap();
        let err = SheetPlan::new(layout, sheet, 9, &SheetOptions::default()).unwrap_err();
        assert!(matches!(err, SheetError::TooManyImagesForSlots { images: 9, slots: 8 }));
    }

    #[test]
    fn source_crops_match_image_count() {
        let p = plan("4x6-8", 2);
        let crops = p
            .source_crops(&[Size::new(2000, 3000), Size::new(827, 1063)])
            .unwrap();
        assert_eq!(crops[0].width, 2000);
        assert!(crops[1].is_full(827, 1063));
        assert!(p.source_crops(&[Size::new(10, 10)]).is_err());
    }
}
