//! Fit-Crop: center-crop a source to a tile's aspect ratio.
//!
//! The crop always fills the tile. Content outside the centered region is
//! discarded; nothing is letterboxed and nothing is stretched.
//!
//! ```
//! use photosheet::{Rect, Size, fit_crop};
//!
//! // Portrait 2000×3000 source into a 780×1000 tile: crop the height.
//! let r = fit_crop(Size::new(2000, 3000), Size::new(780, 1000)).unwrap();
//! assert_eq!(r, Rect::new(0, 218, 2000, 2564));
//! ```

use crate::error::SheetError;
use crate::geometry::{Rect, Size};

/// Region of `source` with the aspect ratio of `tile`, centered.
///
/// When the source is relatively wider than the tile the full height is kept
/// and the width is cropped to `source.height * tile_aspect`; otherwise the
/// full width is kept and the height is cropped to `source.width / tile_aspect`.
/// Crop lengths are rounded to whole pixels and clamped to the source.
pub fn fit_crop(source: Size, tile: Size) -> Result<Rect, SheetError> {
    if source.is_empty() {
        return Err(SheetError::InvalidInput("source image has zero width or height"));
    }
    if tile.is_empty() {
        return Err(SheetError::InvalidInput("tile has zero width or height"));
    }

    let (sw, sh) = (source.width as u64, source.height as u64);
    let (tw, th) = (tile.width as u64, tile.height as u64);

    // Cross-multiply so equal ratios never depend on float comparison.
    let cross_s = sw * th;
    let cross_t = sh * tw;
    if cross_s == cross_t {
        return Ok(Rect::new(0, 0, source.width, source.height));
    }

    if cross_s > cross_t {
        // Source is wider: keep full height, crop width.
        let crop_w = round_div(sh * tw, th).clamp(1, sw) as u32;
        let x = (source.width - crop_w) / 2;
        Ok(Rect::new(x, 0, crop_w, source.height))
    } else {
        // Source is taller: keep full width, crop height.
        let crop_h = round_div(sw * th, tw).clamp(1, sh) as u32;
        let y = (source.height - crop_h) / 2;
        Ok(Rect::new(0, y, source.width, crop_h))
    }
}

/// `round(n / d)` for positive integers, halves rounding up.
fn round_div(n: u64, d: u64) -> u64 {
    (2 * n + d) / (2 * d)
}
