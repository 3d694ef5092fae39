//! Sheet compositing.
//!
//! Every slot assigned to the same image renders the same tile, so each
//! source is cropped and resampled once and then blitted into all of its
//! cells.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, RgbaImage, imageops};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as PixelRect;

use crate::error::SheetError;
use crate::geometry::Size;
use crate::options::SheetOptions;
use crate::plan::{Badge, SheetPlan};

use super::glyphs::draw_badge;

const BADGE_FILL: Rgb<u8> = Rgb([255, 255, 255]);
const BADGE_INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Paint `plan` using `images` (indexed like the plan's assignment).
pub fn compose_sheet(
    plan: &SheetPlan,
    images: &[DynamicImage],
    options: &SheetOptions,
) -> Result<RgbImage, SheetError> {
    if images.len() != plan.image_count() {
        return Err(SheetError::InvalidInput("image count does not match the plan"));
    }

    let tiles = images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let badge = plan
                .tiles
                .iter()
                .find(|t| t.image_index == index)
                .and_then(|t| t.badge);
            render_tile(image, plan.tile_size(), plan.border, badge.as_ref(), options)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Size { width, height } = plan.canvas();
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(options.background));
    for placement in &plan.tiles {
        let tile = &tiles[placement.image_index];
        imageops::replace(
            &mut canvas,
            tile,
            placement.cell.x as i64,
            placement.cell.y as i64,
        );
    }

    tracing::debug!(
        layout = plan.layout.key,
        tiles = plan.tiles.len(),
        distinct = tiles.len(),
        "composited sheet"
    );
    Ok(canvas)
}

/// Crop, resample, flatten, outline and label one tile.
pub fn render_tile(
    image: &DynamicImage,
    tile: Size,
    border: u32,
    badge: Option<&Badge>,
    options: &SheetOptions,
) -> Result<RgbImage, SheetError> {
    let (w, h) = image.dimensions();
    let crop = crate::crop::fit_crop(Size::new(w, h), tile)?;
    let cropped = image.crop_imm(crop.x, crop.y, crop.width, crop.height);

    // Flatten before resampling so transparent edges don't bleed dark fringes.
    let flat = flatten(&cropped.to_rgba8(), options.background);
    let mut out = if flat.dimensions() == (tile.width, tile.height) {
        flat
    } else {
        imageops::resize(&flat, tile.width, tile.height, options.resample.filter_type())
    };

    draw_border(&mut out, border, Rgb(options.border_color));
    if let Some(badge) = badge {
        draw_badge(&mut out, badge, BADGE_FILL, BADGE_INK);
    }
    Ok(out)
}

/// Composite RGBA over an opaque background color.
pub fn flatten(rgba: &RgbaImage, background: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let mix = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([
            mix(r, background[0]),
            mix(g, background[1]),
            mix(b, background[2]),
        ])
    })
}

/// Solid outline `width` px thick, fully inside the image.
fn draw_border(img: &mut RgbImage, width: u32, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    for i in 0..width {
        if w <= 2 * i || h <= 2 * i {
            break;
        }
        let ring = PixelRect::at(i as i32, i as i32).of_size(w - 2 * i, h - 2 * i);
        draw_hollow_rect_mut(img, ring, color);
    }
}
