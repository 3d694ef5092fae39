//! End-to-end sheet generation: validate uploads, plan, decode, composite,
//! encode.
//!
//! Validation runs in a fixed order and stops at the first problem, so
//! cheap checks (missing input, upload cap, layout key, file type) never
//! wait on decoding.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::catalog::{LayoutSpec, SheetSpec, resolve};
use crate::error::{Missing, SheetError};
use crate::geometry::Size;
use crate::options::SheetOptions;
use crate::plan::SheetPlan;
use crate::render::{BackgroundFill, SourceImage, check_types, compose_sheet, decode_all};

/// A finished, PNG-encoded sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSheet {
    png: Vec<u8>,
    /// Pixel size of the sheet.
    pub size: Size,
    /// Layout the sheet was built from.
    pub layout: LayoutSpec,
    /// Page the sheet prints on.
    pub sheet: SheetSpec,
    /// Slots given to each source image.
    pub counts: Vec<usize>,
}

impl EncodedSheet {
    /// Suggested download name, e.g. `passport-photos-4x6-8.png`.
    pub fn file_name(&self) -> String {
        format!("passport-photos-{}.png", self.layout.key)
    }

    /// CSS `@page size` for printing this sheet.
    pub fn page_size(&self) -> &'static str {
        self.sheet.page_size
    }

    /// Always `image/png`.
    pub fn mime_type(&self) -> &'static str {
        "image/png"
    }

    /// Encoded PNG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Take the encoded PNG bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }
}

/// Generate a sheet from `images` with the default options.
///
/// Shorthand for [`SheetGenerator::default().generate(..)`](SheetGenerator::generate).
pub fn generate_sheet(
    images: &[SourceImage],
    layout_key: Option<&str>,
) -> Result<EncodedSheet, SheetError> {
    SheetGenerator::default().generate(images, layout_key)
}

/// Sheet generator with fixed options.
#[derive(Clone, Debug, Default)]
pub struct SheetGenerator {
    options: SheetOptions,
    background: Option<BackgroundFill>,
}

impl SheetGenerator {
    /// Generator with `options` and no background fill.
    pub fn new(options: SheetOptions) -> Self {
        Self {
            options,
            background: None,
        }
    }

    /// Run every decoded source through `fill` before compositing.
    pub fn with_background(mut self, fill: BackgroundFill) -> Self {
        self.background = Some(fill);
        self
    }

    /// Options every sheet is generated with.
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Generate a sheet for a cataloged layout.
    pub fn generate(
        &self,
        images: &[SourceImage],
        layout_key: Option<&str>,
    ) -> Result<EncodedSheet, SheetError> {
        if images.is_empty() {
            return Err(SheetError::MissingInput(Missing::Images));
        }
        let key = layout_key
            .filter(|k| !k.is_empty())
            .ok_or(SheetError::MissingInput(Missing::Layout))?;
        self.check_cap(images.len())?;
        let (layout, sheet) = resolve(key)?;
        self.generate_layout(images, layout, sheet)
    }

    /// Generate a sheet for any layout, cataloged or not.
    pub fn generate_layout(
        &self,
        images: &[SourceImage],
        layout: &LayoutSpec,
        sheet: &SheetSpec,
    ) -> Result<EncodedSheet, SheetError> {
        if images.is_empty() {
            return Err(SheetError::MissingInput(Missing::Images));
        }
        self.check_cap(images.len())?;
        check_types(images)?;
        let plan = SheetPlan::new(layout, sheet, images.len(), &self.options)?;

        let mut decoded = decode_all(images)?;
        if let Some(fill) = &self.background {
            decoded = decoded
                .iter()
                .map(|img| fill.apply(img))
                .collect::<Result<_, _>>()?;
        }
        self.render(&plan, &decoded)
    }

    /// Composite and encode already-decoded sources.
    ///
    /// The background fill is not applied here.
    pub fn render(
        &self,
        plan: &SheetPlan,
        images: &[DynamicImage],
    ) -> Result<EncodedSheet, SheetError> {
        let canvas = compose_sheet(plan, images, &self.options)?;
        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(SheetError::Encode)?;

        tracing::info!(
            layout = plan.layout.key,
            images = images.len(),
            width = canvas.width(),
            height = canvas.height(),
            bytes = png.len(),
            "generated sheet"
        );

        Ok(EncodedSheet {
            png,
            size: plan.canvas(),
            layout: plan.layout,
            sheet: plan.sheet,
            counts: plan.assignment().counts().to_vec(),
        })
    }

    fn check_cap(&self, count: usize) -> Result<(), SheetError> {
        let max = self.options.max_images;
        if count > max {
            return Err(SheetError::TooManyImages { count, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Resample;
    use image::{Rgb, RgbImage};

    fn png(w: u32, h: u32) -> SourceImage {
        let img = RgbImage::from_pixel(w, h, Rgb([90, 120, 150]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        SourceImage::new(out).with_mime_type("image/png")
    }

    #[test]
    fn missing_images_checked_first() {
        let err = generate_sheet(&[], None).unwrap_err();
        assert!(matches!(err, SheetError::MissingInput(Missing::Images)));
    }

    #[test]
    fn missing_layout() {
        for key in [None, Some("")] {
            let err = generate_sheet(&[png(4, 4)], key).unwrap_err();
            assert!(matches!(err, SheetError::MissingInput(Missing::Layout)));
        }
    }

    #[test]
    fn cap_checked_before_layout_key() {
        let images = vec![SourceImage::new(b"junk".to_vec()); 7];
        let err = generate_sheet(&images, Some("no-such-layout")).unwrap_err();
        assert!(matches!(err, SheetError::TooManyImages { count: 7, max: 6 }));
    }

    #[test]
    fn unknown_layout_key() {
        let err = generate_sheet(&[png(4, 4)], Some("letter-12")).unwrap_err();
        assert!(matches!(err, SheetError::UnknownLayout(ref k) if k == "letter-12"));
    }

    #[test]
    fn slot_overflow_before_decode() {
        let layout = LayoutSpec {
            key: "tiny-2",
            sheet: "4x6",
            tile_count: 2,
            rows: 1,
            cols: 2,
        };
        let sheet = SheetSpec::find("4x6").unwrap();
        // Valid PNG signatures with garbage after them: decoding would fail.
        let mut broken = png(4, 4).bytes().to_vec();
        broken.truncate(12);
        let images = vec![SourceImage::new(broken); 3];
        let err = SheetGenerator::default()
            .generate_layout(&images, &layout, sheet)
            .unwrap_err();
        assert!(matches!(err, SheetError::TooManyImagesForSlots { images: 3, slots: 2 }));
    }

    #[test]
    fn encoded_sheet_metadata() {
        let sheet = SheetSpec {
            id: "mini",
            width_px: 120,
            height_px: 80,
            dpi: 60,
            label: "mini",
            page_size: "auto",
        };
        let layout = LayoutSpec {
            key: "mini-2",
            sheet: "mini",
            tile_count: 2,
            rows: 1,
            cols: 2,
        };
        let generator = SheetGenerator::new(SheetOptions::default().resample(Resample::Nearest));
        let out = generator
            .generate_layout(&[png(30, 40)], &layout, &sheet)
            .unwrap();
        assert_eq!(out.file_name(), "passport-photos-mini-2.png");
        assert_eq!(out.page_size(), "auto");
        assert_eq!(out.mime_type(), "image/png");
        assert_eq!(out.counts, [2]);
        assert_eq!(out.size, Size::new(120, 80));
        assert!(out.as_bytes().starts_with(b"\x89PNG"));

        let decoded = image::load_from_memory(out.as_bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }
}
