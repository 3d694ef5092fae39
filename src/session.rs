//! Single-user editing session: uploaded images, chosen layout, last sheet.
//!
//! Any change to the uploads or the layout discards the current sheet, so a
//! sheet returned by [`SheetSession::sheet`] always matches the current
//! inputs.

use crate::catalog::{LayoutSpec, resolve};
use crate::error::{Missing, SheetError};
use crate::generate::{EncodedSheet, SheetGenerator};
use crate::render::{SourceImage, check_types};

/// Slot summary for the current uploads and layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhotoStats {
    /// Tiles on the sheet.
    pub total_slots: usize,
    /// Slots every image gets at least.
    pub per_image: usize,
    /// Images that get one extra slot.
    pub remainder: usize,
    /// Sheet the layout prints on.
    pub sheet_id: &'static str,
}

/// Uploads, layout choice and the sheet generated from them.
#[derive(Debug, Default)]
pub struct SheetSession {
    generator: SheetGenerator,
    images: Vec<SourceImage>,
    layout: Option<&'static LayoutSpec>,
    sheet: Option<EncodedSheet>,
}

impl SheetSession {
    /// Empty session generating with `generator`.
    pub fn new(generator: SheetGenerator) -> Self {
        Self {
            generator,
            images: Vec::new(),
            layout: None,
            sheet: None,
        }
    }

    /// Replace the uploads.
    ///
    /// The batch is checked against the image cap and for image types. Any
    /// failure leaves the session empty. Success clears the layout choice.
    /// An empty batch is the same as [`clear`](Self::clear).
    pub fn set_images(&mut self, images: Vec<SourceImage>) -> Result<(), SheetError> {
        self.clear();
        if images.is_empty() {
            return Ok(());
        }
        let max = self.generator.options().max_images;
        if images.len() > max {
            return Err(SheetError::TooManyImages {
                count: images.len(),
                max,
            });
        }
        check_types(&images)?;
        tracing::debug!(count = images.len(), "images uploaded");
        self.images = images;
        Ok(())
    }

    /// Remove the upload at `index`.
    pub fn remove_image(&mut self, index: usize) -> Result<SourceImage, SheetError> {
        if index >= self.images.len() {
            return Err(SheetError::InvalidInput("image index out of range"));
        }
        let removed = self.images.remove(index);
        self.layout = None;
        self.sheet = None;
        Ok(removed)
    }

    /// Drop uploads, layout choice and sheet.
    pub fn clear(&mut self) {
        self.images.clear();
        self.layout = None;
        self.sheet = None;
    }

    /// Choose a cataloged layout. An unknown key leaves the session as it was.
    pub fn select_layout(&mut self, key: &str) -> Result<&'static LayoutSpec, SheetError> {
        let (layout, _) = resolve(key)?;
        self.layout = Some(layout);
        self.sheet = None;
        Ok(layout)
    }

    /// Current uploads, in upload order.
    pub fn images(&self) -> &[SourceImage] {
        &self.images
    }

    /// Chosen layout, if any.
    pub fn selected_layout(&self) -> Option<&'static LayoutSpec> {
        self.layout
    }

    /// The last generated sheet, if it still matches the inputs.
    pub fn sheet(&self) -> Option<&EncodedSheet> {
        self.sheet.as_ref()
    }

    /// Generate a sheet from the current uploads and layout.
    ///
    /// On error the previous sheet, if any, is kept.
    pub fn generate(&mut self) -> Result<&EncodedSheet, SheetError> {
        let key = self.layout.map(|l| l.key);
        if self.images.is_empty() {
            return Err(SheetError::MissingInput(Missing::Images));
        }
        let sheet = self.generator.generate(&self.images, key)?;
        Ok(self.sheet.insert(sheet))
    }

    /// Slot summary, once images are uploaded and a layout is chosen.
    ///
    /// `None` as well when the layout has fewer slots than there are images,
    /// since such a sheet cannot be generated.
    pub fn stats(&self) -> Option<PhotoStats> {
        let layout = self.layout?;
        let images = self.images.len();
        let total_slots = layout.tile_count as usize;
        if images == 0 || images > total_slots {
            return None;
        }
        Some(PhotoStats {
            total_slots,
            per_image: total_slots / images,
            remainder: total_slots % images,
            sheet_id: layout.sheet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SheetOptions;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png() -> SourceImage {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        SourceImage::new(out).with_mime_type("image/png")
    }

    #[test]
    fn stats_follow_distribution() {
        let mut s = SheetSession::default();
        assert_eq!(s.stats(), None);
        s.set_images(vec![png(), png(), png()]).unwrap();
        assert_eq!(s.stats(), None);
        s.select_layout("4x6-10").unwrap();
        assert_eq!(
            s.stats(),
            Some(PhotoStats {
                total_slots: 10,
                per_image: 3,
                remainder: 1,
                sheet_id: "4x6",
            })
        );
    }

    #[test]
    fn stats_need_a_slot_per_image() {
        let generator = SheetGenerator::new(SheetOptions::default().max_images(12));
        let mut s = SheetSession::new(generator);
        s.set_images(vec![png(); 9]).unwrap();
        s.select_layout("4x6-8").unwrap();
        assert_eq!(s.stats(), None);

        s.select_layout("4x6-10").unwrap();
        let stats = s.stats().unwrap();
        assert_eq!((stats.per_image, stats.remainder), (1, 1));
    }

    #[test]
    fn invalid_upload_clears_session() {
        let mut s = SheetSession::default();
        s.set_images(vec![png()]).unwrap();
        s.select_layout("4x6-8").unwrap();

        let bad = SourceImage::new(png().bytes().to_vec()).with_mime_type("text/plain");
        let err = s.set_images(vec![png(), bad]).unwrap_err();
        assert!(matches!(err, SheetError::InvalidImageType { index: 1 }));
        assert!(s.images().is_empty());
        assert_eq!(s.selected_layout(), None);
    }

    #[test]
    fn upload_cap() {
        let mut s = SheetSession::default();
        let err = s.set_images(vec![png(); 7]).unwrap_err();
        assert!(matches!(err, SheetError::TooManyImages { count: 7, max: 6 }));
        assert!(s.images().is_empty());
    }

    #[test]
    fn remove_image_resets_layout() {
        let mut s = SheetSession::default();
        s.set_images(vec![png(), png()]).unwrap();
        s.select_layout("A4-36").unwrap();
        s.remove_image(0).unwrap();
        assert_eq!(s.images().len(), 1);
        assert_eq!(s.selected_layout(), None);
        assert!(s.remove_image(5).is_err());
    }

    #[test]
    fn unknown_layout_keeps_selection() {
        let mut s = SheetSession::default();
        s.select_layout("4x6-8").unwrap();
        assert!(s.select_layout("nope").is_err());
        assert_eq!(s.selected_layout().map(|l| l.key), Some("4x6-8"));
    }

    #[test]
    fn generate_requires_inputs() {
        let mut s = SheetSession::default();
        assert!(matches!(
            s.generate(),
            Err(SheetError::MissingInput(Missing::Images))
        ));
        s.set_images(vec![png()]).unwrap();
        assert!(matches!(
            s.generate(),
            Err(SheetError::MissingInput(Missing::Layout))
        ));
        assert!(s.sheet().is_none());
    }
}
