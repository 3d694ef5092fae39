//! Background fill: flatten a source's transparency onto a solid color and
//! optionally soften it.
//!
//! The capability is a value. Holding a [`BackgroundFill`] means it was
//! initialized with valid options; there is no global ready flag to check.

use image::DynamicImage;

use super::compose::flatten;
use super::decode::SourceImage;
use crate::error::SheetError;
use crate::options::parse_hex_rgb;

/// Background fill settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackgroundOptions {
    /// Color placed behind transparent pixels. `None` keeps transparency.
    pub color: Option<[u8; 3]>,
    /// Gaussian blur sigma in pixels applied after filling. Zero disables it.
    pub edge_blur: f32,
}

impl BackgroundOptions {
    /// Read a backdrop color as written in a CSS-ish config value.
    ///
    /// `"transparent"` keeps transparency; otherwise `#rrggbb` is expected.
    pub fn parse_color(value: &str) -> Result<Option<[u8; 3]>, SheetError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Ok(None);
        }
        parse_hex_rgb(value)
            .map(Some)
            .ok_or(SheetError::InvalidInput("background color must be #rrggbb or transparent"))
    }
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            color: Some([255, 255, 255]),
            edge_blur: 0.0,
        }
    }
}

/// Result of one image in a [`BackgroundFill::apply_all`] batch.
#[derive(Debug)]
pub struct FillOutcome {
    /// Position of the image in the batch.
    pub index: usize,
    /// The filled image, or why it could not be filled.
    pub result: Result<DynamicImage, SheetError>,
}

impl FillOutcome {
    /// Whether this image was filled.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// An initialized background fill.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundFill {
    options: BackgroundOptions,
}

impl BackgroundFill {
    /// Validate `options` and build the capability.
    pub fn initialize(options: BackgroundOptions) -> Result<Self, SheetError> {
        if !options.edge_blur.is_finite() || options.edge_blur < 0.0 {
            return Err(SheetError::InvalidInput("edge blur must be a finite, non-negative radius"));
        }
        tracing::debug!(color = ?options.color, blur = options.edge_blur, "background fill ready");
        Ok(Self { options })
    }

    /// Options the fill was initialized with.
    pub fn options(&self) -> &BackgroundOptions {
        &self.options
    }

    /// Fill and soften one decoded image.
    pub fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, SheetError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SheetError::InvalidInput("image has no pixels"));
        }
        let filled = match self.options.color {
            Some(rgb) if image.color().has_alpha() => {
                DynamicImage::ImageRgb8(flatten(&image.to_rgba8(), rgb))
            }
            _ => image.clone(),
        };
        Ok(if self.options.edge_blur > 0.0 {
            filled.blur(self.options.edge_blur)
        } else {
            filled
        })
    }

    /// Decode and fill every upload, reporting each image separately.
    ///
    /// A failure on one image does not stop the batch. `progress` is called
    /// with `(done, total)` after each image.
    pub fn apply_all<F>(&self, images: &[SourceImage], mut progress: F) -> Vec<FillOutcome>
    where
        F: FnMut(usize, usize),
    {
        let total = images.len();
        images
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let result = source.decode(index).and_then(|img| self.apply(&img));
                if let Err(err) = &result {
                    tracing::warn!(index, %err, "background fill failed");
                }
                progress(index + 1, total);
                FillOutcome { index, result }
            })
            .collect()
    }
}
