//! Sheet generation options.
//!
//! Pixel lengths are given at [`REFERENCE_DPI`] and scaled to each sheet's
//! resolution, so one set of options works for every catalog sheet.
//!
//! # Example
//!
//! ```
//! use photosheet::{LabelMode, SheetOptions};
//!
//! let options = SheetOptions::default()
//!     .gap(20)
//!     .labels(LabelMode::Always)
//!     .max_images(4);
//! assert_eq!(options.gap_px, 20);
//! ```

use crate::error::SheetError;
use crate::geometry::{Size, mm_to_px};

/// Resolution at which the pixel options are expressed.
pub const REFERENCE_DPI: u32 = 600;

/// Gap kept between tiles and at the sheet edges, in pixels at 600 DPI.
pub const DEFAULT_GAP_PX: u32 = 15;

/// Cut-guide stroke width, in pixels at 600 DPI.
pub const DEFAULT_BORDER_PX: u32 = 2;

/// Upload cap: most source images accepted in one batch.
pub const DEFAULT_MAX_IMAGES: usize = 6;

/// When to stamp the source index on each tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LabelMode {
    /// Label only when more than one source image shares the sheet.
    #[default]
    Auto,
    /// Always label.
    Always,
    /// Never label.
    Never,
}

impl LabelMode {
    /// Whether a sheet built from `image_count` sources gets labels.
    pub const fn applies(self, image_count: usize) -> bool {
        match self {
            Self::Auto => image_count > 1,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Resampling filter used when scaling a crop to the tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Resample {
    /// Nearest neighbor. Fast, blocky.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic.
    CatmullRom,
    /// Lanczos with window 3.
    #[default]
    Lanczos3,
}

/// Physical tile size.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSizeMm {
    pub width: f64,
    pub height: f64,
}

impl TileSizeMm {
    /// 35 × 45 mm, the common passport/visa format.
    pub const PASSPORT: Self = Self {
        width: 35.0,
        height: 45.0,
    };

    /// 2 × 2 in (51 × 51 mm).
    pub const SQUARE_2IN: Self = Self {
        width: 50.8,
        height: 50.8,
    };

    /// Nominal tile size in pixels at `dpi`.
    pub fn to_px(self, dpi: u32) -> Size {
        Size::new(mm_to_px(self.width, dpi), mm_to_px(self.height, dpi))
    }
}

impl Default for TileSizeMm {
    fn default() -> Self {
        Self::PASSPORT
    }
}

/// Everything configurable about a generated sheet.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetOptions {
    /// Gap between tiles and at the sheet edges, px at 600 DPI.
    pub gap_px: u32,
    /// Cut-guide stroke width inside each tile, px at 600 DPI. Zero disables it.
    pub border_px: u32,
    /// Cut-guide color. `"#rrggbb"` in serialized configs.
    #[cfg_attr(feature = "serde", serde(with = "hex_rgb"))]
    pub border_color: [u8; 3],
    /// Sheet background and transparency backdrop. `"#rrggbb"` in serialized configs.
    #[cfg_attr(feature = "serde", serde(with = "hex_rgb"))]
    pub background: [u8; 3],
    /// Source index labels.
    pub labels: LabelMode,
    /// Most source images accepted.
    pub max_images: usize,
    /// Physical tile size.
    pub tile_size: TileSizeMm,
    /// Resampling filter.
    pub resample: Resample,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            gap_px: DEFAULT_GAP_PX,
            border_px: DEFAULT_BORDER_PX,
            border_color: [0, 0, 0],
            background: [255, 255, 255],
            labels: LabelMode::Auto,
            max_images: DEFAULT_MAX_IMAGES,
            tile_size: TileSizeMm::PASSPORT,
            resample: Resample::Lanczos3,
        }
    }
}

impl SheetOptions {
    /// Set the gap (px at 600 DPI).
    pub fn gap(mut self, px: u32) -> Self {
        self.gap_px = px;
        self
    }

    /// Set the cut-guide width (px at 600 DPI).
    pub fn border(mut self, px: u32) -> Self {
        self.border_px = px;
        self
    }

    /// Set the cut-guide color.
    pub fn border_color(mut self, rgb: [u8; 3]) -> Self {
        self.border_color = rgb;
        self
    }

    /// Set the sheet background color.
    pub fn background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    /// Set the label mode.
    pub fn labels(mut self, mode: LabelMode) -> Self {
        self.labels = mode;
        self
    }

    /// Set the upload cap.
    pub fn max_images(mut self, max: usize) -> Self {
        self.max_images = max;
        self
    }

    /// Set the physical tile size.
    pub fn tile_size(mut self, size: TileSizeMm) -> Self {
        self.tile_size = size;
        self
    }

    /// Set the resampling filter.
    pub fn resample(mut self, filter: Resample) -> Self {
        self.resample = filter;
        self
    }

    /// Reject values no sheet can be built from.
    pub fn validate(&self) -> Result<(), SheetError> {
        let TileSizeMm { width, height } = self.tile_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SheetError::InvalidInput("tile size must be positive"));
        }
        if self.max_images == 0 {
            return Err(SheetError::InvalidInput("image cap must be at least one"));
        }
        Ok(())
    }
}

/// Parse `#rrggbb` (the `#` is optional) into RGB.
pub fn parse_hex_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Serde adapter storing an RGB triple as `"#rrggbb"`.
#[cfg(feature = "serde")]
pub(crate) mod hex_rgb {
    use core::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(rgb: &[u8; 3], serializer: S) -> Result<S::Ok, S::Error> {
        let [r, g, b] = *rgb;
        serializer.collect_str(&format_args!("#{r:02x}{g:02x}{b:02x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 3], D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = [u8; 3];

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a #rrggbb color")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<[u8; 3], E> {
                super::parse_hex_rgb(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_print_reference() {
        let o = SheetOptions::default();
        assert_eq!(o.gap_px, 15);
        assert_eq!(o.border_px, 2);
        assert_eq!(o.max_images, 6);
        assert_eq!(o.background, [255, 255, 255]);
        assert_eq!(o.tile_size.to_px(600), Size::new(827, 1063));
    }

    #[test]
    fn label_mode_auto_only_for_multiple_sources() {
        assert!(!LabelMode::Auto.applies(1));
        assert!(LabelMode::Auto.applies(2));
        assert!(LabelMode::Always.applies(1));
        assert!(!LabelMode::Never.applies(6));
    }

    #[test]
    fn square_tile_at_300_dpi() {
        assert_eq!(TileSizeMm::SQUARE_2IN.to_px(300), Size::new(600, 600));
    }

    #[test]
    fn rejects_degenerate_options() {
        assert!(SheetOptions::default().validate().is_ok());
        let zero_cap = SheetOptions::default().max_images(0);
        assert!(matches!(zero_cap.validate(), Err(SheetError::InvalidInput(_))));
        let nan_tile = SheetOptions::default().tile_size(TileSizeMm {
            width: f64::NAN,
            height: 45.0,
        });
        assert!(nan_tile.validate().is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_rgb("#ffffff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_rgb("1a2B3c"), Some([0x1a, 0x2b, 0x3c]));
        assert_eq!(parse_hex_rgb("#fff"), None);
        assert_eq!(parse_hex_rgb("#gg0000"), None);
        assert_eq!(parse_hex_rgb("transparent"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_config_fills_defaults() {
        let o: SheetOptions =
            serde_json::from_str(r#"{ "gap_px": 30, "labels": "never", "resample": "nearest" }"#)
                .unwrap();
        assert_eq!(o.gap_px, 30);
        assert_eq!(o.labels, LabelMode::Never);
        assert_eq!(o.resample, Resample::Nearest);
        assert_eq!(o.border_px, DEFAULT_BORDER_PX);
        assert_eq!(o.tile_size, TileSizeMm::PASSPORT);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn colors_are_hex_strings_in_json() {
        let o: SheetOptions =
            serde_json::from_str(r##"{ "background": "#102030", "border_color": "FF0000" }"##)
                .unwrap();
        assert_eq!(o.background, [0x10, 0x20, 0x30]);
        assert_eq!(o.border_color, [255, 0, 0]);

        let json = serde_json::to_value(o).unwrap();
        assert_eq!(json["background"], "#102030");
        assert_eq!(json["border_color"], "#ff0000");

        let bad = serde_json::from_str::<SheetOptions>(r#"{ "background": "white" }"#);
        assert!(bad.is_err());
    }
}
