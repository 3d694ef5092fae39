//! Raster stage: decoding sources and painting a [`SheetPlan`](crate::SheetPlan).
//!
//! Everything here consumes geometry computed up front by
//! [`SheetPlan`](crate::SheetPlan); no layout decisions are made while
//! touching pixels.
//!
//! - [`decode`]: upload validation and EXIF-aware decoding
//! - [`compose`]: tile rendering and sheet compositing
//! - [`background`]: the [`BackgroundFill`] capability

pub mod background;
pub mod compose;
pub mod decode;
mod glyphs;

pub use background::{BackgroundFill, BackgroundOptions, FillOutcome};
pub use compose::compose_sheet;
pub use decode::{SourceImage, check_types, decode_all};

use image::imageops::FilterType;

use crate::options::Resample;

impl Resample {
    pub(crate) fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
