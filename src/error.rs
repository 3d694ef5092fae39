//! Error type shared by every stage of sheet generation.

use alloc::string::String;

/// Which required input was absent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Missing {
    /// No source images were supplied.
    Images,
    /// No layout was selected.
    Layout,
}

impl core::fmt::Display for Missing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Images => f.write_str("no images uploaded"),
            Self::Layout => f.write_str("no layout selected"),
        }
    }
}

/// Sheet generation error.
///
/// Every variant is local to one generation attempt. Nothing is written
/// back to the caller when one is returned, so retrying with corrected
/// input is always safe.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SheetError {
    /// A required input was not supplied.
    #[error("missing input: {0}")]
    MissingInput(Missing),

    /// The layout key does not name a cataloged layout.
    #[error("unknown layout {0:?}")]
    UnknownLayout(String),

    /// The layout's grid cannot hold its tile count, or has a zero dimension.
    #[error("invalid layout {key:?}: {rows}x{cols} grid for {tiles} tiles")]
    InvalidLayout {
        key: &'static str,
        rows: u32,
        cols: u32,
        tiles: u32,
    },

    /// The layout belongs to a different sheet than the one supplied.
    #[error("layout {layout:?} prints on sheet {expected:?}, not {found:?}")]
    SheetMismatch {
        layout: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// An argument was outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A supplied file is not image data.
    #[error("file {} is not a valid image file", .index + 1)]
    InvalidImageType { index: usize },

    /// More images than the configured cap.
    #[error("too many images: {count} supplied, at most {max} allowed")]
    TooManyImages { count: usize, max: usize },

    /// More images than the layout has slots, so some would get none.
    #[error("{images} images cannot share {slots} slots")]
    TooManyImagesForSlots { images: usize, slots: usize },

    /// Gaps alone consume the sheet, or the tiles round down to nothing.
    #[error("layout does not fit a {width}x{height} sheet with a {gap}px gap")]
    LayoutDoesNotFit { width: u32, height: u32, gap: u32 },

    /// A source image could not be decoded.
    #[cfg(feature = "render")]
    #[error("failed to load image {}", .index + 1)]
    ImageLoad {
        index: usize,
        #[source]
        source: image::ImageError,
    },

    /// The finished sheet could not be encoded.
    #[cfg(feature = "render")]
    #[error("failed to encode sheet")]
    Encode(#[source] image::ImageError),
}
