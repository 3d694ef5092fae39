//! Upload validation and decoding.
//!
//! Type checks only sniff headers, so a batch can be rejected before any
//! pixel data is decoded. Decoding applies the EXIF orientation, so tiles
//! come out upright regardless of how the camera stored them.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};

use crate::error::SheetError;

/// One uploaded file: raw bytes plus the MIME type the upload layer declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime_type: Option<String>,
}

impl SourceImage {
    /// Wrap raw file bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: None,
        }
    }

    /// Attach the declared MIME type.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Raw file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type, if the upload layer gave one.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Check that this upload is an image and detect its container format.
    ///
    /// A declared MIME type outside `image/*` is rejected outright, and the
    /// bytes must carry the signature of a format this build can decode.
    pub fn format(&self, index: usize) -> Result<ImageFormat, SheetError> {
        if let Some(mime) = self.mime_type() {
            let is_image = mime
                .get(..6)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"));
            if !is_image {
                return Err(SheetError::InvalidImageType { index });
            }
        }
        image::guess_format(&self.bytes)
            .ok()
            .filter(|format| format.reading_enabled())
            .ok_or(SheetError::InvalidImageType { index })
    }

    /// Decode to pixels with the EXIF orientation applied.
    pub fn decode(&self, index: usize) -> Result<DynamicImage, SheetError> {
        let format = self.format(index)?;
        decode_as(&self.bytes, format).map_err(|source| SheetError::ImageLoad { index, source })
    }
}

impl From<Vec<u8>> for SourceImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for SourceImage {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

fn decode_as(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, ImageError> {
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format).into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Check every upload's type without decoding. Reports the first offender.
pub fn check_types(images: &[SourceImage]) -> Result<(), SheetError> {
    images
        .iter()
        .enumerate()
        .try_for_each(|(index, image)| image.format(index).map(|_| ()))
}

/// Decode every upload, in order.
///
/// With the `parallel` feature sources decode concurrently; the first
/// failure by index is reported either way.
pub fn decode_all(images: &[SourceImage]) -> Result<Vec<DynamicImage>, SheetError> {
    #[cfg(feature = "parallel")]
    let decoded: Vec<Result<DynamicImage, SheetError>> = {
        use rayon::prelude::*;
        images
            .par_iter()
            .enumerate()
            .map(|(index, image)| image.decode(index))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let decoded: Vec<Result<DynamicImage, SheetError>> = images
        .iter()
        .enumerate()
        .map(|(index, image)| image.decode(index))
        .collect();

    let decoded = decoded.into_iter().collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = decoded.len(), "decoded sources");
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([200, 100, 50]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        out
    }

    #[test]
    fn png_round_trips_through_decode() {
        let src = SourceImage::new(png(7, 5)).with_mime_type("image/png");
        assert_eq!(src.format(0).unwrap(), ImageFormat::Png);
        let img = src.decode(0).unwrap();
        assert_eq!((img.width(), img.height()), (7, 5));
    }

    #[test]
    fn mime_type_outside_image_is_rejected() {
        let src = SourceImage::new(png(2, 2)).with_mime_type("application/pdf");
        assert!(matches!(src.format(3), Err(SheetError::InvalidImageType { index: 3 })));
    }

    #[test]
    fn mime_prefix_is_case_insensitive() {
        let src = SourceImage::new(png(2, 2)).with_mime_type("IMAGE/PNG");
        assert!(src.format(0).is_ok());
    }

    #[test]
    fn unknown_bytes_are_not_an_image() {
        let src = SourceImage::new(b"just some text".to_vec());
        assert!(matches!(src.format(0), Err(SheetError::InvalidImageType { index: 0 })));
    }

    #[test]
    fn recognized_but_undecodable_format_is_rejected() {
        // Little-endian TIFF signature; no TIFF decoder is compiled in.
        let src = SourceImage::new(b"II*\0\x08\0\0\0\0\0".to_vec()).with_mime_type("image/tiff");
        assert!(matches!(src.format(2), Err(SheetError::InvalidImageType { index: 2 })));
        assert!(matches!(check_types(&[src]), Err(SheetError::InvalidImageType { index: 0 })));
    }

    /// JPEG with an APP1 EXIF segment holding only `Orientation = 6`.
    fn jpeg_rotated_90(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([90, 120, 150]));
        let mut jpeg = Vec::new();
        img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg).unwrap();

        let tiff: &[u8] = &[
            b'M', b'M', 0, 42, 0, 0, 0, 8, // big-endian header, IFD0 at 8
            0, 1, // one entry
            0x01, 0x12, 0, 3, 0, 0, 0, 1, 0, 6, 0, 0, // Orientation, SHORT, 1, value 6
            0, 0, 0, 0, // no next IFD
        ];
        let mut app1 = vec![0xFF, 0xE1];
        let len = (2 + 6 + tiff.len()) as u16;
        app1.extend_from_slice(&len.to_be_bytes());
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(tiff);

        // Right after SOI.
        jpeg.splice(2..2, app1);
        jpeg
    }

    #[test]
    fn exif_orientation_is_applied() {
        let src = SourceImage::new(jpeg_rotated_90(4, 2)).with_mime_type("image/jpeg");
        assert_eq!(src.format(0).unwrap(), ImageFormat::Jpeg);
        let img = src.decode(0).unwrap();
        assert_eq!((img.width(), img.height()), (2, 4));
    }

    #[test]
    fn truncated_png_fails_to_load() {
        let mut bytes = png(16, 16);
        bytes.truncate(40);
        let src = SourceImage::new(bytes);
        assert!(src.format(0).is_ok());
        assert!(matches!(src.decode(1), Err(SheetError::ImageLoad { index: 1, .. })));
    }

    #[test]
    fn check_types_reports_first_offender() {
        let batch = [
            SourceImage::new(png(2, 2)),
            SourceImage::new(b"nope".to_vec()),
            SourceImage::new(b"also nope".to_vec()),
        ];
        assert!(matches!(check_types(&batch), Err(SheetError::InvalidImageType { index: 1 })));
    }

    #[test]
    fn decode_all_keeps_order() {
        let batch = [SourceImage::new(png(3, 1)), SourceImage::new(png(1, 3))];
        let decoded = decode_all(&batch).unwrap();
        assert_eq!(decoded[0].width(), 3);
        assert_eq!(decoded[1].width(), 1);
    }
}
