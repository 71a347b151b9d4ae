//! Pixel row access: the seam between the engine and image storage.
//!
//! The engine never owns pixel data. Callers hand it anything that can
//! report its dimensions and produce one horizontal row of RGBA bytes
//! at a time; decoding, caching, and lifetime management stay on the
//! caller's side. An implementation for [`image::RgbaImage`] is
//! provided since that is what the CLI and the tests decode into.

use image::RgbaImage;

use crate::types::Dimensions;

/// Read-only access to an image as horizontal rows of RGBA bytes.
///
/// The engine reads at most the letterbox scan window at each edge
/// plus the two content rows, so implementations do not need to be
/// fast for random access across the whole image.
pub trait RowSource {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// One horizontal row of RGBA bytes, `4 * width` values.
    ///
    /// Callers only request `y < height`; an implementation may return
    /// an empty vector for anything else.
    fn row_rgba(&self, y: u32) -> Vec<u8>;

    /// Dimensions of the source.
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }
}

impl RowSource for RgbaImage {
    fn width(&self) -> u32 {
        Self::width(self)
    }

    fn height(&self) -> u32 {
        Self::height(self)
    }

    fn row_rgba(&self, y: u32) -> Vec<u8> {
        if y >= Self::height(self) {
            return Vec::new();
        }
        let row_bytes = Self::width(self) as usize * 4;
        let start = y as usize * row_bytes;
        self.as_raw()[start..start + row_bytes].to_vec()
    }
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn row_rgba(&self, y: u32) -> Vec<u8> {
        (**self).row_rgba(y)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rgba_image_reports_dimensions() {
        let img = RgbaImage::new(7, 3);
        assert_eq!(RowSource::width(&img), 7);
        assert_eq!(RowSource::height(&img), 3);
        assert_eq!(
            RowSource::dimensions(&img),
            Dimensions {
                width: 7,
                height: 3
            },
        );
    }

    #[test]
    fn rgba_image_row_has_expected_bytes() {
        let img = RgbaImage::from_fn(3, 2, |x, y| {
            image::Rgba([x as u8, y as u8, 9, 255])
        });
        let row = img.row_rgba(1);
        assert_eq!(row.len(), 12);
        // Pixel (0, 1) then (1, 1) then (2, 1).
        assert_eq!(&row[0..4], &[0, 1, 9, 255]);
        assert_eq!(&row[4..8], &[1, 1, 9, 255]);
        assert_eq!(&row[8..12], &[2, 1, 9, 255]);
    }

    #[test]
    fn out_of_range_row_is_empty() {
        let img = RgbaImage::new(4, 2);
        assert!(img.row_rgba(2).is_empty());
    }

    #[test]
    fn reference_forwards_to_inner_source() {
        let img = RgbaImage::new(5, 4);
        let by_ref: &RgbaImage = &img;
        assert_eq!(RowSource::width(&by_ref), 5);
        assert_eq!(by_ref.row_rgba(0).len(), 20);
    }
}
