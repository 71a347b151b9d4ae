//! Blank-row and letterbox detection.
//!
//! A row is "blank" when every pixel sits within a color tolerance of
//! the row's first pixel: uniform padding bars survive JPEG compression
//! only approximately, so exact equality would miss real letterboxing.
//!
//! Scanning for padding is bounded to a window near each edge
//! (default: 10% of the height, capped at 50 rows). Without the bound,
//! images that genuinely start with a flat area of content would be
//! misclassified as letterboxed.

use crate::source::RowSource;
use crate::types::{EngineConfig, Rgb};

/// Whether every pixel of an RGBA row is within `tolerance` (Euclidean
/// RGB distance) of the row's first pixel.
///
/// The boundary is inclusive: a pixel at exactly `tolerance` still
/// counts as blank. An empty row is vacuously blank.
#[must_use]
pub fn is_row_blank(row: &[u8], tolerance: f64) -> bool {
    let mut pixels = row.chunks_exact(4);
    let Some(first) = pixels.next() else {
        return true;
    };
    let reference = Rgb::new(first[0], first[1], first[2]);
    let limit = tolerance * tolerance;
    pixels.all(|p| Rgb::new(p[0], p[1], p[2]).distance_squared(reference) <= limit)
}

/// Number of rows scanned for letterbox padding at each edge:
/// `min(floor(height * ratio), cap)`, clamped so the fallback content
/// row stays inside the image for any configuration.
#[must_use]
pub fn scan_window(height: u32, config: &EngineConfig) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let from_ratio = (f64::from(height) * config.scan_window_ratio).floor() as u32;
    from_ratio
        .min(config.scan_window_cap)
        .min(height.saturating_sub(1))
}

/// Row index where content begins, scanning down from the top edge.
///
/// Returns the first non-blank row within the scan window. When the
/// window holds only blank rows, the whole window is treated as
/// padding and content is assumed to start immediately after it.
/// Precondition: `source.height() > 0`.
#[must_use]
pub fn find_content_top<S: RowSource>(source: &S, config: &EngineConfig) -> u32 {
    let window = scan_window(source.height(), config);
    (0..window)
        .find(|&y| !is_row_blank(&source.row_rgba(y), config.blank_tolerance))
        .unwrap_or(window)
}

/// Row index where content ends, scanning up from the bottom edge.
///
/// Mirror of [`find_content_top`]: the first non-blank row counting
/// upward from `height - 1`, or `height - 1 - window` when the whole
/// window is padding. Precondition: `source.height() > 0`.
#[must_use]
pub fn find_content_bottom<S: RowSource>(source: &S, config: &EngineConfig) -> u32 {
    let height = source.height();
    let window = scan_window(height, config);
    (0..window)
        .map(|i| height - 1 - i)
        .find(|&y| !is_row_blank(&source.row_rgba(y), config.blank_tolerance))
        .unwrap_or(height - 1 - window)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn row_of(pixels: &[[u8; 4]]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    // --- is_row_blank ---

    #[test]
    fn identical_pixels_are_blank() {
        let row = row_of(&[[40, 40, 40, 255]; 6]);
        assert!(is_row_blank(&row, 35.0));
    }

    #[test]
    fn empty_row_is_blank() {
        assert!(is_row_blank(&[], 35.0));
    }

    #[test]
    fn distance_exactly_at_tolerance_is_blank() {
        // (0,0,0) to (35,0,0): distance exactly 35.
        let row = row_of(&[[0, 0, 0, 255], [35, 0, 0, 255]]);
        assert!(is_row_blank(&row, 35.0));
    }

    #[test]
    fn distance_just_over_tolerance_is_not_blank() {
        let row = row_of(&[[0, 0, 0, 255], [35, 0, 0, 255]]);
        assert!(!is_row_blank(&row, 34.9999));
    }

    #[test]
    fn outlier_anywhere_in_row_breaks_blankness() {
        let mut pixels = [[20, 20, 20, 255]; 8];
        pixels[5] = [250, 250, 250, 255];
        assert!(!is_row_blank(&row_of(&pixels), 35.0));
    }

    #[test]
    fn zero_tolerance_requires_exact_match() {
        let row = row_of(&[[10, 10, 10, 255], [10, 10, 11, 255]]);
        assert!(!is_row_blank(&row, 0.0));
        let row = row_of(&[[10, 10, 10, 255]; 3]);
        assert!(is_row_blank(&row, 0.0));
    }

    // --- scan_window ---

    #[test]
    fn window_is_ten_percent_of_height() {
        let config = EngineConfig::default();
        assert_eq!(scan_window(200, &config), 20);
    }

    #[test]
    fn window_is_capped() {
        let config = EngineConfig::default();
        assert_eq!(scan_window(5000, &config), 50);
    }

    #[test]
    fn window_rounds_down() {
        let config = EngineConfig::default();
        assert_eq!(scan_window(99, &config), 9);
    }

    #[test]
    fn tiny_image_has_zero_window() {
        let config = EngineConfig::default();
        assert_eq!(scan_window(5, &config), 0);
        assert_eq!(scan_window(0, &config), 0);
    }

    #[test]
    fn window_never_reaches_full_height() {
        let config = EngineConfig {
            scan_window_ratio: 1.0,
            scan_window_cap: 1000,
            ..EngineConfig::default()
        };
        assert_eq!(scan_window(10, &config), 9);
    }

    // --- edge scans ---

    /// An image with `pad_top`/`pad_bottom` black padding rows around a
    /// band of non-uniform content (a horizontal gradient).
    fn letterboxed(height: u32, pad_top: u32, pad_bottom: u32) -> RgbaImage {
        RgbaImage::from_fn(40, height, |x, y| {
            if y < pad_top || y >= height - pad_bottom {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([(x * 6) as u8, 255, 255, 255])
            }
        })
    }

    #[test]
    fn content_top_skips_padding() {
        let img = letterboxed(100, 4, 0);
        let config = EngineConfig::default();
        assert_eq!(find_content_top(&img, &config), 4);
        assert_eq!(find_content_bottom(&img, &config), 99);
    }

    #[test]
    fn content_bottom_skips_padding() {
        let img = letterboxed(100, 0, 7);
        let config = EngineConfig::default();
        assert_eq!(find_content_top(&img, &config), 0);
        assert_eq!(find_content_bottom(&img, &config), 92);
    }

    #[test]
    fn unpadded_image_uses_outermost_rows() {
        let img = letterboxed(100, 0, 0);
        let config = EngineConfig::default();
        assert_eq!(find_content_top(&img, &config), 0);
        assert_eq!(find_content_bottom(&img, &config), 99);
    }

    #[test]
    fn fully_blank_image_falls_back_to_window_boundary() {
        let img = RgbaImage::from_pixel(40, 100, Rgba([0, 0, 0, 255]));
        let config = EngineConfig::default();
        // Window is 10 rows; exhausting it places content just past it.
        assert_eq!(find_content_top(&img, &config), 10);
        assert_eq!(find_content_bottom(&img, &config), 89);
    }

    #[test]
    fn padding_beyond_window_is_not_fully_skipped() {
        // 30 padding rows but only a 10-row window: the scan stops at
        // the window boundary instead of reaching the content.
        let img = letterboxed(100, 30, 0);
        let config = EngineConfig::default();
        assert_eq!(find_content_top(&img, &config), 10);
    }

    #[test]
    fn near_uniform_padding_within_tolerance_still_counts() {
        // Compression noise: alternating dark grays well within 35.
        let img = RgbaImage::from_fn(40, 100, |x, y| {
            if y < 3 {
                let v = if x % 2 == 0 { 10 } else { 14 };
                Rgba([v, v, v, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let config = EngineConfig::default();
        assert_eq!(find_content_top(&img, &config), 3);
    }
}
