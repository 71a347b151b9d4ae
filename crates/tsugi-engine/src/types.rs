//! Shared types for the tsugi sequencing engine.

use serde::{Deserialize, Serialize};

/// A single RGB color sample. Alpha is discarded during sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Create a new color sample.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance to another color in RGB space.
    ///
    /// Avoids the square root for threshold comparisons.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        db.mul_add(db, dr.mul_add(dr, dg * dg))
    }

    /// Euclidean distance to another color in RGB space.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Width-over-height aspect ratio, or `0.0` for degenerate geometry.
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }

    /// Whether two aspect ratios agree within a relative `tolerance`
    /// (e.g. `0.1` for 10%).
    ///
    /// This is the pre-check a caller uses to decide whether a set of
    /// images plausibly belongs to one split composite before invoking
    /// the engine at all. The ordering decision itself never reads it.
    #[must_use]
    pub fn aspect_within(self, other: Self, tolerance: f64) -> bool {
        let a = self.aspect_ratio();
        let b = other.aspect_ratio();
        if a == 0.0 || b == 0.0 {
            return a == b;
        }
        (a - b).abs() / b <= tolerance
    }
}

/// Classification of an image derived from its blank-edge flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeClass {
    /// Blank top only: a candidate for the first (topmost) position.
    First,
    /// Blank bottom only: a candidate for the last position.
    Last,
    /// Blank on both edges: no reliable adjacency signal.
    Floating,
    /// No blank edge: an interior image.
    Middle,
}

/// Per-image edge fingerprint: sampled content rows plus letterbox flags.
///
/// Produced once per input image by [`signature::extract`] and never
/// mutated afterwards. Indexing matches input order.
///
/// [`signature::extract`]: crate::signature::extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSignature {
    /// Subsampled colors from the first content row.
    pub top_pixels: Vec<Rgb>,
    /// Subsampled colors from the last content row.
    pub bottom_pixels: Vec<Rgb>,
    /// Row index where content was judged to begin (`< height`).
    pub top_row: u32,
    /// Row index where content was judged to end (`< height`).
    pub bottom_row: u32,
    /// Whether letterbox padding was found above the content.
    pub blank_top: bool,
    /// Whether letterbox padding was found below the content.
    pub blank_bottom: bool,
}

impl EdgeSignature {
    /// Derive the classification from the blank-edge flags.
    #[must_use]
    pub const fn classify(&self) -> EdgeClass {
        match (self.blank_top, self.blank_bottom) {
            (true, true) => EdgeClass::Floating,
            (true, false) => EdgeClass::First,
            (false, true) => EdgeClass::Last,
            (false, false) => EdgeClass::Middle,
        }
    }
}

/// An ordering of input image indices.
///
/// Always a permutation of `0..n` for the input length `n`; floating
/// indices occupy the trailing positions in their original relative
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order(Vec<usize>);

impl Order {
    /// Create an order from a vector of indices.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Returns `true` if the order contains no indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of indices in the order.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Consumes the order and returns the underlying index vector.
    #[must_use]
    pub fn into_indices(self) -> Vec<usize> {
        self.0
    }

    /// Map the order back onto the caller's items.
    ///
    /// Returns references to `items` arranged in this order. Indices
    /// outside `items` are skipped, so the result is only a full
    /// permutation when `items.len()` matches the sequenced input.
    #[must_use]
    pub fn permute<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.0.iter().filter_map(|&i| items.get(i)).collect()
    }
}

/// Tunable constants of the sequencing engine.
///
/// The defaults are tuned for compressed, letterboxed photographs;
/// synthetic fixtures can override every one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum Euclidean RGB distance from a row's first pixel for the
    /// row to still count as uniform ("blank"). Inclusive boundary.
    pub blank_tolerance: f64,

    /// Fraction of the image height scanned for letterbox padding at
    /// each edge, before applying [`scan_window_cap`](Self::scan_window_cap).
    pub scan_window_ratio: f64,

    /// Upper bound in rows on the letterbox scan window. The bounded
    /// window keeps content-filled images from being misread as padded.
    pub scan_window_cap: u32,

    /// Sampling stride in pixels: every `sample_stride`-th pixel of a
    /// content row enters the fingerprint.
    pub sample_stride: usize,

    /// Relative aspect-ratio tolerance for the caller-side pre-check
    /// ([`Dimensions::aspect_within`]). Not consumed by the ordering
    /// decision itself.
    pub aspect_tolerance: f64,

    /// Largest index set the exhaustive permutation search accepts.
    /// The search is factorial in the set size, so anything beyond a
    /// handful of images is refused rather than attempted.
    pub max_search_images: usize,
}

impl EngineConfig {
    /// Default blank-color tolerance (Euclidean RGB distance).
    pub const DEFAULT_BLANK_TOLERANCE: f64 = 35.0;
    /// Default letterbox scan window as a fraction of image height.
    pub const DEFAULT_SCAN_WINDOW_RATIO: f64 = 0.1;
    /// Default cap on the letterbox scan window, in rows.
    pub const DEFAULT_SCAN_WINDOW_CAP: u32 = 50;
    /// Default pixel sampling stride.
    pub const DEFAULT_SAMPLE_STRIDE: usize = 10;
    /// Default relative aspect-ratio tolerance (10%).
    pub const DEFAULT_ASPECT_TOLERANCE: f64 = 0.1;
    /// Default cap on the exhaustive search set size.
    pub const DEFAULT_MAX_SEARCH_IMAGES: usize = 8;

    /// Check the configuration for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when the blank tolerance
    /// is negative or non-finite, the window ratio falls outside
    /// `[0, 1]`, the sample stride is zero, or the search cap is zero.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.blank_tolerance.is_finite() || self.blank_tolerance < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "blank_tolerance must be finite and non-negative, got {}",
                self.blank_tolerance,
            )));
        }
        if !self.scan_window_ratio.is_finite()
            || !(0.0..=1.0).contains(&self.scan_window_ratio)
        {
            return Err(EngineError::InvalidConfig(format!(
                "scan_window_ratio must be within [0, 1], got {}",
                self.scan_window_ratio,
            )));
        }
        if self.sample_stride == 0 {
            return Err(EngineError::InvalidConfig(
                "sample_stride must be at least 1".to_string(),
            ));
        }
        if self.max_search_images == 0 {
            return Err(EngineError::InvalidConfig(
                "max_search_images must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blank_tolerance: Self::DEFAULT_BLANK_TOLERANCE,
            scan_window_ratio: Self::DEFAULT_SCAN_WINDOW_RATIO,
            scan_window_cap: Self::DEFAULT_SCAN_WINDOW_CAP,
            sample_stride: Self::DEFAULT_SAMPLE_STRIDE,
            aspect_tolerance: Self::DEFAULT_ASPECT_TOLERANCE,
            max_search_images: Self::DEFAULT_MAX_SEARCH_IMAGES,
        }
    }
}

/// Errors produced by the sequencing engine.
///
/// The engine performs no fallible I/O; everything here is a
/// precondition failure the caller can act on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum EngineError {
    /// The engine configuration is invalid.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The exhaustive search set exceeds the configured cap.
    #[error("exhaustive ordering over {count} images exceeds the limit of {limit}")]
    TooManySearchImages {
        /// Number of images the search would have to permute.
        count: usize,
        /// Configured cap ([`EngineConfig::max_search_images`]).
        limit: usize,
    },
}
