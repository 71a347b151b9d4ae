//! tsugi-engine: decide the stacking order of vertically split images.
//!
//! Given a handful of images meant to be stacked into one tall
//! composite, the engine works out which image's bottom edge most
//! plausibly continues into which image's top edge, discounting
//! uniform letterbox padding at the borders:
//!
//! edge scan (blank/letterbox detection) -> row sampling ->
//! per-image [`EdgeSignature`] -> pairwise dissimilarity ->
//! ordering decision (anchored placement or exhaustive search).
//!
//! The crate is pure computation: no I/O, no retained state, no
//! suspension. Pixel data arrives through the [`RowSource`] seam,
//! diagnostics leave through an optional [`DiagnosticSink`], and
//! independent invocations are safe to run concurrently. Acquiring and
//! decoding images, filtering out failed decodes, and compositing the
//! final bitmap are the caller's business.

pub mod blank;
pub mod diagnostics;
pub mod metric;
pub mod sample;
pub mod sequence;
pub mod signature;
pub mod source;
pub mod types;

pub use diagnostics::{DecisionPath, DiagnosticSink, NoopSink, SequenceReport};
pub use source::RowSource;
pub use types::{
    Dimensions, EdgeClass, EdgeSignature, EngineConfig, EngineError, Order, Rgb,
};

/// Compute the stacking order for a set of images.
///
/// Returns a permutation of `0..images.len()`: the index order in
/// which the images read most continuously from top to bottom, with
/// floating images (blank on both edges) trailing.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] for an unusable
/// configuration and [`EngineError::TooManySearchImages`] when the
/// permutation search set exceeds the configured cap.
pub fn order<S: RowSource>(
    images: &[S],
    config: &EngineConfig,
) -> Result<Order, EngineError> {
    order_with_sink(images, config, &NoopSink)
}

/// [`order`] with an injected diagnostic sink.
///
/// The sink receives free-form progress text and must never influence
/// the computed order.
///
/// # Errors
///
/// Same as [`order`].
pub fn order_with_sink<S: RowSource>(
    images: &[S],
    config: &EngineConfig,
    sink: &dyn DiagnosticSink,
) -> Result<Order, EngineError> {
    order_report(images, config, sink).map(|report| report.order)
}

/// Run the full decision procedure and return the structured
/// [`SequenceReport`] alongside the order.
///
/// # Errors
///
/// Same as [`order`].
pub fn order_report<S: RowSource>(
    images: &[S],
    config: &EngineConfig,
    sink: &dyn DiagnosticSink,
) -> Result<SequenceReport, EngineError> {
    config.validate()?;
    let signatures = signature::extract_all(images, config, sink);
    sequence::sequence(&signatures, config, sink)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    /// A 50x120 image: optional black letterbox bands around a content
    /// area whose rows are horizontal gradients anchored at `hue`.
    fn split_image(pad_top: u32, pad_bottom: u32, hue: u8) -> RgbaImage {
        RgbaImage::from_fn(50, 120, |x, y| {
            if y < pad_top || y >= 120 - pad_bottom {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([hue, (x * 5) as u8, 255 - hue, 255])
            }
        })
    }

    #[test]
    fn zero_images_is_an_empty_order() {
        let images: Vec<RgbaImage> = vec![];
        let order = order(&images, &EngineConfig::default()).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn one_image_keeps_its_index() {
        let images = vec![split_image(0, 0, 128)];
        let order = order(&images, &EngineConfig::default()).unwrap();
        assert_eq!(order.indices(), &[0]);
    }

    #[test]
    fn invalid_config_is_rejected_before_any_pixel_work() {
        let images = vec![split_image(0, 0, 128)];
        let config = EngineConfig {
            sample_stride: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            order(&images, &config),
            Err(EngineError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn anchored_triple_comes_out_in_reading_order() {
        // Input deliberately shuffled: last piece, first piece, middle.
        let images = vec![
            split_image(0, 6, 80),
            split_image(6, 0, 80),
            split_image(0, 0, 80),
        ];
        let order = order(&images, &EngineConfig::default()).unwrap();
        assert_eq!(order.indices(), &[1, 2, 0]);
    }

    #[test]
    fn report_carries_the_decision_path() {
        let images = vec![split_image(6, 0, 10), split_image(0, 6, 10)];
        let report = order_report(&images, &EngineConfig::default(), &NoopSink).unwrap();
        assert_eq!(report.path, DecisionPath::Anchored);
        assert_eq!(report.order.indices(), &[0, 1]);
        assert_eq!(
            report.classes,
            vec![EdgeClass::First, EdgeClass::Last],
        );
    }
}
