//! Pairwise dissimilarity between sampled edge rows.
//!
//! Samples are compared position by position, not by nearest-color
//! matching: when two images were cut from the same original, the
//! i-th sample of one edge lines up with the i-th sample of the other.
//! Differently sized inputs therefore compare partially unrelated
//! samples; the caller-side aspect-ratio pre-check exists to keep such
//! pairs out of the engine.

use crate::types::Rgb;

/// Mean squared per-component difference over the aligned prefix of
/// two sample sequences. Lower is more similar; `0.0` is identical.
///
/// Only the first `min(len(a), len(b))` samples are compared. When
/// either sequence is empty the result is `0.0` (a guarded zero-length
/// no-op rather than a division by zero), so a degenerate image
/// neither attracts nor repels any neighbor.
#[must_use]
pub fn difference(a: &[Rgb], b: &[Rgb]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(p, q)| {
            let dr = f64::from(p.r) - f64::from(q.r);
            let dg = f64::from(p.g) - f64::from(q.g);
            let db = f64::from(p.b) - f64::from(q.b);
            db.mul_add(db, dr.mul_add(dr, dg * dg))
        })
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    sum / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(values: &[u8]) -> Vec<Rgb> {
        values.iter().map(|&v| Rgb::new(v, v, v)).collect()
    }

    #[test]
    fn identical_sequences_score_zero() {
        let a = gray(&[1, 50, 200, 7]);
        assert!(difference(&a, &a).abs() < f64::EPSILON);
    }

    #[test]
    fn metric_is_symmetric() {
        let a = gray(&[0, 10, 20]);
        let b = gray(&[5, 90, 250]);
        assert!((difference(&a, &b) - difference(&b, &a)).abs() < f64::EPSILON);
    }

    #[test]
    fn single_component_difference() {
        let a = vec![Rgb::new(10, 0, 0)];
        let b = vec![Rgb::new(13, 0, 0)];
        // One sample, squared diff 9, divided by n = 1.
        assert!((difference(&a, &b) - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_over_sample_count() {
        let a = gray(&[0, 0]);
        let b = gray(&[1, 3]);
        // Sample 0: 3 * 1 = 3; sample 1: 3 * 9 = 27; mean = 15.
        assert!((difference(&a, &b) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn longer_sequence_is_truncated_to_shorter() {
        let a = gray(&[10, 20]);
        let b = gray(&[10, 20, 200, 250]);
        assert!(difference(&a, &b).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_against_anything_is_zero() {
        let a: Vec<Rgb> = vec![];
        let b = gray(&[255, 255]);
        assert!(difference(&a, &b).abs() < f64::EPSILON);
        assert!(difference(&b, &a).abs() < f64::EPSILON);
        assert!(difference(&a, &a).abs() < f64::EPSILON);
    }

    #[test]
    fn closer_colors_score_lower() {
        let base = gray(&[100, 100, 100]);
        let near = gray(&[105, 95, 102]);
        let far = gray(&[200, 10, 240]);
        assert!(difference(&base, &near) < difference(&base, &far));
    }
}
