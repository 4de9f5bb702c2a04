//! Raw metric value → [0, 1] normalization.
//!
//! Modeled so that out-of-range inputs saturate instead of erroring and a
//! missing value stays missing (the scorer redistributes its weight).

use ipfolio_common::metrics::{ScalingMode, Step};

/// Normalize a raw metric value into [0, 1].
///
/// Returns `None` when the value is absent or non-finite — the metric is
/// then excluded from the weighted sum for that patent, it is never
/// treated as zero.
pub fn normalize(raw: Option<f64>, mode: &ScalingMode, invert: bool) -> Option<f64> {
    let value = match raw {
        Some(v) if v.is_finite() => v,
        _ => return None,
    };

    let scaled = match mode {
        ScalingMode::Linear { max } => {
            if *max <= 0.0 {
                0.0
            } else {
                value / max
            }
        }
        ScalingMode::Log { max } => {
            if value <= 0.0 || *max <= 0.0 {
                0.0
            } else {
                (value + 1.0).ln() / (max + 1.0).ln()
            }
        }
        ScalingMode::Sqrt { max } => {
            if *max <= 0.0 {
                0.0
            } else {
                value.max(0.0).sqrt() / max.sqrt()
            }
        }
        ScalingMode::Score5 => (value - 1.0) / 4.0,
        ScalingMode::Stepped { steps } => stepped(value, steps),
    };

    let clamped = scaled.clamp(0.0, 1.0);
    Some(if invert { 1.0 - clamped } else { clamped })
}

/// Value of the highest step at or below `value`; 0 below every threshold.
fn stepped(value: f64, steps: &[Step]) -> f64 {
    let mut ordered: Vec<&Step> = steps.iter().collect();
    ordered.sort_by(|a, b| {
        b.threshold
            .partial_cmp(&a.threshold)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for step in ordered {
        if value >= step.threshold {
            return step.value;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_saturates_above_max() {
        assert_eq!(normalize(Some(5.0), &ScalingMode::Linear { max: 10.0 }, false), Some(0.5));
        assert_eq!(normalize(Some(25.0), &ScalingMode::Linear { max: 10.0 }, false), Some(1.0));
        assert_eq!(normalize(Some(-3.0), &ScalingMode::Linear { max: 10.0 }, false), Some(0.0));
    }

    #[test]
    fn test_log_is_monotonic() {
        let mode = ScalingMode::Log { max: 100.0 };
        let mut prev = -1.0;
        for count in [0.0, 1.0, 2.0, 5.0, 17.0, 50.0, 99.0, 100.0, 400.0] {
            let n = normalize(Some(count), &mode, false).unwrap();
            assert!(n >= prev, "log scaling must never decrease: {count} -> {n}");
            assert!((0.0..=1.0).contains(&n));
            prev = n;
        }
    }

    #[test]
    fn test_sqrt_compression() {
        let mode = ScalingMode::Sqrt { max: 50.0 };
        // sqrt(25)/sqrt(50) ≈ 0.707
        let n = normalize(Some(25.0), &mode, false).unwrap();
        assert!((n - (25.0f64.sqrt() / 50.0f64.sqrt())).abs() < 1e-12);
        assert_eq!(normalize(Some(500.0), &mode, false), Some(1.0));
    }

    #[test]
    fn test_score5_maps_rating_band() {
        assert_eq!(normalize(Some(1.0), &ScalingMode::Score5, false), Some(0.0));
        assert_eq!(normalize(Some(3.0), &ScalingMode::Score5, false), Some(0.5));
        assert_eq!(normalize(Some(5.0), &ScalingMode::Score5, false), Some(1.0));
        // Out-of-band ratings saturate
        assert_eq!(normalize(Some(7.0), &ScalingMode::Score5, false), Some(1.0));
    }

    #[test]
    fn test_stepped_takes_highest_matching_threshold() {
        let mode = ScalingMode::Stepped {
            steps: vec![
                Step { threshold: 10.0, value: 1.0 },
                Step { threshold: 7.0, value: 0.85 },
                Step { threshold: 5.0, value: 0.6 },
                Step { threshold: 0.0, value: 0.1 },
            ],
        };
        assert_eq!(normalize(Some(12.0), &mode, false), Some(1.0));
        assert_eq!(normalize(Some(8.5), &mode, false), Some(0.85));
        assert_eq!(normalize(Some(5.0), &mode, false), Some(0.6));
        assert_eq!(normalize(Some(2.0), &mode, false), Some(0.1));
        assert_eq!(normalize(Some(-1.0), &mode, false), Some(0.0));
    }

    #[test]
    fn test_invert_flips_after_scaling() {
        let n = normalize(Some(2.0), &ScalingMode::Linear { max: 10.0 }, true).unwrap();
        assert!((n - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_missing_and_non_finite_are_absent() {
        assert_eq!(normalize(None, &ScalingMode::Score5, false), None);
        assert_eq!(normalize(Some(f64::NAN), &ScalingMode::Score5, false), None);
        assert_eq!(normalize(Some(f64::INFINITY), &ScalingMode::Linear { max: 1.0 }, false), None);
    }
}
