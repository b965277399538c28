//! Decay acceleration curves
//!
//! Maps the linear elapsed-time fraction to an eased progress fraction. All
//! curves are monotonic on [0, 1] with f(0)=0 and f(1)=1, and are recomputed
//! every frame, so they must be pure.

use serde::{Deserialize, Serialize};

/// How decay progress accelerates over a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecayCurve {
    #[default]
    Linear,
    /// Smoothstep: slow start, slow end
    EaseIn,
    EaseInQuad,
    EaseInCubic,
}

impl DecayCurve {
    /// Apply the curve to a raw linear fraction. Input is clamped to [0, 1].
    pub fn apply(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            DecayCurve::Linear => p,
            DecayCurve::EaseIn => p * p * (3.0 - 2.0 * p),
            DecayCurve::EaseInQuad => p * p,
            DecayCurve::EaseInCubic => p * p * p,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecayCurve::Linear => "linear",
            DecayCurve::EaseIn => "ease-in",
            DecayCurve::EaseInQuad => "ease-in-quad",
            DecayCurve::EaseInCubic => "ease-in-cubic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DecayCurve; 4] = [
        DecayCurve::Linear,
        DecayCurve::EaseIn,
        DecayCurve::EaseInQuad,
        DecayCurve::EaseInCubic,
    ];

    #[test]
    fn test_endpoints() {
        for curve in ALL {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?} f(0)");
            assert_eq!(curve.apply(1.0), 1.0, "{curve:?} f(1)");
        }
    }

    #[test]
    fn test_monotonic() {
        for curve in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = curve.apply(i as f32 / 100.0);
                assert!(v >= prev, "{curve:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_cubic_midpoint() {
        // At rawProgress 0.5, ease-in-cubic gives 0.125, not 0.5
        assert!((DecayCurve::EaseInCubic.apply(0.5) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_clamped() {
        for curve in ALL {
            assert_eq!(curve.apply(-0.5), 0.0);
            assert_eq!(curve.apply(1.5), 1.0);
        }
    }
}
