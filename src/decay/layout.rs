//! Progressive layout disruption
//!
//! Per-element pseudo-random jitter (skew, translate, rotate) growing through
//! progress bands. Jitter is seeded by the element index, so re-rendering at
//! the same progress is stable, while advancing progress produces fresh
//! flicker.

use glam::Vec2;

use crate::seeded_unit;

/// Transform/style parameters for layout decay. Identity means "no decay".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDecayStyle {
    pub skew_deg: f32,
    /// Translation offset in CSS pixels
    pub translate: Vec2,
    pub rotate_deg: f32,
    pub scale: f32,
    pub opacity: f32,
    pub blur_px: f32,
}

impl Default for LayoutDecayStyle {
    fn default() -> Self {
        Self {
            skew_deg: 0.0,
            translate: Vec2::ZERO,
            rotate_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            blur_px: 0.0,
        }
    }
}

/// Compute layout decay for one element at a given progress.
///
/// - 0.0-0.3: untouched
/// - 0.3-0.5: subtle skew and translate
/// - 0.5-0.7: stronger skew, opacity flicker, blur begins
/// - 0.7-0.9: major drift, rotation
/// - 0.9-1.0: collapse - drop, scale down, fade out
pub fn layout_decay(progress: f32, element_index: usize) -> LayoutDecayStyle {
    let p = progress.clamp(0.0, 1.0);

    if p <= 0.3 {
        return LayoutDecayStyle::default();
    }

    // Per-element signed unit jitter, stable across re-renders
    let seed = (element_index * 37) as u64;
    let jitter_x = (seeded_unit(seed) - 0.5) * 2.0;
    let jitter_y = (seeded_unit(seed + 1) - 0.5) * 2.0;
    let jitter_skew = (seeded_unit(seed + 2) - 0.5) * 2.0;

    if p <= 0.5 {
        let t = (p - 0.3) / 0.2;
        return LayoutDecayStyle {
            skew_deg: jitter_skew * t * 0.5,
            translate: Vec2::new(jitter_x * t * 2.0, jitter_y * t),
            ..LayoutDecayStyle::default()
        };
    }

    if p <= 0.7 {
        let t = (p - 0.5) / 0.2;
        let flicker = if seeded_unit(seed + (p * 30.0) as u64) > 0.8 {
            0.7
        } else {
            1.0
        };
        return LayoutDecayStyle {
            skew_deg: jitter_skew * (0.5 + t * 1.5),
            translate: Vec2::new(jitter_x * (2.0 + t * 6.0), jitter_y * (1.0 + t * 4.0)),
            opacity: (1.0 - t * 0.2) * flicker,
            blur_px: if t > 0.5 { (t - 0.5) * 1.0 } else { 0.0 },
            ..LayoutDecayStyle::default()
        };
    }

    if p <= 0.9 {
        let t = (p - 0.7) / 0.2;
        let flicker = if seeded_unit(seed + (p * 20.0) as u64) > 0.6 {
            0.5
        } else {
            1.0
        };
        return LayoutDecayStyle {
            skew_deg: jitter_skew * (2.0 + t * 3.0),
            translate: Vec2::new(jitter_x * (8.0 + t * 20.0), jitter_y * (5.0 + t * 15.0)),
            rotate_deg: jitter_skew * t * 2.0,
            scale: 1.0,
            opacity: (0.8 - t * 0.4) * flicker,
            blur_px: 0.5 + t * 1.5,
        };
    }

    // Collapse
    let t = (p - 0.9) / 0.1;
    LayoutDecayStyle {
        skew_deg: jitter_skew * 5.0,
        translate: Vec2::new(jitter_x * 30.0, jitter_y * 20.0 + t * 40.0),
        rotate_deg: jitter_skew * 4.0,
        scale: 1.0 - t * 0.3,
        opacity: (0.4 - t * 0.4).max(0.0),
        blur_px: 2.0 + t * 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_early() {
        assert_eq!(layout_decay(0.0, 0), LayoutDecayStyle::default());
        assert_eq!(layout_decay(0.3, 5), LayoutDecayStyle::default());
    }

    #[test]
    fn test_stable_at_same_progress() {
        for idx in 0..8 {
            for progress in [0.4, 0.6, 0.8, 0.95] {
                assert_eq!(layout_decay(progress, idx), layout_decay(progress, idx));
            }
        }
    }

    #[test]
    fn test_elements_jitter_independently() {
        let a = layout_decay(0.8, 0);
        let b = layout_decay(0.8, 1);
        assert_ne!(a.translate, b.translate);
    }

    #[test]
    fn test_disruption_grows() {
        let idx = 3;
        let subtle = layout_decay(0.45, idx);
        let major = layout_decay(0.85, idx);
        assert!(major.translate.length() > subtle.translate.length());
        assert!(major.skew_deg.abs() > subtle.skew_deg.abs());
        assert!(major.opacity < subtle.opacity);
    }

    #[test]
    fn test_collapse_at_end() {
        let style = layout_decay(1.0, 2);
        assert!(style.opacity <= 1e-6);
        assert!((style.scale - 0.7).abs() < 1e-5);
        assert!(style.blur_px >= 2.0);
    }
}
