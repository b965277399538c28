//! Progressive color degradation
//!
//! Piecewise-linear interpolation of independent style coefficients across
//! four progress bands. Band endpoints match, so there are no visual jumps at
//! band boundaries. How the coefficients are painted (CSS filters, shader
//! uniforms) is up to the renderer.

/// Style coefficients for color decay. Identity values mean "no decay".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDecayStyle {
    /// 1.0 = full color, 0.0 = grayscale
    pub saturation: f32,
    /// 0.0 = none, 1.0 = full sepia tint
    pub sepia: f32,
    /// Hue rotation in degrees
    pub hue_rotate_deg: f32,
    /// 1.0 = normal contrast
    pub contrast: f32,
    /// 1.0 = normal brightness
    pub brightness: f32,
}

impl Default for ColorDecayStyle {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            sepia: 0.0,
            hue_rotate_deg: 0.0,
            contrast: 1.0,
            brightness: 1.0,
        }
    }
}

impl ColorDecayStyle {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute color decay coefficients at a given progress.
///
/// - 0.00-0.15: untouched
/// - 0.15-0.40: gradual desaturation, slight sepia, small hue drift
/// - 0.40-0.70: heavy desaturation, stronger sepia/hue, contrast loss
/// - 0.70-1.00: nearly monochrome, heavy bleed, brightness loss
pub fn color_decay(progress: f32) -> ColorDecayStyle {
    let p = progress.clamp(0.0, 1.0);

    if p <= 0.15 {
        return ColorDecayStyle::default();
    }

    if p <= 0.4 {
        let t = (p - 0.15) / 0.25;
        return ColorDecayStyle {
            saturation: 1.0 - t * 0.4,
            sepia: t * 0.15,
            hue_rotate_deg: t * 5.0,
            ..ColorDecayStyle::default()
        };
    }

    if p <= 0.7 {
        let t = (p - 0.4) / 0.3;
        return ColorDecayStyle {
            saturation: 0.6 - t * 0.4,
            sepia: 0.15 + t * 0.2,
            hue_rotate_deg: 5.0 + t * 15.0,
            contrast: 1.0 - t * 0.15,
            brightness: 1.0,
        };
    }

    let t = (p - 0.7) / 0.3;
    ColorDecayStyle {
        saturation: 0.2 - t * 0.2,
        sepia: 0.35 + t * 0.15,
        hue_rotate_deg: 20.0 + t * 10.0,
        contrast: 0.85 - t * 0.25,
        brightness: 1.0 - t * 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_early() {
        assert!(color_decay(0.0).is_identity());
        assert!(color_decay(0.15).is_identity());
    }

    #[test]
    fn test_band_boundaries_continuous() {
        for boundary in [0.15f32, 0.4, 0.7] {
            let below = color_decay(boundary - 1e-4);
            let above = color_decay(boundary + 1e-4);
            assert!((below.saturation - above.saturation).abs() < 0.01, "saturation at {boundary}");
            assert!((below.sepia - above.sepia).abs() < 0.01, "sepia at {boundary}");
            assert!(
                (below.hue_rotate_deg - above.hue_rotate_deg).abs() < 0.1,
                "hue at {boundary}"
            );
            assert!((below.contrast - above.contrast).abs() < 0.01, "contrast at {boundary}");
            assert!((below.brightness - above.brightness).abs() < 0.01, "brightness at {boundary}");
        }
    }

    #[test]
    fn test_monotonic_coefficients() {
        let mut prev = color_decay(0.0);
        for i in 1..=100 {
            let style = color_decay(i as f32 / 100.0);
            assert!(style.saturation <= prev.saturation + 1e-6);
            assert!(style.sepia >= prev.sepia - 1e-6);
            assert!(style.hue_rotate_deg >= prev.hue_rotate_deg - 1e-6);
            assert!(style.contrast <= prev.contrast + 1e-6);
            assert!(style.brightness <= prev.brightness + 1e-6);
            prev = style;
        }
    }

    #[test]
    fn test_near_monochrome_at_end() {
        let style = color_decay(1.0);
        assert!(style.saturation.abs() < 1e-6);
        assert!(style.brightness < 0.75);
    }
}
