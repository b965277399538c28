//! Progressive image degradation
//!
//! Same banded-coefficient approach as color decay, plus a pixelation
//! rendering hint once the image is past half gone and a fade to full
//! transparency at the end.

/// Style coefficients for image decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDecayStyle {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub blur_px: f32,
    pub opacity: f32,
    /// Renderer hint: draw with nearest-neighbor scaling
    pub pixelated: bool,
    pub scale: f32,
}

impl Default for ImageDecayStyle {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            blur_px: 0.0,
            opacity: 1.0,
            pixelated: false,
            scale: 1.0,
        }
    }
}

/// Compute image decay at a given progress.
///
/// - 0.0-0.1: untouched
/// - 0.1-0.3: slight warmth, mild desaturation
/// - 0.3-0.5: fading begins, first blur
/// - 0.5-0.7: heavy degradation, pixelation kicks in
/// - 0.7-0.9: almost gone, fully desaturated
/// - 0.9-1.0: fades to nothing
pub fn image_decay(progress: f32) -> ImageDecayStyle {
    let p = progress.clamp(0.0, 1.0);

    if p <= 0.1 {
        return ImageDecayStyle::default();
    }

    if p <= 0.3 {
        let t = (p - 0.1) / 0.2;
        return ImageDecayStyle {
            brightness: 1.0 + t * 0.1,
            contrast: 1.0 - t * 0.05,
            saturation: 1.0 - t * 0.15,
            ..ImageDecayStyle::default()
        };
    }

    if p <= 0.5 {
        let t = (p - 0.3) / 0.2;
        return ImageDecayStyle {
            brightness: 1.1 - t * 0.2,
            contrast: 0.95 - t * 0.15,
            saturation: 0.85 - t * 0.35,
            blur_px: t * 0.5,
            opacity: 1.0 - t * 0.1,
            ..ImageDecayStyle::default()
        };
    }

    if p <= 0.7 {
        let t = (p - 0.5) / 0.2;
        return ImageDecayStyle {
            brightness: 0.9 - t * 0.3,
            contrast: 0.8 - t * 0.2,
            saturation: 0.5 - t * 0.3,
            blur_px: 0.5 + t * 1.5,
            opacity: 0.9 - t * 0.2,
            pixelated: t > 0.5,
            scale: 1.0,
        };
    }

    if p <= 0.9 {
        let t = (p - 0.7) / 0.2;
        return ImageDecayStyle {
            brightness: 0.6 - t * 0.3,
            contrast: 0.6 - t * 0.2,
            saturation: 0.0,
            blur_px: 2.0 + t * 2.0,
            opacity: 0.7 - t * 0.4,
            pixelated: true,
            scale: 1.0 + t * 0.02,
        };
    }

    let t = (p - 0.9) / 0.1;
    ImageDecayStyle {
        brightness: 0.3,
        contrast: 0.4,
        saturation: 0.0,
        blur_px: 4.0 + t * 2.0,
        opacity: (0.3 - t * 0.3).max(0.0),
        pixelated: true,
        scale: 1.02,
    }
}
