//! Per-pixel hazard color classification.
//!
//! Fire and smoke are recognised purely from color. Every cue for a category
//! must hold at once; a single cue (warm hue, gray tone) is never enough,
//! which keeps skin, wood, warm lighting and plain walls out.

use crate::hazard::HazardCategory;

/// HSL triple derived from one RGB pixel.
///
/// `hue` is in degrees `[0, 360)`, `saturation` and `lightness` in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslSample {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

// Fire cues
const FIRE_HUE_MAX: f32 = 45.0;
const FIRE_HUE_WRAP_MIN: f32 = 350.0;
const FIRE_MIN_SATURATION: f32 = 55.0;
const FIRE_MIN_LIGHTNESS: f32 = 40.0;
const FIRE_MAX_LIGHTNESS: f32 = 95.0;
/// Green-to-red ratio ceiling; above it the pixel reads as yellow.
const FIRE_MAX_GREEN_RED_RATIO: f32 = 0.85;
const FIRE_MIN_RED: u8 = 120;

// Smoke cues
const SMOKE_MAX_SATURATION: f32 = 12.0;
const SMOKE_PURE_GRAY_SATURATION: f32 = 5.0;
const SMOKE_MIN_LIGHTNESS: f32 = 45.0;
const SMOKE_MAX_LIGHTNESS: f32 = 70.0;
const SMOKE_TINT_HUE_MIN: f32 = 180.0;
const SMOKE_TINT_HUE_MAX: f32 = 260.0;

/// Standard RGB to HSL conversion.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> HslSample {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    if max == min {
        return HslSample {
            hue: 0.0,
            saturation: 0.0,
            lightness: lightness * 100.0,
        };
    }

    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let mut hue = sector * 60.0;
    if hue >= 360.0 {
        hue -= 360.0;
    }

    HslSample {
        hue,
        saturation: saturation * 100.0,
        lightness: lightness * 100.0,
    }
}

/// Flame-colored pixel test.
pub fn is_fire_pixel(r: u8, g: u8, b: u8) -> bool {
    if r <= FIRE_MIN_RED || r <= g || r <= b {
        return false;
    }
    if g as f32 / r as f32 >= FIRE_MAX_GREEN_RED_RATIO {
        return false;
    }

    let hsl = rgb_to_hsl(r, g, b);
    let warm_hue = hsl.hue <= FIRE_HUE_MAX || hsl.hue >= FIRE_HUE_WRAP_MIN;

    warm_hue
        && hsl.saturation >= FIRE_MIN_SATURATION
        && (FIRE_MIN_LIGHTNESS..=FIRE_MAX_LIGHTNESS).contains(&hsl.lightness)
}

/// Smoke-colored pixel test: mid-tone gray, optionally with a cool blue tint.
pub fn is_smoke_pixel(hsl: HslSample) -> bool {
    if hsl.saturation > SMOKE_MAX_SATURATION {
        return false;
    }
    if !(SMOKE_MIN_LIGHTNESS..=SMOKE_MAX_LIGHTNESS).contains(&hsl.lightness) {
        return false;
    }

    hsl.saturation < SMOKE_PURE_GRAY_SATURATION
        || (SMOKE_TINT_HUE_MIN..=SMOKE_TINT_HUE_MAX).contains(&hsl.hue)
}

/// Category of a single pixel, fire taking precedence.
pub fn classify(r: u8, g: u8, b: u8) -> Option<HazardCategory> {
    if is_fire_pixel(r, g, b) {
        Some(HazardCategory::Fire)
    } else if is_smoke_pixel(rgb_to_hsl(r, g, b)) {
        Some(HazardCategory::Smoke)
    } else {
        None
    }
}
