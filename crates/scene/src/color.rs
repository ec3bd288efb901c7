//! Hue-based color helpers for ball entities.
//!
//! Scene files store a single hue per entity; the live shape carries a full
//! RGB color. These two conversions bridge the gap.

use glam::Vec3;

/// Convert HSV to normalized RGB. Hue is in degrees, saturation and value
/// in 0.0-1.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Vec3::new(r + m, g + m, b + m)
}

/// Recover the hue (degrees) from a normalized RGB color. Gray (zero
/// chroma) maps to hue 0.
pub fn rgb_to_hue(rgb: Vec3) -> f32 {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let delta = max - min;
    if delta == 0.0 {
        return 0.0;
    }

    if max == rgb.x {
        60.0 * ((rgb.y - rgb.z) / delta).rem_euclid(6.0)
    } else if max == rgb.y {
        60.0 * ((rgb.z - rgb.x) / delta + 2.0)
    } else {
        60.0 * ((rgb.x - rgb.y) / delta + 4.0)
    }
}
