// SYNOID Chroma — VAD to HSL Mapping
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use super::{HslColor, NormalizedVad};

/// Valence spans red (0) through green (120) to blue (240).
pub const HUE_SPAN: f64 = 240.0;
pub const SATURATION_FLOOR: f64 = 40.0;
pub const SATURATION_SPAN: f64 = 60.0;
pub const LIGHTNESS_FLOOR: f64 = 30.0;
pub const LIGHTNESS_SPAN: f64 = 40.0;

/// Valence drives hue, arousal saturation, dominance lightness.
/// Fractions are truncated toward zero.
pub fn to_hsl(vad: &NormalizedVad) -> HslColor {
    HslColor {
        h: (vad.valence() * HUE_SPAN) as u16,
        s: (SATURATION_FLOOR + vad.arousal() * SATURATION_SPAN) as u8,
        l: (LIGHTNESS_FLOOR + vad.dominance() * LIGHTNESS_SPAN) as u8,
    }
}
