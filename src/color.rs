use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Trace colours
// ---------------------------------------------------------------------------

/// Hue step between consecutive seeds (golden angle).
const GOLDEN_ANGLE: f32 = 137.507_77;

/// Stable colour for a trace's style seed.
pub fn color_for_seed(seed: u64) -> Color32 {
    let hue = ((seed % 360) as f32 * GOLDEN_ANGLE) % 360.0;
    // Alternate lightness a little so every 360th seed is still distinct.
    let lightness = if (seed / 360) % 2 == 0 { 0.5 } else { 0.35 };
    let hsl = Hsl::new(hue, 0.75, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_deterministic() {
        assert_eq!(color_for_seed(7), color_for_seed(7));
    }

    #[test]
    fn neighbouring_seeds_differ() {
        for seed in 0..50 {
            assert_ne!(color_for_seed(seed), color_for_seed(seed + 1));
        }
    }
}
