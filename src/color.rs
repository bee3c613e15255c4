use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Feature colours: input column name → Color32
// ---------------------------------------------------------------------------

/// One distinct colour per input feature, stable for a given column list.
#[derive(Debug, Clone, Default)]
pub struct FeatureColors {
    mapping: BTreeMap<String, Color32>,
}

impl FeatureColors {
    pub fn new(features: &[String]) -> Self {
        let mapping = features
            .iter()
            .cloned()
            .zip(generate_palette(features.len()))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, feature: &str) -> Color32 {
        self.mapping
            .get(feature)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_unknown_feature_falls_back() {
        let colors = FeatureColors::new(&["a".to_string(), "b".to_string()]);
        assert_ne!(colors.color_for("a"), colors.color_for("b"));
        assert_eq!(colors.color_for("zzz"), Color32::LIGHT_BLUE);
    }
}
