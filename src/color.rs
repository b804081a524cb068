use std::collections::HashMap;

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
// Category → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per property type so every chart uses the same series colour.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: HashMap<String, Color32>,
    default_color: Color32,
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            mapping: HashMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl CategoryColors {
    /// Assign colours in the order the types were first seen.
    pub fn new(types: &[String]) -> Self {
        let mapping = types
            .iter()
            .cloned()
            .zip(generate_palette(types.len()))
            .collect();

        CategoryColors {
            mapping,
            ..Self::default()
        }
    }

    pub fn color_for(&self, property_type: &str) -> Color32 {
        self.mapping
            .get(property_type)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn unknown_types_fall_back_to_grey() {
        let colors = CategoryColors::new(&["Villa".to_string(), "Plots".to_string()]);
        assert_ne!(colors.color_for("Villa"), colors.color_for("Plots"));
        assert_eq!(colors.color_for("Townhouse"), Color32::GRAY);
    }
}
