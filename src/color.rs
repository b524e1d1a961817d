use std::collections::{BTreeMap, BTreeSet};

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
// Color mapping: city → Color32
// ---------------------------------------------------------------------------

/// Maps city names to distinct colours for the market-insight charts.
#[derive(Debug, Clone)]
pub struct CityColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CityColors {
    /// Build a colour map from the sorted set of city names.
    pub fn new(cities: &BTreeSet<String>) -> Self {
        let palette = generate_palette(cities.len());
        let mapping: BTreeMap<String, Color32> = cities
            .iter()
            .zip(palette.into_iter())
            .map(|(city, c)| (city.clone(), c))
            .collect();

        CityColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a city.
    pub fn color_for(&self, city: &str) -> Color32 {
        self.mapping
            .get(city)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colors() {
        let palette = generate_palette(12);
        assert_eq!(palette.len(), 12);
        let unique: BTreeSet<_> = palette.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn unknown_city_falls_back_to_default() {
        let cities: BTreeSet<String> = ["Mumbai".to_string(), "Pune".to_string()].into();
        let colors = CityColors::new(&cities);
        assert_ne!(colors.color_for("Mumbai"), Color32::GRAY);
        assert_eq!(colors.color_for("Gotham"), Color32::GRAY);
    }
}
