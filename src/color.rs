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
// Station → Color32
// ---------------------------------------------------------------------------

/// Assigns every station of the dataset a fixed colour.
///
/// Built from the full station domain, so a station keeps its colour while
/// others are filtered in and out.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(stations: &BTreeSet<String>) -> Self {
        let mapping = stations
            .iter()
            .cloned()
            .zip(generate_palette(stations.len()))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a station.
    pub fn color_for(&self, station: &str) -> Color32 {
        self.mapping.get(station).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        let unique: BTreeSet<[u8; 4]> = palette.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_unknown_station_is_gray() {
        let stations: BTreeSet<String> = ["Dongsi".to_string()].into_iter().collect();
        let cm = ColorMap::new(&stations);
        assert_ne!(cm.color_for("Dongsi"), Color32::GRAY);
        assert_eq!(cm.color_for("Tiantan"), Color32::GRAY);
    }
}
