use std::collections::HashMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_hex(rgb: Srgb) -> String {
    let rgb: Srgb<u8> = rgb.into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            to_hex(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging scale for correlation heatmaps
// ---------------------------------------------------------------------------

/// Stops from strong negative (blue) through neutral to strong positive (red).
const DIVERGING_STOPS: [(f64, [u8; 3]); 5] = [
    (-1.0, [0x21, 0x66, 0xac]),
    (-0.5, [0x92, 0xc5, 0xde]),
    (0.0, [0xf7, 0xf7, 0xf7]),
    (0.5, [0xfd, 0xb8, 0x63]),
    (1.0, [0xb2, 0x18, 0x2b]),
];

fn linear(rgb: [u8; 3]) -> LinSrgb {
    Srgb::new(rgb[0], rgb[1], rgb[2]).into_format::<f32>().into_linear()
}

/// Colour of a correlation coefficient, interpolated in linear RGB.
pub fn diverging_hex(r: f64) -> String {
    let r = if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 };
    let upper = DIVERGING_STOPS
        .iter()
        .position(|(stop, _)| r <= *stop)
        .unwrap_or(DIVERGING_STOPS.len() - 1)
        .max(1);
    let (lo, lo_rgb) = DIVERGING_STOPS[upper - 1];
    let (hi, hi_rgb) = DIVERGING_STOPS[upper];
    let t = ((r - lo) / (hi - lo)) as f32;

    let mixed = linear(lo_rgb).mix(linear(hi_rgb), t);
    to_hex(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: category label → colour
// ---------------------------------------------------------------------------

/// Maps category labels to distinct colours, keeping the labels' order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<String, String>,
    default_color: String,
}

impl ColorMap {
    /// Build a colour map for the given levels.
    pub fn new(levels: &[String]) -> Self {
        let mapping = levels
            .iter()
            .cloned()
            .zip(generate_palette(levels.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: "#808080".to_string(),
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> &str {
        self.mapping
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert!(colors.iter().all(|c| c.len() == 7 && c.starts_with('#')));
        let mut unique = colors.clone();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging_hex(-1.0), "#2166ac");
        assert_eq!(diverging_hex(0.0), "#f7f7f7");
        assert_eq!(diverging_hex(1.0), "#b2182b");
        assert_eq!(diverging_hex(5.0), "#b2182b");
    }

    #[test]
    fn test_color_map_fallback() {
        let cm = ColorMap::new(&["a".to_string(), "b".to_string()]);
        assert_ne!(cm.color_for("a"), cm.color_for("b"));
        assert_eq!(cm.color_for("zzz"), "#808080");
    }
}
