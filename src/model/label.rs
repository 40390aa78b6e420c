//! Label presets for annotation entry.
//!
//! Presets give the host a palette of common lesion names with stable
//! display colors; the editor itself accepts any free-text label.

use serde::{Deserialize, Serialize};

use crate::constants::label::{COLOR_SATURATION, COLOR_VALUE, GOLDEN_ANGLE};

/// A named label with a display color for overlay rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPreset {
    /// Display name of the preset
    pub name: String,
    /// RGB color for boxes carrying this label
    pub color: [u8; 3],
}

impl LabelPreset {
    /// Create a preset with a color from the golden-angle hue sequence, so
    /// consecutive presets stay visually distinct.
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        let hue = (index as f32 * GOLDEN_ANGLE) % 360.0;
        let (r, g, b) = hsv_to_rgb(hue, COLOR_SATURATION, COLOR_VALUE);
        Self {
            name: name.into(),
            color: [
                (r * 255.0).round() as u8,
                (g * 255.0).round() as u8,
                (b * 255.0).round() as u8,
            ],
        }
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }
}

/// Convert HSV to RGB (h in degrees, s and v in 0-1).
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let sector = (h / 60.0) as u32 % 6;
    let (r, g, b) = match sector {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

/// Default lesion presets for a fresh configuration.
pub fn default_labels() -> Vec<LabelPreset> {
    [
        "Microaneurysm",
        "Hemorrhage",
        "Hard exudate",
        "Cotton wool spot",
        "Drusen",
        "Neovascularization",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| LabelPreset::new(i as u32, *name))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_presets_get_distinct_colors() {
        let a = LabelPreset::new(0, "a");
        let b = LabelPreset::new(1, "b");
        let c = LabelPreset::new(2, "c");
        assert_ne!(a.color, b.color);
        assert_ne!(b.color, c.color);
        assert_ne!(a.color, c.color);
    }

    #[test]
    fn test_first_preset_hue_is_red() {
        // Index 0 sits at hue 0: red-dominant.
        let p = LabelPreset::new(0, "first");
        assert!(p.color[0] > p.color[1]);
        assert!(p.color[0] > p.color[2]);
    }

    #[test]
    fn test_with_color_overrides_generated() {
        let p = LabelPreset::new(3, "x").with_color([1, 2, 3]);
        assert_eq!(p.color, [1, 2, 3]);
    }

    #[test]
    fn test_default_labels_unique_names() {
        let labels = default_labels();
        assert!(!labels.is_empty());
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_preset_serde_round_trip() {
        let p = LabelPreset::new(2, "Drusen");
        let json = serde_json::to_string(&p).unwrap();
        let back: LabelPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn test_hsv_primaries() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert_eq!((r, g, b), (1.0, 0.0, 0.0));
        let (r, g, b) = hsv_to_rgb(120.0, 1.0, 1.0);
        assert_eq!((r, g, b), (0.0, 1.0, 0.0));
        let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
        assert_eq!((r, g, b), (0.0, 0.0, 1.0));
    }
}
