use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

/// CSS-style `rgba(r, g, b, a)` with `a` in `0.0..=1.0`.
pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color32 {
    let alpha = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

pub const BLUE: (u8, u8, u8) = (59, 130, 246);
pub const GREEN: (u8, u8, u8) = (16, 185, 129);
pub const YELLOW: (u8, u8, u8) = (234, 179, 8);
pub const RED: (u8, u8, u8) = (239, 68, 68);

pub fn with_alpha((r, g, b): (u8, u8, u8), a: f32) -> Color32 {
    rgba(r, g, b, a)
}

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
// Persona → Color32
// ---------------------------------------------------------------------------

/// Maps each persona label in the dataset to a distinct colour.
#[derive(Debug, Clone)]
pub struct PersonaColors {
    mapping: BTreeMap<i64, Color32>,
    default_color: Color32,
}

impl Default for PersonaColors {
    fn default() -> Self {
        Self::new(&BTreeSet::new())
    }
}

impl PersonaColors {
    pub fn new(personas: &BTreeSet<i64>) -> Self {
        let palette = generate_palette(personas.len());
        let mapping = personas.iter().copied().zip(palette).collect();

        PersonaColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, persona: i64) -> Color32 {
        self.mapping
            .get(&persona)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (persona → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(i64, Color32)> {
        self.mapping.iter().map(|(p, c)| (*p, *c)).collect()
    }
}

pub fn persona_label(persona: i64) -> String {
    format!("Persona {persona}")
}
