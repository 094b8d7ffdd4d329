use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use freq_response_viewer::data::model::Axis;

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
// Fixed axis colours
// ---------------------------------------------------------------------------

pub const BLUE: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
pub const ORANGE: Color32 = Color32::from_rgb(0xff, 0x7f, 0x0e);
pub const GREEN: Color32 = Color32::from_rgb(0x2c, 0xa0, 0x2c);

/// Peak and modal-frequency annotations.
pub const MARKER: Color32 = Color32::from_rgb(0xd6, 0x27, 0x28);

pub fn axis_color(axis: Axis) -> Color32 {
    match axis {
        Axis::X => BLUE,
        Axis::Y => ORANGE,
        Axis::Z => GREEN,
    }
}
