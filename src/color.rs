//! Color strings as accepted on the command line and in the settings panel

use anyhow::{Result, anyhow};
use egui::Color32;

/// Named colors accepted besides hex notation
const NAMED: &[(&str, Color32)] = &[
    ("black", Color32::from_rgb(0, 0, 0)),
    ("white", Color32::from_rgb(255, 255, 255)),
    ("red", Color32::from_rgb(255, 0, 0)),
    ("green", Color32::from_rgb(0, 255, 0)),
    ("blue", Color32::from_rgb(0, 0, 255)),
    ("yellow", Color32::from_rgb(255, 255, 0)),
    ("cyan", Color32::from_rgb(0, 255, 255)),
    ("magenta", Color32::from_rgb(255, 0, 255)),
    ("orange", Color32::from_rgb(255, 165, 0)),
    ("gray", Color32::from_rgb(190, 190, 190)),
    ("grey", Color32::from_rgb(190, 190, 190)),
];

/// Parse `#RRGGBB`, `#AARRGGBB` or a color name (case-insensitive)
pub fn parse_color(value: &str) -> Result<Color32> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| anyhow!("Invalid hex color '{value}'"));
    }
    NAMED
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, color)| *color)
        .ok_or_else(|| anyhow!("Unknown color '{value}'"))
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let byte = |i: usize| hex.get(i..i + 2).and_then(|s| u8::from_str_radix(s, 16).ok());
    match hex.len() {
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            byte(2)?,
            byte(4)?,
            byte(6)?,
            byte(0)?,
        )),
        _ => None,
    }
}

/// Inverse of [`parse_color`] for picker results
pub fn format_hex_color(color: Color32) -> String {
    if color.a() == 255 {
        format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
    } else {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        format!("#{a:02X}{r:02X}{g:02X}{b:02X}")
    }
}
