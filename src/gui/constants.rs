//! GUI-specific constants for layout, colors and the overlay decorations

use eframe::egui;
use std::ops::RangeInclusive;

/// Settings window dimensions
pub const WINDOW_WIDTH: f32 = 380.0;
pub const WINDOW_HEIGHT: f32 = 460.0;
pub const WINDOW_MIN_WIDTH: f32 = 320.0;
pub const WINDOW_MIN_HEIGHT: f32 = 360.0;

/// Layout spacing
pub const PADDING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Font size range offered by the settings form
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 10..=400;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_WARN: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// Overlay selection decorations
pub const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 160, 255);
pub const GUIDE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);
pub const OUTLINE_WIDTH: f32 = 1.0;
pub const GUIDE_WIDTH: f32 = 1.0;

/// Identifies the overlay viewport across frames
pub const OVERLAY_VIEWPORT: &str = "clock_overlay";
