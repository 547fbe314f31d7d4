use anyhow::{Context, Result};
use eframe::egui;

use crate::clock::TimeFormat;
use crate::color::{format_hex_color, parse_color};
use crate::displays::Display;
use crate::gui::constants::*;
use crate::overlay::{Appearance, TextStyle};

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Apply,
    RefreshDisplays,
    ToggleFormat,
    Quit,
}

/// Editable field values; nothing reaches the overlay until Apply
pub struct SettingsForm {
    pub display_index: usize,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
    pub background: String,
    available_fonts: Vec<String>,
}

impl SettingsForm {
    pub fn new(appearance: &Appearance, mut available_fonts: Vec<String>) -> Self {
        let family = &appearance.text.font_family;
        if !available_fonts.contains(family) {
            available_fonts.insert(0, family.clone());
        }
        Self {
            display_index: 0,
            font_family: family.clone(),
            font_size: appearance.text.font_size,
            font_color: appearance.text.color.clone(),
            background: appearance.background.clone(),
            available_fonts,
        }
    }

    /// Validate the fields into an appearance, rejecting anything unusable
    pub fn appearance(&self) -> Result<Appearance> {
        parse_color(&self.font_color).context("Invalid font color")?;
        parse_color(&self.background).context("Invalid background color")?;
        Ok(Appearance {
            text: TextStyle {
                font_family: self.font_family.clone(),
                font_size: self.font_size.max(1),
                color: self.font_color.trim().to_string(),
            },
            background: self.background.trim().to_string(),
        })
    }

    /// Keep the chosen display valid after the list changed
    pub fn clamp_display(&mut self, count: usize) {
        if self.display_index >= count {
            self.display_index = 0;
        }
    }
}

pub struct PanelView<'a> {
    pub displays: &'a [Display],
    pub time_format: TimeFormat,
    pub failed_fonts: &'a [String],
}

pub fn ui(ui: &mut egui::Ui, form: &mut SettingsForm, view: &PanelView<'_>) -> PanelAction {
    let mut action = PanelAction::None;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Display").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Monitor:");
            let selected = view
                .displays
                .get(form.display_index)
                .map(|d| d.name.as_str())
                .unwrap_or("---");
            egui::ComboBox::from_id_salt("monitor_choice")
                .selected_text(selected)
                .width(200.0)
                .show_ui(ui, |ui| {
                    for (index, display) in view.displays.iter().enumerate() {
                        ui.selectable_value(&mut form.display_index, index, display.to_string());
                    }
                });
            if ui.button("\u{1F504}").on_hover_text("Detect displays again").clicked() {
                action = PanelAction::RefreshDisplays;
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Clock").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Font:");
            if view.failed_fonts.contains(&form.font_family) {
                ui.colored_label(STATUS_ERROR, "⚠")
                    .on_hover_text("Font could not be loaded, using the default font");
            }
            egui::ComboBox::from_id_salt("font_family")
                .selected_text(&form.font_family)
                .width(200.0)
                .show_ui(ui, |ui| {
                    for family in &form.available_fonts {
                        ui.selectable_value(&mut form.font_family, family.clone(), family);
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Font Size:");
            // Sizes set from the command line or the overlay may lie outside the range
            ui.add(
                egui::DragValue::new(&mut form.font_size)
                    .range(FONT_SIZE_RANGE)
                    .clamp_existing_to_range(false),
            );
        });

        color_row(ui, "Font Color:", &mut form.font_color);
        color_row(ui, "Background:", &mut form.background);

        ui.horizontal(|ui| {
            ui.label("Format:");
            if ui.button(view.time_format.to_string()).clicked() {
                action = PanelAction::ToggleFormat;
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            action = PanelAction::Apply;
        }
        if ui.button("Quit").clicked() {
            action = PanelAction::Quit;
        }
    });

    action
}

fn color_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(value).desired_width(100.0));
        if let Ok(mut color) = parse_color(value) {
            if ui.color_edit_button_srgba(&mut color).changed() {
                *value = format_hex_color(color);
            }
        }
    });
}
