pub mod overlay_view;
pub mod settings_panel;
