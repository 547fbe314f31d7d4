//! Settings panel and clock overlay

mod app;
mod components;
mod constants;
mod font_registry;

pub use app::run_gui;
