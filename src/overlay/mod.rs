//! The draggable, resizable clock text and its manipulation state machine

pub mod controller;
pub mod geometry;
mod snapping;

pub use controller::{Appearance, Controller, Gesture, OverlayText, PointerEvent, TextMeasure, TextStyle};
pub use geometry::{Point, Size};
