//! Pointer-driven manipulation of the clock text
//!
//! The text can be selected, dragged (snapping to the surface center), resized
//! from a handle on its bottom-right corner and resized with the scroll wheel.
//! Only one gesture can be in progress at a time.

use tracing::{debug, trace};

use super::geometry::{Offset, Point, Rect, Size};
use super::snapping;
use crate::constants::manipulation;

/// Cosmetic and size settings of the clock text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub color: String,
}

/// Values written by the settings panel's apply action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    pub text: TextStyle,
    pub background: String,
}

/// Measures how large `text` renders in `style`
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size;
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub content: String,
    /// Center of the text within the drawing surface
    pub position: Point,
    pub style: TextStyle,
}

/// Pointer input in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Drag(Point),
    Release,
    /// Signed wheel ticks; positive is away from the user
    Scroll(i32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Selected,
    /// Grab point stays fixed under the pointer
    Dragging { grab_offset: Offset },
    Resizing { anchor_y: f32, base_size: u32 },
}

/// Outline and resize handle shown while the text is selected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionFrame {
    pub outline: Rect,
    pub handle: Rect,
}

impl SelectionFrame {
    fn fit(bounds: Rect) -> Self {
        Self {
            outline: bounds,
            handle: Rect::around(bounds.bottom_right(), manipulation::HANDLE_SIZE),
        }
    }
}

/// Full-surface guide lines through the midpoint, one per snapped axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Guides {
    pub vertical: Option<f32>,
    pub horizontal: Option<f32>,
}

#[derive(Debug)]
pub struct Controller {
    text: OverlayText,
    background: String,
    surface: Size,
    gesture: Gesture,
    frame: Option<SelectionFrame>,
    guides: Guides,
}

impl Controller {
    pub fn new(mut text: OverlayText, background: String, surface: Size) -> Self {
        text.style.font_size = clamp_font_size(i64::from(text.style.font_size));
        Self {
            text,
            background,
            surface,
            gesture: Gesture::Idle,
            frame: None,
            guides: Guides::default(),
        }
    }

    pub fn text(&self) -> &OverlayText {
        &self.text
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn selection(&self) -> Option<&SelectionFrame> {
        self.frame.as_ref()
    }

    pub fn guides(&self) -> Guides {
        self.guides
    }

    /// Resize the drawing surface. The text keeps its position.
    pub fn set_surface(&mut self, surface: Size) {
        self.surface = surface;
    }

    /// Replace the displayed string without touching position or size
    pub fn set_content(&mut self, content: String) {
        self.text.content = content;
    }

    pub fn bounds(&self, measure: &impl TextMeasure) -> Rect {
        let size = measure.measure(&self.text.content, &self.text.style);
        Rect::from_center_size(self.text.position, size)
    }

    pub fn handle(&mut self, event: PointerEvent, measure: &impl TextMeasure) {
        match event {
            PointerEvent::Press(pointer) => self.press(pointer, measure),
            PointerEvent::Drag(pointer) => self.drag(pointer),
            PointerEvent::Release => self.release(measure),
            PointerEvent::Scroll(ticks) => self.scroll(ticks, measure),
        }
    }

    pub fn press(&mut self, pointer: Point, measure: &impl TextMeasure) {
        let inside_text = self.bounds(measure).contains(pointer);
        match self.gesture {
            Gesture::Idle => {
                if inside_text {
                    let bounds = self.select(measure);
                    debug!(
                        width = bounds.width(),
                        height = bounds.height(),
                        "Text selected"
                    );
                }
            }
            Gesture::Selected => {
                let on_handle = self
                    .frame
                    .is_some_and(|frame| frame.handle.contains(pointer));
                if on_handle {
                    self.gesture = Gesture::Resizing {
                        anchor_y: pointer.y,
                        base_size: self.text.style.font_size,
                    };
                    debug!(base_size = self.text.style.font_size, "Resize started");
                } else if inside_text {
                    self.gesture = Gesture::Dragging {
                        grab_offset: pointer - self.text.position,
                    };
                    debug!(x = pointer.x, y = pointer.y, "Drag started");
                } else {
                    self.deselect();
                    debug!("Selection cleared");
                }
            }
            // A second button while a gesture is running does not start another
            Gesture::Dragging { .. } | Gesture::Resizing { .. } => {}
        }
    }

    pub fn drag(&mut self, pointer: Point) {
        match self.gesture {
            Gesture::Dragging { grab_offset } => {
                let snapped = snapping::snap_to_center(
                    pointer - grab_offset,
                    self.surface,
                    manipulation::SNAP_THRESHOLD,
                );
                self.text.position = snapped.position;
                self.guides = Guides {
                    vertical: snapped.vertical_guide,
                    horizontal: snapped.horizontal_guide,
                };
                trace!(x = snapped.position.x, y = snapped.position.y, "Dragged");
            }
            Gesture::Resizing {
                anchor_y,
                base_size,
            } => {
                let delta = (pointer.y - anchor_y).round() as i64;
                self.text.style.font_size = clamp_font_size(i64::from(base_size) + delta);
                trace!(font_size = self.text.style.font_size, "Resized");
            }
            Gesture::Idle | Gesture::Selected => {}
        }
    }

    pub fn release(&mut self, measure: &impl TextMeasure) {
        if matches!(
            self.gesture,
            Gesture::Dragging { .. } | Gesture::Resizing { .. }
        ) {
            self.guides = Guides::default();
            self.select(measure);
            debug!(
                x = self.text.position.x,
                y = self.text.position.y,
                font_size = self.text.style.font_size,
                "Gesture finished"
            );
        }
    }

    /// Change the font size by one step per tick; positive ticks grow the text.
    /// Ignored unless the text is selected with no gesture running.
    pub fn scroll(&mut self, ticks: i32, measure: &impl TextMeasure) {
        if self.gesture != Gesture::Selected || ticks == 0 {
            return;
        }
        let step = i64::from(ticks) * manipulation::SCROLL_STEP;
        self.text.style.font_size = clamp_font_size(i64::from(self.text.style.font_size) + step);
        self.frame = Some(SelectionFrame::fit(self.bounds(measure)));
        debug!(font_size = self.text.style.font_size, "Scroll resize");
    }

    pub fn apply_settings(&mut self, appearance: &Appearance, measure: &impl TextMeasure) {
        let mut style = appearance.text.clone();
        style.font_size = clamp_font_size(i64::from(style.font_size));
        self.text.style = style;
        self.background = appearance.background.clone();
        if self.frame.is_some() {
            self.frame = Some(SelectionFrame::fit(self.bounds(measure)));
        }
        debug!(style = ?self.text.style, background = %self.background, "Applied settings");
    }

    fn select(&mut self, measure: &impl TextMeasure) -> Rect {
        let bounds = self.bounds(measure);
        self.gesture = Gesture::Selected;
        self.frame = Some(SelectionFrame::fit(bounds));
        bounds
    }

    fn deselect(&mut self) {
        self.gesture = Gesture::Idle;
        self.frame = None;
        self.guides = Guides::default();
    }
}

fn clamp_font_size(size: i64) -> u32 {
    size.clamp(i64::from(manipulation::MIN_FONT_SIZE), i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is half as wide as the font size; lines are one font size tall
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure(&self, text: &str, style: &TextStyle) -> Size {
            let size = style.font_size as f32;
            Size::new(text.chars().count() as f32 * size / 2.0, size)
        }
    }

    fn style(font_size: u32) -> TextStyle {
        TextStyle {
            font_family: "Helvetica".to_string(),
            font_size,
            color: "white".to_string(),
        }
    }

    /// "0000" at size 50 is 100x50, centered at (100, 100): bbox (50,75)-(150,125)
    fn controller() -> Controller {
        Controller::new(
            OverlayText {
                content: "0000".to_string(),
                position: Point::new(100.0, 100.0),
                style: style(50),
            },
            "black".to_string(),
            Size::new(400.0, 300.0),
        )
    }

    fn selected() -> Controller {
        let mut c = controller();
        c.press(Point::new(100.0, 100.0), &FixedMeasure);
        assert_eq!(c.gesture(), Gesture::Selected);
        c
    }

    #[test]
    fn test_press_inside_selects_and_places_handle() {
        let c = selected();
        let frame = c.selection().unwrap();
        assert_eq!(frame.outline.max, Point::new(150.0, 125.0));
        assert_eq!(frame.handle, Rect::around(Point::new(150.0, 125.0), 8.0));
    }

    #[test]
    fn test_press_outside_while_idle_stays_idle() {
        let mut c = controller();
        c.press(Point::new(10.0, 10.0), &FixedMeasure);
        assert_eq!(c.gesture(), Gesture::Idle);
        assert!(c.selection().is_none());
    }

    #[test]
    fn test_press_on_edge_counts_as_inside() {
        let mut c = controller();
        c.press(Point::new(50.0, 75.0), &FixedMeasure);
        assert_eq!(c.gesture(), Gesture::Selected);

        c.press(Point::new(50.0, 100.0), &FixedMeasure);
        assert!(matches!(c.gesture(), Gesture::Dragging { .. }));
    }

    #[test]
    fn test_press_just_outside_edge_deselects() {
        let mut c = selected();
        c.press(Point::new(49.9, 100.0), &FixedMeasure);
        assert_eq!(c.gesture(), Gesture::Idle);
        assert!(c.selection().is_none());
    }

    #[test]
    fn test_drag_keeps_grab_point_under_pointer() {
        let mut c = selected();
        c.press(Point::new(110.0, 90.0), &FixedMeasure);
        c.drag(Point::new(60.0, 40.0));
        assert_eq!(c.text().position, Point::new(50.0, 50.0));
        assert_eq!(c.guides(), Guides::default());
    }

    #[test]
    fn test_drag_snaps_to_center_and_shows_guide() {
        let mut c = selected();
        c.press(Point::new(100.0, 100.0), &FixedMeasure);

        c.drag(Point::new(205.0, 60.0));
        assert_eq!(c.text().position, Point::new(200.0, 60.0));
        assert_eq!(c.guides().vertical, Some(200.0));
        assert_eq!(c.guides().horizontal, None);

        c.drag(Point::new(215.0, 146.0));
        assert_eq!(c.text().position, Point::new(215.0, 150.0));
        assert_eq!(c.guides().vertical, None);
        assert_eq!(c.guides().horizontal, Some(150.0));
    }

    #[test]
    fn test_release_clears_guides_and_refits_selection() {
        let mut c = selected();
        c.press(Point::new(100.0, 100.0), &FixedMeasure);
        c.drag(Point::new(200.0, 150.0));
        c.release(&FixedMeasure);

        assert_eq!(c.gesture(), Gesture::Selected);
        assert_eq!(c.guides(), Guides::default());
        let frame = c.selection().unwrap();
        assert_eq!(frame.outline.max, Point::new(250.0, 175.0));
    }

    #[test]
    fn test_handle_drag_down_grows_text() {
        let mut c = Controller::new(
            OverlayText {
                content: "0000".to_string(),
                position: Point::new(100.0, 100.0),
                style: style(48),
            },
            "black".to_string(),
            Size::new(400.0, 300.0),
        );
        c.press(Point::new(100.0, 100.0), &FixedMeasure);
        let corner = c.selection().unwrap().handle.max;
        c.press(corner, &FixedMeasure);
        assert!(matches!(
            c.gesture(),
            Gesture::Resizing { base_size: 48, .. }
        ));

        c.drag(Point::new(corner.x, corner.y + 10.0));
        assert_eq!(c.text().style.font_size, 58);

        c.drag(Point::new(corner.x, corner.y - 60.0));
        assert_eq!(c.text().style.font_size, 1);

        c.release(&FixedMeasure);
        assert_eq!(c.gesture(), Gesture::Selected);
        assert_eq!(c.text().style.font_size, 1);
    }

    #[test]
    fn test_handle_takes_priority_over_text() {
        let mut c = selected();
        // Inside both the text bbox and the handle
        c.press(Point::new(148.0, 123.0), &FixedMeasure);
        assert!(matches!(c.gesture(), Gesture::Resizing { .. }));
    }

    #[test]
    fn test_scroll_while_idle_is_noop() {
        let mut c = controller();
        c.scroll(3, &FixedMeasure);
        assert_eq!(c.text().style.font_size, 50);
    }

    #[test]
    fn test_scroll_steps_one_per_tick_with_floor() {
        let mut c = selected();
        c.scroll(1, &FixedMeasure);
        assert_eq!(c.text().style.font_size, 51);
        assert_eq!(c.selection().unwrap().outline.height(), 51.0);

        c.scroll(-100, &FixedMeasure);
        assert_eq!(c.text().style.font_size, 1);
    }

    #[test]
    fn test_scroll_during_drag_is_ignored() {
        let mut c = selected();
        c.press(Point::new(100.0, 100.0), &FixedMeasure);
        c.scroll(1, &FixedMeasure);
        assert_eq!(c.text().style.font_size, 50);
    }

    #[test]
    fn test_drag_and_release_without_gesture_do_nothing() {
        let mut c = selected();
        c.drag(Point::new(300.0, 300.0));
        c.release(&FixedMeasure);
        assert_eq!(c.text().position, Point::new(100.0, 100.0));
        assert_eq!(c.gesture(), Gesture::Selected);
    }

    #[test]
    fn test_apply_settings_refits_active_selection() {
        let mut c = selected();
        let appearance = Appearance {
            text: style(80),
            background: "#102030".to_string(),
        };
        c.apply_settings(&appearance, &FixedMeasure);

        assert_eq!(c.gesture(), Gesture::Selected);
        assert_eq!(c.background(), "#102030");
        let frame = c.selection().unwrap();
        assert_eq!(frame.outline.width(), 160.0);
        assert_eq!(frame.outline.height(), 80.0);
    }

    #[test]
    fn test_apply_settings_while_idle_keeps_idle_and_floors_size() {
        let mut c = controller();
        let appearance = Appearance {
            text: style(0),
            background: "black".to_string(),
        };
        c.apply_settings(&appearance, &FixedMeasure);
        assert_eq!(c.gesture(), Gesture::Idle);
        assert!(c.selection().is_none());
        assert_eq!(c.text().style.font_size, 1);
    }

    #[test]
    fn test_event_sequence_moves_then_keeps_selection() {
        let mut c = controller();
        for event in [
            PointerEvent::Press(Point::new(100.0, 100.0)),
            PointerEvent::Release,
            PointerEvent::Press(Point::new(100.0, 100.0)),
            PointerEvent::Drag(Point::new(120.0, 40.0)),
            PointerEvent::Release,
            PointerEvent::Scroll(2),
        ] {
            c.handle(event, &FixedMeasure);
        }
        assert_eq!(c.gesture(), Gesture::Selected);
        assert_eq!(c.text().position, Point::new(120.0, 40.0));
        assert_eq!(c.text().style.font_size, 52);
    }

    #[test]
    fn test_surface_change_does_not_move_text() {
        let mut c = controller();
        c.set_surface(Size::new(1920.0, 1080.0));
        assert_eq!(c.text().position, Point::new(100.0, 100.0));
    }
}
