//! The borderless clock window: draws the text and feeds pointer input to the
//! manipulation controller

use eframe::egui;

use crate::color::parse_color;
use crate::gui::app::AppContext;
use crate::gui::constants::*;
use crate::gui::font_registry::FontRegistry;
use crate::overlay::{Controller, Gesture, Point, PointerEvent, Size, TextMeasure, TextStyle};

/// Measures text with the same fonts the overlay paints with
struct EguiMeasure<'a> {
    painter: &'a egui::Painter,
    fonts: &'a FontRegistry,
}

impl EguiMeasure<'_> {
    fn galley(&self, text: &str, style: &TextStyle, color: egui::Color32) -> std::sync::Arc<egui::Galley> {
        let font_id = egui::FontId::new(style.font_size as f32, self.fonts.resolve(&style.font_family));
        self.painter.layout_no_wrap(text.to_owned(), font_id, color)
    }
}

impl TextMeasure for EguiMeasure<'_> {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        let size = self.galley(text, style, egui::Color32::WHITE).size();
        Size::new(size.x, size.y)
    }
}

/// Translate this frame's raw input into controller events, in surface
/// coordinates relative to `origin`
pub fn pointer_events(events: &[egui::Event], origin: egui::Pos2) -> Vec<PointerEvent> {
    let to_surface = |pos: egui::Pos2| Point::new(pos.x - origin.x, pos.y - origin.y);
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => Some(if *pressed {
                PointerEvent::Press(to_surface(*pos))
            } else {
                PointerEvent::Release
            }),
            egui::Event::PointerMoved(pos) => Some(PointerEvent::Drag(to_surface(*pos))),
            // One step per wheel event regardless of its magnitude
            egui::Event::MouseWheel { delta, .. } if delta.y != 0.0 => {
                Some(PointerEvent::Scroll(delta.y.signum() as i32))
            }
            _ => None,
        })
        .collect()
}

/// Draw the overlay viewport for this frame
pub fn show(ctx: &egui::Context, app: &mut AppContext) {
    let builder = app.overlay_builder();
    ctx.show_viewport_immediate(app.overlay_id(), builder, |ctx, _class| {
        let background = parse_color(app.controller.background()).unwrap_or(egui::Color32::BLACK);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(background))
            .show(ctx, |ui| {
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                let painter = ui.painter_at(rect);
                let measure = EguiMeasure {
                    painter: &painter,
                    fonts: &app.fonts,
                };

                app.controller
                    .set_surface(Size::new(rect.width(), rect.height()));

                let settled = app
                    .pending_appearance
                    .as_ref()
                    .is_some_and(|pending| app.fonts.is_settled(&pending.text.font_family));
                if settled && let Some(appearance) = app.pending_appearance.take() {
                    app.controller.apply_settings(&appearance, &measure);
                }

                let events = ctx.input(|i| pointer_events(&i.events, rect.min));
                for event in events {
                    app.controller.handle(event, &measure);
                }

                ctx.set_cursor_icon(match app.controller.gesture() {
                    Gesture::Dragging { .. } => egui::CursorIcon::Grabbing,
                    Gesture::Resizing { .. } => egui::CursorIcon::ResizeNwSe,
                    Gesture::Idle | Gesture::Selected => egui::CursorIcon::Default,
                });

                paint(&painter, rect, &app.controller, &measure);
            });

        if ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
        }
    });
}

fn paint(painter: &egui::Painter, surface: egui::Rect, controller: &Controller, measure: &EguiMeasure<'_>) {
    let to_screen = |p: Point| surface.min + egui::vec2(p.x, p.y);
    let text = controller.text();

    let color = parse_color(&text.style.color).unwrap_or(egui::Color32::WHITE);
    let galley = measure.galley(&text.content, &text.style, color);
    let top_left = to_screen(text.position) - galley.size() / 2.0;
    painter.galley(top_left, galley, color);

    let guides = controller.guides();
    let guide = egui::Stroke::new(GUIDE_WIDTH, GUIDE_COLOR);
    if let Some(x) = guides.vertical {
        let x = surface.min.x + x;
        painter.line_segment([egui::pos2(x, surface.top()), egui::pos2(x, surface.bottom())], guide);
    }
    if let Some(y) = guides.horizontal {
        let y = surface.min.y + y;
        painter.line_segment([egui::pos2(surface.left(), y), egui::pos2(surface.right(), y)], guide);
    }

    if let Some(frame) = controller.selection() {
        let outline = egui::Rect::from_min_max(to_screen(frame.outline.min), to_screen(frame.outline.max));
        painter.rect_stroke(
            outline,
            0.0,
            egui::Stroke::new(OUTLINE_WIDTH, SELECTION_COLOR),
            egui::StrokeKind::Outside,
        );
        let handle = egui::Rect::from_min_max(to_screen(frame.handle.min), to_screen(frame.handle.max));
        painter.rect_filled(handle, 0.0, SELECTION_COLOR);
    }
}
