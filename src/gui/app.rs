//! Settings window plus the clock overlay, implemented with egui/eframe

use std::time::{Duration, Instant};

use eframe::{CreationContext, egui};
use tracing::{error, info, warn};

use super::components::overlay_view;
use super::components::settings_panel::{self, PanelAction, PanelView, SettingsForm};
use super::constants::*;
use super::font_registry::FontRegistry;
use crate::clock::{self, Ticker, TimeFormat};
use crate::config::Cli;
use crate::displays::{self, Display};
use crate::fonts;
use crate::overlay::{Controller, OverlayText, Size};

pub struct StatusMessage {
    pub text: String,
    pub color: egui::Color32,
}

impl StatusMessage {
    fn new(text: impl Into<String>, color: egui::Color32) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Everything the settings panel and the overlay share
pub struct AppContext {
    pub displays: Vec<Display>,
    pub active_display: usize,
    pub controller: Controller,
    pub fonts: FontRegistry,
    pub time_format: TimeFormat,
    /// Applied by the overlay once its font has been loaded
    pub pending_appearance: Option<crate::overlay::Appearance>,
    /// Result of the last action
    pub status: Option<StatusMessage>,
    /// Shown for as long as detection looks degraded
    pub notice: Option<StatusMessage>,
    /// Physical pixels per logical point, for converting display geometry
    pub pixels_per_point: f32,
}

impl AppContext {
    pub fn new(cli: &Cli, displays: Vec<Display>, pixels_per_point: f32) -> Self {
        let appearance = cli.appearance();
        let ppp = pixels_per_point.max(f32::EPSILON);
        let surface = displays
            .first()
            .map(|d| Size::new(d.width as f32 / ppp, d.height as f32 / ppp))
            .unwrap_or_default();

        let controller = Controller::new(
            OverlayText {
                content: clock::now_string(cli.format),
                position: surface.center(),
                style: appearance.text.clone(),
            },
            appearance.background.clone(),
            surface,
        );

        let mut ctx = Self {
            displays,
            active_display: 0,
            controller,
            fonts: FontRegistry::default(),
            time_format: cli.format,
            pending_appearance: None,
            status: None,
            notice: None,
            pixels_per_point: ppp,
        };
        ctx.notice = ctx.detection_notice();
        ctx
    }

    /// Start loading `family`, reporting an unavailable font in the status line
    pub fn request_font(&mut self, ctx: &egui::Context, family: &str) -> bool {
        match self.fonts.request(ctx, family) {
            Ok(()) => true,
            Err(e) => {
                self.status = Some(StatusMessage::new(
                    format!("Font '{family}' unavailable: {e}"),
                    STATUS_WARN,
                ));
                false
            }
        }
    }

    pub fn active_display(&self) -> Option<&Display> {
        self.displays.get(self.active_display)
    }

    pub fn overlay_id(&self) -> egui::ViewportId {
        egui::ViewportId::from_hash_of(OVERLAY_VIEWPORT)
    }

    /// Borderless, always-on-top window covering the active display
    pub fn overlay_builder(&self) -> egui::ViewportBuilder {
        let builder = egui::ViewportBuilder::default()
            .with_title("Clock")
            .with_decorations(false)
            .with_always_on_top()
            .with_taskbar(false);
        match self.active_display() {
            Some(display) => {
                let (position, size) = self.display_rect(display);
                builder.with_position(position).with_inner_size(size)
            }
            None => builder,
        }
    }

    fn display_rect(&self, display: &Display) -> (egui::Pos2, egui::Vec2) {
        let ppp = self.pixels_per_point;
        (
            egui::pos2(display.x as f32 / ppp, display.y as f32 / ppp),
            egui::vec2(display.width as f32 / ppp, display.height as f32 / ppp),
        )
    }

    /// Move the overlay window onto `index`. The text keeps its place on the surface.
    pub fn select_display(&mut self, ctx: &egui::Context, index: usize) {
        if index == self.active_display {
            return;
        }
        let Some(target) = self.displays.get(index) else {
            warn!(index, "Ignoring selection of unknown display");
            return;
        };
        info!(display = %target, "Moving overlay");
        let (position, size) = self.display_rect(target);
        self.active_display = index;
        let id = self.overlay_id();
        ctx.send_viewport_cmd_to(id, egui::ViewportCommand::OuterPosition(position));
        ctx.send_viewport_cmd_to(id, egui::ViewportCommand::InnerSize(size));
    }

    /// Run display discovery again and keep the current choice when it still exists
    pub fn refresh_displays(&mut self) {
        self.displays = displays::resolve_displays();
        if self.active_display >= self.displays.len() {
            self.active_display = 0;
        }
        self.notice = self.detection_notice();
        self.status = Some(StatusMessage::new(
            format!("Found {} displays", self.displays.len()),
            STATUS_OK,
        ));
    }

    fn detection_notice(&self) -> Option<StatusMessage> {
        (self.displays.len() == 1).then(|| {
            warn!("Only one display detected, detection may be incomplete");
            StatusMessage::new(
                "Only one display detected. Detection may be incomplete.",
                STATUS_WARN,
            )
        })
    }
}

struct ClockApp {
    app: AppContext,
    form: SettingsForm,
    ticker: Ticker,
    /// Overlay font size last copied into the form
    synced_size: u32,
}

impl ClockApp {
    fn new(cc: &CreationContext<'_>, cli: &Cli, displays: Vec<Display>) -> Self {
        info!("Initializing egui clock");

        let pixels_per_point = cc
            .egui_ctx
            .input(|i| i.viewport().native_pixels_per_point)
            .unwrap_or(1.0);
        let mut app = AppContext::new(cli, displays, pixels_per_point);

        let family = app.controller.text().style.font_family.clone();
        app.request_font(&cc.egui_ctx, &family);

        let mut form = SettingsForm::new(&cli.appearance(), fonts::list_families());
        form.display_index = app.active_display;

        let synced_size = app.controller.text().style.font_size;
        Self {
            app,
            form,
            ticker: Ticker::default(),
            synced_size,
        }
    }

    fn apply(&mut self, ctx: &egui::Context) {
        let appearance = match self.form.appearance() {
            Ok(appearance) => appearance,
            Err(e) => {
                warn!(error = ?e, "Rejected settings");
                self.app.status = Some(StatusMessage::new(format!("{e:#}"), STATUS_ERROR));
                return;
            }
        };

        self.app.select_display(ctx, self.form.display_index);

        if self.app.request_font(ctx, &appearance.text.font_family) {
            self.app.status = Some(StatusMessage::new("Settings applied", STATUS_OK));
        }
        self.app.pending_appearance = Some(appearance);
    }

    fn handle(&mut self, ctx: &egui::Context, action: PanelAction) {
        match action {
            PanelAction::None => {}
            PanelAction::Apply => self.apply(ctx),
            PanelAction::RefreshDisplays => {
                self.app.refresh_displays();
                self.form.clamp_display(self.app.displays.len());
            }
            PanelAction::ToggleFormat => {
                self.app.time_format = self.app.time_format.toggled();
                self.ticker.reset();
                info!(format = %self.app.time_format, "Time format changed");
            }
            PanelAction::Quit => {
                info!("Quit requested from settings");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.app.fonts.begin_frame();

        let now = Instant::now();
        if self.ticker.poll(now) {
            self.app
                .controller
                .set_content(clock::now_string(self.app.time_format));
        }

        let mut action = PanelAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            ui.heading("Clock Settings");
            ui.add_space(SECTION_SPACING);

            let failed_fonts = self.app.fonts.failed();
            let view = PanelView {
                displays: &self.app.displays,
                time_format: self.app.time_format,
                failed_fonts: &failed_fonts,
            };
            action = settings_panel::ui(ui, &mut self.form, &view);

            for message in [&self.app.notice, &self.app.status].into_iter().flatten() {
                ui.add_space(ITEM_SPACING);
                ui.colored_label(message.color, &message.text);
            }
        });
        self.handle(ctx, action);

        overlay_view::show(ctx, &mut self.app);

        // Handle and wheel resizes show up in the form
        let size = self.app.controller.text().style.font_size;
        if size != self.synced_size {
            self.form.font_size = size;
            self.synced_size = size;
        }

        let wait = self.ticker.remaining(Instant::now()).max(Duration::from_millis(1));
        ctx.request_repaint_after(wait);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Clock exiting");
    }
}

pub fn run_gui(cli: Cli, displays: Vec<Display>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Clock Settings"),
        ..Default::default()
    };

    eframe::run_native(
        "Clock Settings",
        options,
        Box::new(move |cc| Ok(Box::new(ClockApp::new(cc, &cli, displays)))),
    )
    .map_err(|err| {
        error!(error = %err, "egui clock failed");
        anyhow::anyhow!("Failed to launch egui clock: {err}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli() -> Cli {
        Cli::try_parse_from(["overlay-clock"]).unwrap()
    }

    #[test]
    fn test_text_starts_centered_on_first_display() {
        let app = AppContext::new(&cli(), vec![Display::new(1920, 1080, 0, 0, "A")], 1.0);
        assert_eq!(app.controller.text().position.x, 960.0);
        assert_eq!(app.controller.text().position.y, 540.0);
        assert_eq!(app.controller.text().style.font_size, 48);
    }

    #[test]
    fn test_single_display_shows_notice() {
        let app = AppContext::new(&cli(), vec![Display::new(1920, 1080, 0, 0, "Default")], 1.0);
        assert!(app.notice.is_some());

        let app = AppContext::new(
            &cli(),
            vec![
                Display::new(1920, 1080, 0, 0, "A"),
                Display::new(1920, 1080, 1920, 0, "B"),
            ],
            1.0,
        );
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_default_font_needs_no_loading() {
        let ctx = egui::Context::default();
        let mut app = AppContext::new(&cli(), vec![Display::new(1920, 1080, 0, 0, "A")], 1.0);
        let family = app.controller.text().style.font_family.clone();
        assert!(app.request_font(&ctx, &family));
        assert!(app.fonts.is_settled(&family));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_missing_font_keeps_detection_notice() {
        let ctx = egui::Context::default();
        let mut app = AppContext::new(&cli(), vec![Display::new(1920, 1080, 0, 0, "Default")], 1.0);
        assert!(!app.request_font(&ctx, "No Such Font Family 42"));
        assert!(app.status.is_some());
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_selecting_display_keeps_text_position() {
        let ctx = egui::Context::default();
        let mut app = AppContext::new(
            &cli(),
            vec![
                Display::new(1920, 1080, 0, 0, "A"),
                Display::new(1280, 1024, -1280, 0, "B"),
            ],
            1.0,
        );
        let before = app.controller.text().position;
        app.select_display(&ctx, 1);
        assert_eq!(app.active_display, 1);
        assert_eq!(app.controller.text().position, before);

        app.select_display(&ctx, 7);
        assert_eq!(app.active_display, 1);
    }

    #[test]
    fn test_display_rect_scales_by_pixels_per_point() {
        let app = AppContext::new(&cli(), vec![Display::new(3840, 2160, -3840, 0, "HiDPI")], 2.0);
        assert_eq!(app.controller.text().position.x, 960.0);
        let display = app.displays[0].clone();
        let (position, size) = app.display_rect(&display);
        assert_eq!(position, egui::pos2(-1920.0, 0.0));
        assert_eq!(size, egui::vec2(1920.0, 1080.0));
    }
}
