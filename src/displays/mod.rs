//! Display topology discovery
//!
//! Each host platform family gets one native discovery path. Whatever it
//! reports is normalized into [`Display`] values, and a synthesized display
//! stands in when the path comes back empty.

#[cfg(target_os = "macos")]
mod core_graphics;
mod screen;
#[cfg(windows)]
mod win32;
#[cfg_attr(any(windows, target_os = "macos"), allow(dead_code))]
mod xrandr;

use std::fmt;

use tracing::{debug, info, warn};

use crate::constants::displays;

pub use screen::ScreenSize;

/// One OS-reported screen region in virtual-desktop coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pub width: u32,
    pub height: u32,
    /// Top-left corner; negative left of / above the primary display
    pub x: i32,
    pub y: i32,
    pub name: String,
}

impl Display {
    /// Build a display, labelling it by its origin when the OS gave no name
    pub fn new(width: u32, height: u32, x: i32, y: i32, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.is_empty() {
            format!("{x},{y}")
        } else {
            name
        };
        Self {
            width,
            height,
            x,
            y,
            name,
        }
    }

    fn fallback(size: ScreenSize) -> Self {
        Self::new(
            size.width.max(1),
            size.height.max(1),
            0,
            0,
            displays::FALLBACK_NAME,
        )
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}x{} @ {},{})",
            self.name, self.width, self.height, self.x, self.y
        )
    }
}

/// A platform-specific way of asking the OS which displays are active.
///
/// Implementations swallow their own failures: anything that goes wrong is
/// logged and reported as an empty list.
pub trait DisplaySource {
    fn name(&self) -> &'static str;
    fn query(&self) -> Vec<Display>;
}

/// Discovery path for the host this binary was built for
#[cfg(windows)]
pub fn platform_source() -> Box<dyn DisplaySource> {
    Box::new(win32::Win32Displays)
}

#[cfg(target_os = "macos")]
pub fn platform_source() -> Box<dyn DisplaySource> {
    Box::new(core_graphics::CoreGraphicsDisplays)
}

#[cfg(not(any(windows, target_os = "macos")))]
pub fn platform_source() -> Box<dyn DisplaySource> {
    Box::new(xrandr::XrandrDisplays::default())
}

/// Query the active displays. The result is never empty.
pub fn resolve_displays() -> Vec<Display> {
    resolve_with(platform_source().as_ref(), screen::host_screen_size)
}

/// Run one discovery path and fall back to a single full-screen display if it
/// found nothing. `screen_size` is only consulted for the fallback.
pub fn resolve_with(
    source: &dyn DisplaySource,
    screen_size: impl FnOnce() -> ScreenSize,
) -> Vec<Display> {
    let found = source.query();
    for d in &found {
        debug!(source = source.name(), display = %d, "Discovered display");
    }

    if found.is_empty() {
        let size = screen_size();
        warn!(
            source = source.name(),
            width = size.width,
            height = size.height,
            "No displays discovered, using full-screen fallback"
        );
        return vec![Display::fallback(size)];
    }

    info!(source = source.name(), count = found.len(), "Resolved displays");
    found
}
