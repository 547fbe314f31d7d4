//! Full-screen size as reported by the host windowing system

use tracing::{debug, warn};

use crate::constants::displays;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: displays::FALLBACK_WIDTH,
            height: displays::FALLBACK_HEIGHT,
        }
    }
}

/// Probe the host screen, falling back to a fixed size if the probe fails
pub fn host_screen_size() -> ScreenSize {
    match probe() {
        Ok(size) if size.width > 0 && size.height > 0 => {
            debug!(width = size.width, height = size.height, "Probed host screen size");
            size
        }
        Ok(size) => {
            warn!(?size, "Host reported an empty screen, assuming default size");
            ScreenSize::default()
        }
        Err(e) => {
            warn!(error = ?e, "Could not probe host screen size, assuming default size");
            ScreenSize::default()
        }
    }
}

#[cfg(not(any(windows, target_os = "macos")))]
fn probe() -> anyhow::Result<ScreenSize> {
    use anyhow::Context;
    use x11rb::connection::Connection;

    let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11")?;
    let screen = conn
        .setup()
        .roots
        .get(screen_num)
        .with_context(|| format!("X11 screen {screen_num} missing from setup"))?;
    Ok(ScreenSize {
        width: u32::from(screen.width_in_pixels),
        height: u32::from(screen.height_in_pixels),
    })
}

#[cfg(windows)]
fn probe() -> anyhow::Result<ScreenSize> {
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

    let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    Ok(ScreenSize {
        width: u32::try_from(width).unwrap_or(0),
        height: u32::try_from(height).unwrap_or(0),
    })
}

#[cfg(target_os = "macos")]
fn probe() -> anyhow::Result<ScreenSize> {
    super::core_graphics::main_display_size()
}
