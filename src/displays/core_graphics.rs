//! Display discovery through CoreGraphics, loaded at runtime

use anyhow::{Context, Result, bail};
use libloading::{Library, Symbol};
use tracing::debug;

use super::screen::ScreenSize;
use super::{Display, DisplaySource};

const CORE_GRAPHICS_PATH: &str =
    "/System/Library/Frameworks/CoreGraphics.framework/CoreGraphics";

/// Upper bound on display ids requested from CoreGraphics
const MAX_DISPLAYS: usize = 16;

type CGDirectDisplayID = u32;
type CGError = i32;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct CGRect {
    origin_x: f64,
    origin_y: f64,
    width: f64,
    height: f64,
}

type GetActiveDisplayListFn =
    unsafe extern "C" fn(u32, *mut CGDirectDisplayID, *mut u32) -> CGError;
type DisplayBoundsFn = unsafe extern "C" fn(CGDirectDisplayID) -> CGRect;
type MainDisplayIdFn = unsafe extern "C" fn() -> CGDirectDisplayID;
type DisplayPixelsFn = unsafe extern "C" fn(CGDirectDisplayID) -> usize;

pub struct CoreGraphicsDisplays;

impl DisplaySource for CoreGraphicsDisplays {
    fn name(&self) -> &'static str {
        "core-graphics"
    }

    fn query(&self) -> Vec<Display> {
        active_displays().unwrap_or_else(|e| {
            debug!(error = ?e, "CoreGraphics display query failed");
            Vec::new()
        })
    }
}

fn load() -> Result<Library> {
    unsafe { Library::new(CORE_GRAPHICS_PATH) }
        .with_context(|| format!("Failed to load {CORE_GRAPHICS_PATH}"))
}

fn active_displays() -> Result<Vec<Display>> {
    let lib = load()?;
    unsafe {
        let get_list: Symbol<GetActiveDisplayListFn> = lib
            .get(b"CGGetActiveDisplayList\0")
            .context("CGGetActiveDisplayList not found")?;
        let bounds: Symbol<DisplayBoundsFn> = lib
            .get(b"CGDisplayBounds\0")
            .context("CGDisplayBounds not found")?;

        let mut ids = [0 as CGDirectDisplayID; MAX_DISPLAYS];
        let mut count = 0u32;
        let err = get_list(ids.len() as u32, ids.as_mut_ptr(), &mut count);
        if err != 0 {
            bail!("CGGetActiveDisplayList returned {err}");
        }

        let count = (count as usize).min(ids.len());
        Ok(ids[..count]
            .iter()
            .map(|&id| {
                let rect = bounds(id);
                // `as` truncates toward zero
                Display::new(
                    rect.width as u32,
                    rect.height as u32,
                    rect.origin_x as i32,
                    rect.origin_y as i32,
                    id.to_string(),
                )
            })
            .collect())
    }
}

/// Pixel size of the main display, used for the single-display fallback
pub fn main_display_size() -> Result<ScreenSize> {
    let lib = load()?;
    unsafe {
        let main_id: Symbol<MainDisplayIdFn> = lib
            .get(b"CGMainDisplayID\0")
            .context("CGMainDisplayID not found")?;
        let pixels_wide: Symbol<DisplayPixelsFn> = lib
            .get(b"CGDisplayPixelsWide\0")
            .context("CGDisplayPixelsWide not found")?;
        let pixels_high: Symbol<DisplayPixelsFn> = lib
            .get(b"CGDisplayPixelsHigh\0")
            .context("CGDisplayPixelsHigh not found")?;

        let id = main_id();
        Ok(ScreenSize {
            width: pixels_wide(id) as u32,
            height: pixels_high(id) as u32,
        })
    }
}
