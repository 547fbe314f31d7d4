//! Monitor discovery through `EnumDisplayMonitors`

use std::mem;
use tracing::{debug, warn};
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
};

use super::{Display, DisplaySource};

pub struct Win32Displays;

impl DisplaySource for Win32Displays {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn query(&self) -> Vec<Display> {
        let mut monitors: Vec<Display> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut monitors as *mut Vec<Display> as isize),
            )
        };
        if !ok.as_bool() {
            warn!("EnumDisplayMonitors reported failure");
            return Vec::new();
        }
        monitors
    }
}

extern "system" fn monitor_enum_proc(
    monitor: HMONITOR,
    _hdc: HDC,
    _rc_clip: *mut RECT,
    data: LPARAM,
) -> BOOL {
    // SAFETY: `data` is the &mut Vec passed by `query`, alive for the whole enumeration
    let monitors = unsafe { &mut *(data.0 as *mut Vec<Display>) };

    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
    if unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) }.as_bool() {
        let rc = info.monitorInfo.rcMonitor;
        let len = info
            .szDevice
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(info.szDevice.len());
        let name = String::from_utf16_lossy(&info.szDevice[..len]);
        monitors.push(Display::new(
            (rc.right - rc.left).max(0) as u32,
            (rc.bottom - rc.top).max(0) as u32,
            rc.left,
            rc.top,
            name,
        ));
    } else {
        debug!(?monitor, "GetMonitorInfoW failed, skipping monitor");
    }
    BOOL(1)
}
