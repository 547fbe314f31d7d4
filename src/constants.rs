//! Application-wide constants
//!
//! Magic numbers and string literals used across the display resolver and the
//! overlay controller live here so there is a single source of truth.

/// Display discovery constants
pub mod displays {
    /// Name given to the synthesized display when discovery finds nothing
    pub const FALLBACK_NAME: &str = "Default";

    /// Screen size assumed when even the host screen probe fails
    pub const FALLBACK_WIDTH: u32 = 1920;
    pub const FALLBACK_HEIGHT: u32 = 1080;
}

/// Monitor-listing tool used on hosts without a native enumeration path
pub mod xrandr {
    /// Program name, resolved through PATH
    pub const PROGRAM: &str = "xrandr";

    /// Arguments selecting the one-line-per-monitor listing
    pub const ARGS: &[&str] = &["--listmonitors"];

    /// Give up on the tool after this long
    pub const TIMEOUT_MS: u64 = 2000;

    /// Interval between exit checks while waiting for the tool
    pub const POLL_INTERVAL_MS: u64 = 10;

    /// Minimum whitespace-separated fields on a monitor line
    pub const MIN_FIELDS: usize = 4;

    /// Prefix of the flag field marking an active monitor
    pub const ACTIVE_FLAG: char = '+';
}

/// Direct-manipulation constants for the clock text
pub mod manipulation {
    /// Distance from the surface midpoint within which a dragged center snaps
    pub const SNAP_THRESHOLD: f32 = 10.0;

    /// Side length of the square resize handle
    pub const HANDLE_SIZE: f32 = 8.0;

    /// Smallest font size the text may shrink to
    pub const MIN_FONT_SIZE: u32 = 1;

    /// Font size change per scroll tick
    pub const SCROLL_STEP: i64 = 1;
}

/// Clock text defaults
pub mod clock {
    /// egui's built-in sans-serif, always available without loading a file
    pub const DEFAULT_FONT_FAMILY: &str = "Proportional";
    pub const DEFAULT_FONT_SIZE: u32 = 48;
    pub const DEFAULT_BG_COLOR: &str = "black";
    pub const DEFAULT_FG_COLOR: &str = "white";

    /// strftime patterns for each time format
    pub const FORMAT_24H: &str = "%H:%M:%S";
    pub const FORMAT_12H: &str = "%I:%M:%S %p";

    /// Refresh period of the displayed time
    pub const TICK_MS: u64 = 1000;
}
