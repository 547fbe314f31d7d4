//! Start-up options
//!
//! Nothing is persisted: every run starts from these command-line values.

use clap::Parser;

use crate::clock::TimeFormat;
use crate::constants::clock;
use crate::overlay::{Appearance, TextStyle};

#[derive(Debug, Parser)]
#[command(version, about = "Borderless always-on-top clock overlay")]
pub struct Cli {
    /// Background color of the overlay (name or #RRGGBB)
    #[arg(long, default_value = clock::DEFAULT_BG_COLOR)]
    pub bg_color: String,

    /// Color of the clock text (name or #RRGGBB)
    #[arg(long, default_value = clock::DEFAULT_FG_COLOR)]
    pub fg_color: String,

    /// Font size of the clock, in points
    #[arg(long, default_value_t = clock::DEFAULT_FONT_SIZE)]
    pub font_size: u32,

    /// Font family of the clock
    #[arg(long, default_value = clock::DEFAULT_FONT_FAMILY)]
    pub font_family: String,

    /// 12 or 24 hour time
    #[arg(long, value_enum, default_value_t = TimeFormat::H24)]
    pub format: TimeFormat,
}

impl Cli {
    pub fn appearance(&self) -> Appearance {
        Appearance {
            text: TextStyle {
                font_family: self.font_family.clone(),
                font_size: self.font_size.max(1),
                color: self.fg_color.clone(),
            },
            background: self.bg_color.clone(),
        }
    }
}
