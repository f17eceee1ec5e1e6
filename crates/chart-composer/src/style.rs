//! Fixed style constants shared by every composed chart.

pub const PAPER_BG: &str = "#22252b";
pub const COMPACT_BG: &str = "#1d1e22";
pub const GRID_COLOR: &str = "#3E3F40";
pub const SPIKE_COLOR: &str = "#6c757d";
pub const TICK_COLOR: &str = "#b2b2b2";
pub const TICK_SIZE: u8 = 8;
pub const BAND_COLOR: &str = "gray";

pub const UP_COLOR: &str = "green";
pub const DOWN_COLOR: &str = "red";

/// Fixed vertical gap between stacked panels.
pub const VERTICAL_SPACING: f64 = 0.05;
