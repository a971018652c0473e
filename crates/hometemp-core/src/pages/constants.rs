//! Shared page geometry

/// Height of the page header strip in pixels
pub const HEADER_HEIGHT_PX: u32 = 28;

/// Height of the error banner in pixels
pub const BANNER_HEIGHT_PX: u32 = 20;

/// Height of the chart legend row in pixels
pub const LEGEND_HEIGHT_PX: u32 = 14;

/// Width of the tappable back area in the chart header in pixels
pub const BACK_BUTTON_WIDTH_PX: u32 = 64;

/// Side length of a legend color swatch in pixels
pub const LEGEND_SWATCH_PX: u32 = 8;
