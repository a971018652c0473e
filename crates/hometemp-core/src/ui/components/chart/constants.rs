//! Constants for chart rendering

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::styling::{DARK_GRAY, GRAY};

/// Maximum number of lines a chart can hold
pub const MAX_CHART_LINES: usize = 2;

/// Maximum length of formatted axis labels (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 16;

/// Number of x-axis labels (first, middle, last)
pub const X_AXIS_LABEL_COUNT: usize = 3;

/// Number of y-axis labels per side (top, middle, bottom)
pub const Y_AXIS_LABEL_COUNT: usize = 3;

/// Number of horizontal grid lines inside the plot
pub const HORIZONTAL_GRID_COUNT: usize = 3;

pub const GRID_COLOR: Rgb565 = DARK_GRAY;
pub const FRAME_COLOR: Rgb565 = GRAY;

/// Plot padding for the top edge in pixels
pub const PADDING_TOP_PX: u32 = 6;

/// Plot padding for the right edge in pixels, room for right-axis labels
pub const PADDING_RIGHT_PX: u32 = 32;

/// Plot padding for the bottom edge in pixels, room for x-axis labels
pub const PADDING_BOTTOM_PX: u32 = 16;

/// Plot padding for the left edge in pixels, room for left-axis labels
pub const PADDING_LEFT_PX: u32 = 32;

/// Gap between an axis label and the plot frame in pixels
pub const LABEL_GAP_PX: i32 = 3;

/// Minimum data range for scaling (prevents division by zero)
pub const MIN_DATA_RANGE: f32 = 0.001;

/// Default line width in pixels
pub const DEFAULT_LINE_WIDTH_PX: u32 = 2;
