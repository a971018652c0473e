//! Transformation between data space and screen space

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::constants::{
    MIN_DATA_RANGE, PADDING_BOTTOM_PX, PADDING_LEFT_PX, PADDING_RIGHT_PX, PADDING_TOP_PX,
};

/// Data space bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl DataBounds {
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn x_range(&self) -> f32 {
        (self.x_max - self.x_min).max(MIN_DATA_RANGE)
    }

    pub fn y_range(&self) -> f32 {
        (self.y_max - self.y_min).max(MIN_DATA_RANGE)
    }
}

/// Padding around the plot area for labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPadding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for ViewportPadding {
    fn default() -> Self {
        Self {
            top: PADDING_TOP_PX,
            right: PADDING_RIGHT_PX,
            bottom: PADDING_BOTTOM_PX,
            left: PADDING_LEFT_PX,
        }
    }
}

/// Maps data coordinates into a plot rectangle
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    data_bounds: DataBounds,
    screen_bounds: Rectangle,
    padding: ViewportPadding,
}

impl Viewport {
    pub fn new(data_bounds: DataBounds, screen_bounds: Rectangle, padding: ViewportPadding) -> Self {
        Self {
            data_bounds,
            screen_bounds,
            padding,
        }
    }

    /// Screen bounds minus padding
    pub fn plot_area(&self) -> Rectangle {
        plot_area(self.screen_bounds, self.padding)
    }

    pub fn data_bounds(&self) -> &DataBounds {
        &self.data_bounds
    }

    /// Transform a data point to screen coordinates.
    ///
    /// Values outside the data bounds are clamped to the plot edge.
    pub fn data_to_screen(&self, x: f32, y: f32) -> Option<Point> {
        let plot = self.plot_area();
        let x_norm = (x - self.data_bounds.x_min) / self.data_bounds.x_range();
        let y_norm = (y - self.data_bounds.y_min) / self.data_bounds.y_range();

        if !x_norm.is_finite() || !y_norm.is_finite() {
            return None;
        }

        let x_norm = x_norm.clamp(0.0, 1.0);
        let y_norm = y_norm.clamp(0.0, 1.0);

        // Screen y grows downward
        let width = plot.size.width.saturating_sub(1) as f32;
        let height = plot.size.height.saturating_sub(1) as f32;
        let screen_x = plot.top_left.x + (x_norm * width) as i32;
        let screen_y = plot.top_left.y + ((1.0 - y_norm) * height) as i32;

        Some(Point::new(screen_x, screen_y))
    }
}

/// Rectangle left after removing `padding` from `bounds`
pub fn plot_area(bounds: Rectangle, padding: ViewportPadding) -> Rectangle {
    let top_left = Point::new(
        bounds.top_left.x + padding.left as i32,
        bounds.top_left.y + padding.top as i32,
    );
    let width = bounds.size.width.saturating_sub(padding.left + padding.right);
    let height = bounds.size.height.saturating_sub(padding.top + padding.bottom);
    Rectangle::new(top_left, Size::new(width, height))
}
