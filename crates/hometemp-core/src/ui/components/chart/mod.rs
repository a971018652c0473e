//! Two-axis line chart
//!
//! [`LineChart`] plots up to [`MAX_CHART_LINES`] point series over a shared
//! x domain. Each line is tied to the left or right value axis, and each axis
//! may be given an explicit range; otherwise the range is taken from the data
//! on that side. A chart with no points draws an empty plot frame.
//!
//! ```ignore
//! let mut chart = LineChart::new(bounds).with_x_domain(series.x_len() as u32);
//! chart.add_line(ChartLine::new(series.temperature(), AxisSide::Left, COLOR_TEMPERATURE))?;
//! chart.set_axis_range(AxisSide::Left, range)?;
//! chart.draw(display)?;
//! ```

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use thiserror_no_std::Error;

mod axis;
pub mod constants;
pub mod viewport;

pub use axis::XLabelFormatter;
pub use constants::MAX_CHART_LINES;
pub use viewport::{DataBounds, Viewport, ViewportPadding};

use crate::reading::Centi;
use crate::series::{AxisRange, SeriesPoint};
use crate::ui::core::Drawable;
use crate::ui::styling::LIGHT_GRAY;

use constants::{DEFAULT_LINE_WIDTH_PX, FRAME_COLOR, GRID_COLOR, HORIZONTAL_GRID_COUNT};

/// Error types for chart configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("Line capacity exceeded (max: {max})")]
    TooManyLines { max: usize },

    #[error("Invalid axis range (min >= max)")]
    InvalidAxisRange,
}

pub type ChartResult<T> = Result<T, ChartError>;

/// Which value axis a line is scaled against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

/// One plotted series and its styling
#[derive(Debug, Clone, Copy)]
pub struct ChartLine<'a> {
    pub points: &'a [SeriesPoint],
    pub axis: AxisSide,
    pub color: Rgb565,
    pub width: u32,
}

impl<'a> ChartLine<'a> {
    pub fn new(points: &'a [SeriesPoint], axis: AxisSide, color: Rgb565) -> Self {
        Self {
            points,
            axis,
            color,
            width: DEFAULT_LINE_WIDTH_PX,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }
}

/// Line chart render sink
pub struct LineChart<'a> {
    bounds: Rectangle,
    padding: ViewportPadding,
    lines: heapless::Vec<ChartLine<'a>, MAX_CHART_LINES>,
    left_range: Option<AxisRange>,
    right_range: Option<AxisRange>,
    x_len: Option<u32>,
    x_labels: Option<XLabelFormatter<'a>>,
    label_style: MonoTextStyle<'static, Rgb565>,
}

impl<'a> LineChart<'a> {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            padding: ViewportPadding::default(),
            lines: heapless::Vec::new(),
            left_range: None,
            right_range: None,
            x_len: None,
            x_labels: None,
            label_style: MonoTextStyle::new(&FONT_6X10, LIGHT_GRAY),
        }
    }

    /// Number of x positions; defaults to one past the largest point x
    pub fn with_x_domain(mut self, x_len: u32) -> Self {
        self.x_len = Some(x_len);
        self
    }

    pub fn with_x_labels(mut self, formatter: XLabelFormatter<'a>) -> Self {
        self.x_labels = Some(formatter);
        self
    }

    pub fn add_line(&mut self, line: ChartLine<'a>) -> ChartResult<()> {
        self.lines.push(line).map_err(|_| ChartError::TooManyLines {
            max: MAX_CHART_LINES,
        })
    }

    /// Fix the value range of one axis
    pub fn set_axis_range(&mut self, side: AxisSide, range: AxisRange) -> ChartResult<()> {
        if range.min >= range.max {
            return Err(ChartError::InvalidAxisRange);
        }
        match side {
            AxisSide::Left => self.left_range = Some(range),
            AxisSide::Right => self.right_range = Some(range),
        }
        Ok(())
    }

    pub fn plot_area(&self) -> Rectangle {
        viewport::plot_area(self.bounds, self.padding)
    }

    fn x_len(&self) -> u32 {
        self.x_len.unwrap_or_else(|| {
            self.lines
                .iter()
                .flat_map(|line| line.points.iter())
                .map(|p| p.x.saturating_add(1))
                .max()
                .unwrap_or(0)
        })
    }

    /// Explicit range for a side, or the span of the data drawn against it
    fn axis_range(&self, side: AxisSide) -> Option<AxisRange> {
        let explicit = match side {
            AxisSide::Left => self.left_range,
            AxisSide::Right => self.right_range,
        };
        explicit.or_else(|| {
            let values = self
                .lines
                .iter()
                .filter(|line| line.axis == side)
                .flat_map(|line| line.points.iter().map(|p| p.value));
            let (min, max) = values.fold(None, |acc: Option<(Centi, Centi)>, v| match acc {
                Some((min, max)) => Some((min.min(v), max.max(v))),
                None => Some((v, v)),
            })?;
            if min == max {
                let one = Centi::from_units(1);
                Some(AxisRange {
                    min: min.saturating_sub(one),
                    max: max.saturating_add(one),
                })
            } else {
                Some(AxisRange { min, max })
            }
        })
    }

    fn viewport(&self, side: AxisSide) -> Option<Viewport> {
        let range = self.axis_range(side)?;
        let x_max = self.x_len().saturating_sub(1).max(1) as f32;
        let bounds = DataBounds::new(0.0, x_max, range.min.as_f32(), range.max.as_f32());
        Some(Viewport::new(bounds, self.bounds, self.padding))
    }

    fn draw_frame<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let plot = self.plot_area();
        let grid_style = PrimitiveStyle::with_stroke(GRID_COLOR, 1);
        let right = plot.top_left.x + plot.size.width as i32 - 1;

        for i in 1..=HORIZONTAL_GRID_COUNT {
            let y = plot.top_left.y
                + (plot.size.height as usize * i / (HORIZONTAL_GRID_COUNT + 1)) as i32;
            Line::new(Point::new(plot.top_left.x, y), Point::new(right, y))
                .into_styled(grid_style)
                .draw(display)?;
        }

        plot.into_styled(PrimitiveStyle::with_stroke(FRAME_COLOR, 1))
            .draw(display)
    }

    fn draw_line<D: DrawTarget<Color = Rgb565>>(
        &self,
        line: &ChartLine<'_>,
        viewport: &Viewport,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let style = PrimitiveStyle::with_stroke(line.color, line.width);
        let mut screen_points = line
            .points
            .iter()
            .filter_map(|p| viewport.data_to_screen(p.x as f32, p.value.as_f32()));

        let Some(mut previous) = screen_points.next() else {
            return Ok(());
        };

        let mut segments = 0usize;
        for point in screen_points {
            Line::new(previous, point).into_styled(style).draw(display)?;
            previous = point;
            segments += 1;
        }

        if segments == 0 {
            Circle::with_center(previous, line.width + 2)
                .into_styled(PrimitiveStyle::with_fill(line.color))
                .draw(display)?;
        }
        Ok(())
    }
}

impl Drawable for LineChart<'_> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.draw_frame(display)?;

        for side in [AxisSide::Left, AxisSide::Right] {
            let Some(viewport) = self.viewport(side) else {
                continue;
            };
            axis::draw_y_axis_labels(side, &viewport, self.label_style, display)?;
            for line in self.lines.iter().filter(|line| line.axis == side) {
                self.draw_line(line, &viewport, display)?;
            }
        }

        if let Some(formatter) = self.x_labels
            && let Some(viewport) = self
                .viewport(AxisSide::Left)
                .or_else(|| self.viewport(AxisSide::Right))
        {
            axis::draw_x_axis_labels(formatter, self.x_len(), &viewport, self.label_style, display)?;
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::reading::Reading;
    use crate::series::ChartSeries;
    use crate::ui::styling::{COLOR_HUMIDITY, COLOR_TEMPERATURE};
    use alloc::format;
    use alloc::vec::Vec;

    const SIZE: Size = Size::new(320, 200);

    fn series(count: usize) -> ChartSeries {
        let readings: Vec<Reading> = (0..count)
            .map(|i| {
                Reading::new(
                    format!("2021-03-04 10:{:02}:00", i),
                    Centi::from_hundredths(2000 + (i as i32 * 37) % 400),
                    Centi::from_hundredths(4500 + (i as i32 * 53) % 900),
                )
            })
            .collect();
        ChartSeries::build(&readings)
    }

    #[test]
    fn test_empty_chart_draws_frame_only() {
        let empty = ChartSeries::default();
        let mut chart = LineChart::new(Rectangle::new(Point::zero(), SIZE));
        chart
            .add_line(ChartLine::new(empty.temperature(), AxisSide::Left, COLOR_TEMPERATURE))
            .unwrap();

        let mut fb = FrameBuffer::new(SIZE);
        chart.draw(&mut fb).unwrap();

        assert_eq!(fb.count_color(COLOR_TEMPERATURE), 0);
        assert!(fb.count_color(FRAME_COLOR) > 0);
    }

    #[test]
    fn test_lines_drawn_in_their_colors() {
        let series = series(50);
        let labels = |x: u32| series.label_at(x);
        let mut chart = LineChart::new(Rectangle::new(Point::zero(), SIZE))
            .with_x_domain(series.x_len() as u32)
            .with_x_labels(&labels);
        chart
            .add_line(ChartLine::new(series.temperature(), AxisSide::Left, COLOR_TEMPERATURE))
            .unwrap();
        chart
            .add_line(ChartLine::new(series.humidity(), AxisSide::Right, COLOR_HUMIDITY).with_width(1))
            .unwrap();
        chart
            .set_axis_range(AxisSide::Left, series.temperature_axis().unwrap())
            .unwrap();
        chart
            .set_axis_range(AxisSide::Right, series.humidity_axis().unwrap())
            .unwrap();

        let mut fb = FrameBuffer::new(SIZE);
        chart.draw(&mut fb).unwrap();

        assert!(fb.count_color(COLOR_TEMPERATURE) > 100);
        assert!(fb.count_color(COLOR_HUMIDITY) > 100);
        assert!(fb.count_color(LIGHT_GRAY) > 0);
    }

    #[test]
    fn test_lines_stay_inside_plot_area() {
        let series = series(20);
        let mut chart = LineChart::new(Rectangle::new(Point::zero(), SIZE)).with_x_domain(20);
        chart
            .add_line(ChartLine::new(series.temperature(), AxisSide::Left, COLOR_TEMPERATURE).with_width(1))
            .unwrap();

        let mut fb = FrameBuffer::new(SIZE);
        chart.draw(&mut fb).unwrap();

        let plot = chart.plot_area();
        for y in 0..SIZE.height as i32 {
            for x in 0..SIZE.width as i32 {
                let p = Point::new(x, y);
                if fb.pixel_at(p) == Some(COLOR_TEMPERATURE) {
                    assert!(plot.contains(p), "pixel {:?} outside plot", p);
                }
            }
        }
    }

    #[test]
    fn test_single_point_is_visible() {
        let series = series(1);
        let mut chart = LineChart::new(Rectangle::new(Point::zero(), SIZE));
        chart
            .add_line(ChartLine::new(series.temperature(), AxisSide::Left, COLOR_TEMPERATURE))
            .unwrap();

        let mut fb = FrameBuffer::new(SIZE);
        chart.draw(&mut fb).unwrap();
        assert!(fb.count_color(COLOR_TEMPERATURE) > 0);
    }

    #[test]
    fn test_line_capacity() {
        let mut chart = LineChart::new(Rectangle::new(Point::zero(), SIZE));
        for _ in 0..MAX_CHART_LINES {
            chart
                .add_line(ChartLine::new(&[], AxisSide::Left, COLOR_TEMPERATURE))
                .unwrap();
        }
        assert_eq!(
            chart.add_line(ChartLine::new(&[], AxisSide::Right, COLOR_HUMIDITY)),
            Err(ChartError::TooManyLines {
                max: MAX_CHART_LINES
            })
        );
    }

    #[test]
    fn test_inverted_axis_range_rejected() {
        let mut chart = LineChart::new(Rectangle::new(Point::zero(), SIZE));
        let range = AxisRange {
            min: Centi::from_units(5),
            max: Centi::from_units(5),
        };
        assert_eq!(
            chart.set_axis_range(AxisSide::Left, range),
            Err(ChartError::InvalidAxisRange)
        );
    }
}
