//! Axis label rendering

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;

use super::constants::{LABEL_GAP_PX, MAX_AXIS_LABEL_LENGTH, X_AXIS_LABEL_COUNT, Y_AXIS_LABEL_COUNT};
use super::viewport::Viewport;
use super::AxisSide;

/// Formats an x position into its axis label
pub type XLabelFormatter<'a> = &'a dyn Fn(u32) -> &'a str;

/// X positions that get a label: first, last and evenly spaced between
pub(super) fn x_label_positions(x_len: u32) -> impl Iterator<Item = u32> {
    let last = x_len.saturating_sub(1);
    let count = if x_len == 0 {
        0
    } else {
        X_AXIS_LABEL_COUNT.min(x_len as usize)
    };
    (0..count).map(move |i| {
        if count == 1 {
            0
        } else {
            (last as usize * i / (count - 1)) as u32
        }
    })
}

/// Draw x labels beneath the plot area
pub(super) fn draw_x_axis_labels<D: DrawTarget<Color = Rgb565>>(
    formatter: XLabelFormatter<'_>,
    x_len: u32,
    viewport: &Viewport,
    style: MonoTextStyle<'static, Rgb565>,
    display: &mut D,
) -> Result<(), D::Error> {
    let plot = viewport.plot_area();
    let label_y = plot.top_left.y + plot.size.height as i32 + LABEL_GAP_PX;
    let last = x_len.saturating_sub(1);

    for x in x_label_positions(x_len) {
        let label = formatter(x);
        if label.is_empty() {
            continue;
        }
        let Some(anchor) = viewport.data_to_screen(x as f32, viewport.data_bounds().y_min) else {
            continue;
        };

        let alignment = if x == 0 {
            Alignment::Left
        } else if x == last {
            Alignment::Right
        } else {
            Alignment::Center
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();

        Text::with_text_style(label, Point::new(anchor.x, label_y), style, text_style)
            .draw(display)?;
    }

    Ok(())
}

/// Draw value labels along one vertical edge of the plot
pub(super) fn draw_y_axis_labels<D: DrawTarget<Color = Rgb565>>(
    side: AxisSide,
    viewport: &Viewport,
    style: MonoTextStyle<'static, Rgb565>,
    display: &mut D,
) -> Result<(), D::Error> {
    let plot = viewport.plot_area();
    let bounds = viewport.data_bounds();

    let (label_x, alignment) = match side {
        AxisSide::Left => (plot.top_left.x - LABEL_GAP_PX, Alignment::Right),
        AxisSide::Right => (
            plot.top_left.x + plot.size.width as i32 + LABEL_GAP_PX,
            Alignment::Left,
        ),
    };

    for i in 0..Y_AXIS_LABEL_COUNT {
        let t = i as f32 / (Y_AXIS_LABEL_COUNT - 1) as f32;
        let value = bounds.y_min + (bounds.y_max - bounds.y_min) * t;
        let Some(anchor) = viewport.data_to_screen(bounds.x_min, value) else {
            continue;
        };

        let baseline = if i == 0 {
            Baseline::Bottom
        } else if i == Y_AXIS_LABEL_COUNT - 1 {
            Baseline::Top
        } else {
            Baseline::Middle
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();

        let label = format_value(value);
        Text::with_text_style(&label, Point::new(label_x, anchor.y), style, text_style)
            .draw(display)?;
    }

    Ok(())
}

/// One-decimal value label
pub(super) fn format_value(value: f32) -> String<MAX_AXIS_LABEL_LENGTH> {
    let mut s = String::new();
    let _ = write!(s, "{:.1}", value);
    s
}
