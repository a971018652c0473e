//! Chart page
//!
//! Plots one page of historical readings, temperature against the left axis
//! and humidity against the right. Swiping left moves to older readings,
//! swiping right back toward the present. Every page change issues a fresh
//! fetch; results for superseded requests are dropped.

use core::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{
    MonoTextStyle,
    ascii::{FONT_6X10, FONT_10X20},
};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_layout::prelude::*;
use heapless::String;
use log::{error, info};

use crate::fetch::{FetchTarget, FetchTracker};
use crate::gesture::{Gesture, SwipeClassifier, SwipeTracker};
use crate::pages::page::Page;
use crate::paging::{Navigation, PageIndex, PageState};
use crate::reading::Reading;
use crate::series::ChartSeries;
use crate::sheets::SheetLayout;
use crate::ui::components::{AxisSide, ChartError, ChartLine, ErrorBanner, LineChart};
use crate::ui::core::{Action, DisplayMode, Drawable, PageEvent, PageId, TouchEvent, TouchPoint};
use crate::ui::styling::{COLOR_HUMIDITY, COLOR_TEMPERATURE, ModePalette};

use super::constants::{
    BACK_BUTTON_WIDTH_PX, BANNER_HEIGHT_PX, HEADER_HEIGHT_PX, LEGEND_HEIGHT_PX, LEGEND_SWATCH_PX,
};

/// Capacity of header text lines
const HEADER_TEXT_LENGTH: usize = 32;

/// Horizontal inset of header and legend content in pixels
const EDGE_INSET_PX: i32 = 6;

/// Stroke width shared by both series in pixels
const SERIES_LINE_WIDTH_PX: u32 = 2;

pub struct ChartPage {
    bounds: Rectangle,
    layout: SheetLayout,
    state: PageState,
    tracker: FetchTracker,
    series: ChartSeries,
    /// Page the plotted series came from
    shown: Option<PageIndex>,
    mode: DisplayMode,
    swipe: SwipeTracker,
    banner: ErrorBanner,
    dirty: bool,
}

impl ChartPage {
    pub fn new(
        bounds: Rectangle,
        layout: SheetLayout,
        classifier: SwipeClassifier,
        banner_frames: u32,
    ) -> Self {
        let banner_bounds = Rectangle::new(
            Point::new(
                bounds.top_left.x,
                bounds.top_left.y + bounds.size.height as i32 - BANNER_HEIGHT_PX as i32,
            ),
            Size::new(bounds.size.width, BANNER_HEIGHT_PX),
        );

        Self {
            bounds,
            layout,
            state: PageState::new(),
            tracker: FetchTracker::new(),
            series: ChartSeries::default(),
            shown: None,
            mode: DisplayMode::default(),
            swipe: SwipeTracker::new(classifier),
            banner: ErrorBanner::new(banner_bounds, banner_frames),
            dirty: true,
        }
    }

    /// Palette hint carried over from the status page
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn current_page(&self) -> PageIndex {
        self.state.current()
    }

    pub fn shown_page(&self) -> Option<PageIndex> {
        self.shown
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    /// Apply a navigation request; returns a fetch if the page changed
    pub fn navigate(&mut self, navigation: Navigation) -> Option<Action> {
        let next = self.state.apply(navigation);
        if next == self.state {
            return None;
        }
        info!("Chart page {} -> {}", self.state.current(), next.current());
        self.state = next;
        Some(self.request_current())
    }

    fn request_current(&mut self) -> Action {
        let ticket = self.tracker.issue(FetchTarget::Page(self.state.current()));
        self.dirty = true;
        Action::Fetch(ticket)
    }

    fn apply_rows(&mut self, page: PageIndex, rows: &[Reading]) {
        self.series = ChartSeries::build(rows);
        self.shown = Some(page);
        self.banner.dismiss();
    }

    fn is_back_tap(&self, point: TouchPoint) -> bool {
        Rectangle::new(
            self.bounds.top_left,
            Size::new(BACK_BUTTON_WIDTH_PX, HEADER_HEIGHT_PX),
        )
        .contains(point.to_point())
    }

    fn chart_area(&self) -> Rectangle {
        let top = HEADER_HEIGHT_PX + LEGEND_HEIGHT_PX;
        Rectangle::new(
            self.bounds.top_left + Point::new(0, top as i32),
            Size::new(
                self.bounds.size.width,
                self.bounds
                    .size
                    .height
                    .saturating_sub(top + BANNER_HEIGHT_PX),
            ),
        )
    }

    fn draw_header<D: DrawTarget<Color = Rgb565>>(
        &self,
        palette: &ModePalette,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let header = Rectangle::new(
            self.bounds.top_left,
            Size::new(self.bounds.size.width, HEADER_HEIGHT_PX),
        );
        let inset = Rectangle::new(
            header.top_left + Point::new(EDGE_INSET_PX, 0),
            Size::new(
                header.size.width.saturating_sub(2 * EDGE_INSET_PX as u32),
                header.size.height,
            ),
        );

        Text::new(
            "< Back",
            Point::zero(),
            MonoTextStyle::new(&FONT_10X20, palette.accent),
        )
        .align_to(&inset, horizontal::Left, vertical::Center)
        .draw(display)?;

        let title = self.header_title();
        Text::new(
            &title,
            Point::zero(),
            MonoTextStyle::new(&FONT_10X20, palette.text_primary),
        )
        .align_to(&header, horizontal::Center, vertical::Center)
        .draw(display)?;

        let rows = self.layout.page_rows(self.state.current());
        let mut range: String<HEADER_TEXT_LENGTH> = String::new();
        let _ = write!(range, "rows {}-{}", rows.start, rows.end);
        Text::new(
            &range,
            Point::zero(),
            MonoTextStyle::new(&FONT_6X10, palette.text_secondary),
        )
        .align_to(&inset, horizontal::Right, vertical::Center)
        .draw(display)?;

        Ok(())
    }

    fn draw_legend<D: DrawTarget<Color = Rgb565>>(
        &self,
        palette: &ModePalette,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let y = self.bounds.top_left.y + (HEADER_HEIGHT_PX + LEGEND_HEIGHT_PX / 2) as i32;
        let swatch = Size::new(LEGEND_SWATCH_PX, LEGEND_SWATCH_PX);
        let half = LEGEND_SWATCH_PX as i32 / 2;
        let label_style = MonoTextStyle::new(&FONT_6X10, palette.text_secondary);
        let left_x = self.bounds.top_left.x + EDGE_INSET_PX;
        let right_x = self.bounds.top_left.x + self.bounds.size.width as i32 - EDGE_INSET_PX;

        Rectangle::new(Point::new(left_x, y - half), swatch)
            .into_styled(PrimitiveStyle::with_fill(COLOR_TEMPERATURE))
            .draw(display)?;
        Text::with_text_style(
            "Temperature (C)",
            Point::new(left_x + LEGEND_SWATCH_PX as i32 + 4, y),
            label_style,
            TextStyleBuilder::new()
                .alignment(Alignment::Left)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(display)?;

        Rectangle::new(Point::new(right_x - LEGEND_SWATCH_PX as i32, y - half), swatch)
            .into_styled(PrimitiveStyle::with_fill(COLOR_HUMIDITY))
            .draw(display)?;
        Text::with_text_style(
            "Humidity (%)",
            Point::new(right_x - LEGEND_SWATCH_PX as i32 - 4, y),
            label_style,
            TextStyleBuilder::new()
                .alignment(Alignment::Right)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(display)?;

        Ok(())
    }

    /// Temperature on the left axis, humidity on the right
    fn series_lines(&self) -> [ChartLine<'_>; 2] {
        [
            ChartLine::new(self.series.temperature(), AxisSide::Left, COLOR_TEMPERATURE)
                .with_width(SERIES_LINE_WIDTH_PX),
            ChartLine::new(self.series.humidity(), AxisSide::Right, COLOR_HUMIDITY)
                .with_width(SERIES_LINE_WIDTH_PX),
        ]
    }

    /// Header caption for the page the state points at
    fn header_title(&self) -> String<HEADER_TEXT_LENGTH> {
        let current = self.state.current();
        let mut title = String::new();
        let _ = if self.tracker.is_pending() {
            write!(title, "Loading page {}", current)
        } else if self.shown == Some(current) {
            write!(title, "Page {}", current)
        } else {
            write!(title, "Page {} unavailable", current)
        };
        title
    }

    fn build_chart<'a>(
        &'a self,
        labels: &'a dyn Fn(u32) -> &'a str,
    ) -> Result<LineChart<'a>, ChartError> {
        let mut chart = LineChart::new(self.chart_area())
            .with_x_domain(self.series.x_len() as u32)
            .with_x_labels(labels);

        for line in self.series_lines() {
            chart.add_line(line)?;
        }

        if let Some(range) = self.series.temperature_axis() {
            chart.set_axis_range(AxisSide::Left, range)?;
        }
        if let Some(range) = self.series.humidity_axis() {
            chart.set_axis_range(AxisSide::Right, range)?;
        }
        Ok(chart)
    }

    fn draw_placeholder<D: DrawTarget<Color = Rgb565>>(
        &self,
        palette: &ModePalette,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let message = if self.tracker.is_pending() {
            "Loading..."
        } else {
            "No readings"
        };
        Text::new(
            message,
            Point::zero(),
            MonoTextStyle::new(&FONT_10X20, palette.text_primary),
        )
        .align_to(&self.chart_area(), horizontal::Center, vertical::Center)
        .draw(display)?;
        Ok(())
    }
}

impl Page for ChartPage {
    fn id(&self) -> PageId {
        PageId::Chart
    }

    fn title(&self) -> &str {
        "History"
    }

    /// Every visit starts again from the newest page
    fn on_activate(&mut self) -> Option<Action> {
        self.state = PageState::new();
        self.series = ChartSeries::default();
        self.shown = None;
        self.banner.dismiss();
        Some(self.request_current())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self.swipe.track(event)? {
            Gesture::Tap(point) => {
                if self.banner.is_visible() && self.banner.contains_point(point) {
                    self.banner.dismiss();
                    self.dirty = true;
                    None
                } else if self.is_back_tap(point) {
                    Some(Action::GoBack)
                } else {
                    None
                }
            }
            Gesture::Fling(fling) => {
                let navigation = self.swipe.classifier().classify(&fling);
                self.navigate(navigation)
            }
        }
    }

    fn update(&mut self) {
        if self.banner.tick() {
            self.dirty = true;
        }
    }

    fn on_event(&mut self, event: &PageEvent) -> bool {
        let PageEvent::FetchCompleted(outcome) = event;
        let FetchTarget::Page(page) = outcome.ticket.target else {
            return false;
        };

        match self.tracker.accept(outcome) {
            Some(Ok(rows)) => self.apply_rows(page, rows),
            Some(Err(e)) => self.banner.show(e),
            None => return false,
        }
        self.dirty = true;
        true
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let palette = ModePalette::for_mode(self.mode);

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(palette.background))
            .draw(display)?;

        self.draw_header(&palette, display)?;
        self.draw_legend(&palette, display)?;

        let labels = |x: u32| self.series.label_at(x);
        match self.build_chart(&labels) {
            Ok(chart) => chart.draw(display)?,
            Err(e) => error!("Chart setup failed: {}", e),
        }

        if self.series.is_empty() {
            self.draw_placeholder(&palette, display)?;
        }

        self.banner.draw(display)?;
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchOutcome, FetchTicket};
    use crate::framebuffer::FrameBuffer;
    use crate::reading::Centi;
    use crate::sheets::{FetchError, RowDefect};
    use alloc::format;
    use alloc::vec::Vec;

    fn page() -> ChartPage {
        ChartPage::new(
            Rectangle::new(Point::zero(), Size::new(320, 240)),
            SheetLayout::default(),
            SwipeClassifier::default(),
            60,
        )
    }

    fn ticket_of(action: Option<Action>) -> FetchTicket {
        match action {
            Some(Action::Fetch(ticket)) => ticket,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    fn rows(count: usize) -> Vec<Reading> {
        (0..count)
            .map(|i| {
                Reading::new(
                    format!("2021-03-04 {:02}:{:02}:00", 23 - i / 60, 59 - i % 60),
                    Centi::from_hundredths(2100 + (i as i32 % 7) * 30),
                    Centi::from_hundredths(4200 + (i as i32 % 5) * 80),
                )
            })
            .collect()
    }

    fn completed(ticket: FetchTicket, count: usize) -> PageEvent {
        PageEvent::FetchCompleted(FetchOutcome {
            ticket,
            result: Ok(rows(count)),
        })
    }

    fn swipe(page: &mut ChartPage, from_x: u16, to_x: u16) -> Option<Action> {
        page.handle_touch(TouchEvent::Press(TouchPoint::new(from_x, 120)));
        page.handle_touch(TouchEvent::Drag(TouchPoint::new(to_x, 122)));
        page.handle_touch(TouchEvent::Release(TouchPoint::new(to_x, 125)))
    }

    fn tap(page: &mut ChartPage, x: u16, y: u16) -> Option<Action> {
        page.handle_touch(TouchEvent::Press(TouchPoint::new(x, y)));
        page.handle_touch(TouchEvent::Release(TouchPoint::new(x, y)))
    }

    #[test]
    fn test_activation_fetches_newest_page() {
        let mut page = page();
        let ticket = ticket_of(page.on_activate());
        assert_eq!(ticket.target, FetchTarget::Page(PageIndex::NEWEST));
    }

    #[test]
    fn test_successful_fetch_builds_series() {
        let mut page = page();
        let ticket = ticket_of(page.on_activate());

        assert!(page.on_event(&completed(ticket, 50)));
        assert_eq!(page.series().temperature().len(), 25);
        assert_eq!(page.shown_page(), Some(PageIndex::NEWEST));
    }

    #[test]
    fn test_swipe_left_fetches_older_page() {
        let mut page = page();
        page.on_activate();

        let ticket = ticket_of(swipe(&mut page, 280, 60));
        assert_eq!(ticket.target, FetchTarget::Page(PageIndex::new(1)));
        assert_eq!(page.current_page(), PageIndex::new(1));
    }

    #[test]
    fn test_swipe_right_on_newest_page_is_noop() {
        let mut page = page();
        page.on_activate();
        assert_eq!(swipe(&mut page, 60, 280), None);
        assert_eq!(page.current_page(), PageIndex::NEWEST);
    }

    #[test]
    fn test_short_swipe_ignored() {
        let mut page = page();
        page.on_activate();
        assert_eq!(swipe(&mut page, 200, 150), None);
    }

    #[test]
    fn test_rapid_swipes_keep_only_latest_result() {
        let mut page = page();
        let first = ticket_of(page.on_activate());
        let second = ticket_of(swipe(&mut page, 280, 60));
        let third = ticket_of(swipe(&mut page, 280, 60));

        // Older requests finish late and must not overwrite the chart
        assert!(page.on_event(&completed(third, 10)));
        assert!(!page.on_event(&completed(first, 50)));
        assert!(!page.on_event(&completed(second, 50)));

        assert_eq!(page.shown_page(), Some(PageIndex::new(2)));
        assert_eq!(page.series().x_len(), 10);
    }

    #[test]
    fn test_status_outcome_not_consumed() {
        let mut page = page();
        page.on_activate();
        let event = PageEvent::FetchCompleted(FetchOutcome {
            ticket: FetchTicket {
                target: FetchTarget::Latest,
                generation: 1,
            },
            result: Ok(rows(1)),
        });
        assert!(!page.on_event(&event));
    }

    #[test]
    fn test_malformed_rows_keep_previous_series() {
        let mut page = page();
        let first = ticket_of(page.on_activate());
        page.on_event(&completed(first, 20));
        let before = page.series().clone();

        let next = ticket_of(swipe(&mut page, 280, 60));
        let failed = PageEvent::FetchCompleted(FetchOutcome {
            ticket: next,
            result: Err(FetchError::MalformedRow {
                row: 60,
                defect: RowDefect::CellCount { found: 2 },
            }),
        });
        assert!(page.on_event(&failed));

        assert_eq!(page.series(), &before);
        assert_eq!(page.shown_page(), Some(PageIndex::NEWEST));
        assert_eq!(
            page.banner().message(),
            Some("Malformed row 60: expected 3 cells, found 2")
        );
    }

    #[test]
    fn test_header_names_failed_page() {
        let mut page = page();
        let first = ticket_of(page.on_activate());
        assert_eq!(page.header_title().as_str(), "Loading page 0");

        page.on_event(&completed(first, 20));
        assert_eq!(page.header_title().as_str(), "Page 0");

        let next = ticket_of(swipe(&mut page, 280, 60));
        let failed = PageEvent::FetchCompleted(FetchOutcome {
            ticket: next,
            result: Err(FetchError::NoData),
        });
        page.on_event(&failed);

        // Series from page 0 stays up, the header names the page the swipe reached
        assert_eq!(page.shown_page(), Some(PageIndex::NEWEST));
        assert_eq!(page.header_title().as_str(), "Page 1 unavailable");
    }

    #[test]
    fn test_series_share_line_width() {
        let mut page = page();
        let ticket = ticket_of(page.on_activate());
        page.on_event(&completed(ticket, 10));

        let [temperature, humidity] = page.series_lines();
        assert_eq!(temperature.width, humidity.width);
        assert_eq!(temperature.axis, AxisSide::Left);
        assert_eq!(humidity.axis, AxisSide::Right);
    }

    #[test]
    fn test_back_tap() {
        let mut page = page();
        page.on_activate();
        assert_eq!(tap(&mut page, 10, 10), Some(Action::GoBack));
        assert_eq!(tap(&mut page, 160, 120), None);
    }

    #[test]
    fn test_short_drag_over_back_button_is_ignored() {
        let mut page = page();
        page.on_activate();

        page.handle_touch(TouchEvent::Press(TouchPoint::new(80, 15)));
        page.handle_touch(TouchEvent::Drag(TouchPoint::new(55, 15)));
        assert_eq!(
            page.handle_touch(TouchEvent::Release(TouchPoint::new(30, 15))),
            None
        );
        assert_eq!(page.current_page(), PageIndex::NEWEST);
    }

    #[test]
    fn test_reactivation_starts_from_newest() {
        let mut page = page();
        page.on_activate();
        swipe(&mut page, 280, 60);
        swipe(&mut page, 280, 60);
        page.on_deactivate();

        let ticket = ticket_of(page.on_activate());
        assert_eq!(ticket.target, FetchTarget::Page(PageIndex::NEWEST));
        assert!(page.series().is_empty());
    }

    #[test]
    fn test_draw_with_data() {
        let mut page = page();
        page.set_mode(DisplayMode::Warm);
        let ticket = ticket_of(page.on_activate());
        page.on_event(&completed(ticket, 50));

        let mut fb = FrameBuffer::new(Size::new(320, 240));
        page.draw_page(&mut fb).unwrap();

        assert!(fb.count_color(ModePalette::WARM.background) > 0);
        // Both legend swatches plus the plotted lines
        assert!(fb.count_color(COLOR_TEMPERATURE) > 64 + 100);
        assert!(fb.count_color(COLOR_HUMIDITY) > 64 + 50);
    }

    #[test]
    fn test_draw_empty_page() {
        let mut page = page();
        let ticket = ticket_of(page.on_activate());
        page.on_event(&completed(ticket, 0));

        let mut fb = FrameBuffer::new(Size::new(320, 240));
        page.draw_page(&mut fb).unwrap();

        // Only the legend swatches carry the series colors
        let swatch = (LEGEND_SWATCH_PX * LEGEND_SWATCH_PX) as usize;
        assert_eq!(fb.count_color(COLOR_TEMPERATURE), swatch);
        assert_eq!(fb.count_color(COLOR_HUMIDITY), swatch);
    }
}
