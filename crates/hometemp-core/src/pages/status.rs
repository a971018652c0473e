//! Status page
//!
//! Shows the newest reading and picks the warm or cool palette from it.
//! A tap opens the chart page with that palette; pulling down refreshes.

use core::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{
    MonoTextStyle,
    ascii::{FONT_6X10, FONT_10X20},
};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use embedded_layout::layout::linear::{LinearLayout, spacing::FixedMargin};
use embedded_layout::prelude::*;
use heapless::String;
use log::info;

use crate::fetch::{FetchTarget, FetchTracker};
use crate::gesture::{Gesture, SwipeClassifier, SwipeTracker};
use crate::pages::page::Page;
use crate::reading::Reading;
use crate::sheets::FetchError;
use crate::ui::components::ErrorBanner;
use crate::ui::core::{Action, DisplayMode, Drawable, PageEvent, PageId, TouchEvent};
use crate::ui::styling::{FONT_10X20_CHAR_HEIGHT_PX, ModePalette};

use super::constants::{BANNER_HEIGHT_PX, HEADER_HEIGHT_PX};

/// Gap between the lines of the reading card in pixels
const CARD_LINE_GAP_PX: u32 = 6;

/// Capacity of formatted value lines
const VALUE_TEXT_LENGTH: usize = 24;

pub struct StatusPage {
    bounds: Rectangle,
    latest: Option<Reading>,
    mode: DisplayMode,
    tracker: FetchTracker,
    swipe: SwipeTracker,
    banner: ErrorBanner,
    dirty: bool,
}

impl StatusPage {
    pub fn new(bounds: Rectangle, classifier: SwipeClassifier, banner_frames: u32) -> Self {
        let banner_bounds = Rectangle::new(
            Point::new(
                bounds.top_left.x,
                bounds.top_left.y + bounds.size.height as i32 - BANNER_HEIGHT_PX as i32,
            ),
            Size::new(bounds.size.width, BANNER_HEIGHT_PX),
        );

        Self {
            bounds,
            latest: None,
            mode: DisplayMode::default(),
            tracker: FetchTracker::new(),
            swipe: SwipeTracker::new(classifier),
            banner: ErrorBanner::new(banner_bounds, banner_frames),
            dirty: true,
        }
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    /// Request the newest reading
    pub fn refresh(&mut self) -> Action {
        let ticket = self.tracker.issue(FetchTarget::Latest);
        info!("Refreshing latest reading ({:?})", ticket);
        self.dirty = true;
        Action::Fetch(ticket)
    }

    fn apply_latest(&mut self, rows: &[Reading]) {
        match rows.first() {
            Some(reading) => {
                self.mode = DisplayMode::for_temperature(reading.temperature());
                self.latest = Some(reading.clone());
                self.banner.dismiss();
            }
            None => self.banner.show(&FetchError::NoData),
        }
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
        Text::new(
            "Current Conditions",
            Point::zero(),
            MonoTextStyle::new(&FONT_10X20, palette.accent),
        )
        .align_to(&header, horizontal::Center, vertical::Center)
        .draw(display)?;
        Ok(())
    }

    fn draw_card<D: DrawTarget<Color = Rgb565>>(
        &self,
        palette: &ModePalette,
        body: Rectangle,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let large = MonoTextStyle::new(&FONT_10X20, palette.text_primary);
        let small = MonoTextStyle::new(&FONT_6X10, palette.text_secondary);

        let Some(reading) = &self.latest else {
            let message = if self.tracker.is_pending() {
                "Loading..."
            } else {
                "No reading"
            };
            Text::new(message, Point::zero(), large)
                .align_to(&body, horizontal::Center, vertical::Center)
                .draw(display)?;
            return Ok(());
        };

        let mut temperature: String<VALUE_TEXT_LENGTH> = String::new();
        let _ = write!(temperature, "{} C", reading.temperature());
        let mut humidity: String<VALUE_TEXT_LENGTH> = String::new();
        let _ = write!(humidity, "{} %RH", reading.humidity());

        LinearLayout::vertical(
            Chain::new(Text::new(&temperature, Point::zero(), large))
                .append(Text::new(&humidity, Point::zero(), large))
                .append(Text::new(
                    self.mode.label(),
                    Point::zero(),
                    MonoTextStyle::new(&FONT_10X20, palette.accent),
                ))
                .append(Text::new(reading.timestamp(), Point::zero(), small)),
        )
        .with_alignment(horizontal::Center)
        .with_spacing(FixedMargin(CARD_LINE_GAP_PX as i32))
        .arrange()
        .align_to(&body, horizontal::Center, vertical::Center)
        .draw(display)?;

        Ok(())
    }

    fn draw_hint<D: DrawTarget<Color = Rgb565>>(
        &self,
        palette: &ModePalette,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let hint_area = Rectangle::new(
            Point::new(
                self.bounds.top_left.x,
                self.bounds.top_left.y + self.bounds.size.height as i32
                    - (BANNER_HEIGHT_PX + FONT_10X20_CHAR_HEIGHT_PX) as i32,
            ),
            Size::new(self.bounds.size.width, FONT_10X20_CHAR_HEIGHT_PX),
        );
        Text::new(
            "Tap for history - pull down to refresh",
            Point::zero(),
            MonoTextStyle::new(&FONT_6X10, palette.text_secondary),
        )
        .align_to(&hint_area, horizontal::Center, vertical::Center)
        .draw(display)?;
        Ok(())
    }
}

impl Page for StatusPage {
    fn id(&self) -> PageId {
        PageId::Status
    }

    fn title(&self) -> &str {
        "Status"
    }

    fn on_activate(&mut self) -> Option<Action> {
        self.dirty = true;
        if self.latest.is_none() && !self.tracker.is_pending() {
            Some(self.refresh())
        } else {
            None
        }
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self.swipe.track(event)? {
            Gesture::Tap(point) => {
                if self.banner.is_visible() && self.banner.contains_point(point) {
                    self.banner.dismiss();
                    self.dirty = true;
                    return None;
                }
                info!("Opening chart ({:?})", self.mode);
                Some(Action::OpenChart(self.mode))
            }
            Gesture::Fling(fling) => {
                if self.swipe.classifier().is_pull_down(&fling) {
                    Some(self.refresh())
                } else {
                    None
                }
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
        if outcome.ticket.target != FetchTarget::Latest {
            return false;
        }

        match self.tracker.accept(outcome) {
            Some(Ok(rows)) => self.apply_latest(rows),
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

        let body = Rectangle::new(
            self.bounds.top_left + Point::new(0, HEADER_HEIGHT_PX as i32),
            Size::new(
                self.bounds.size.width,
                self.bounds
                    .size
                    .height
                    .saturating_sub(HEADER_HEIGHT_PX + BANNER_HEIGHT_PX + FONT_10X20_CHAR_HEIGHT_PX),
            ),
        );
        self.draw_card(&palette, body, display)?;
        self.draw_hint(&palette, display)?;
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
