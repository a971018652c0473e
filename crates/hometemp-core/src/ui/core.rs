//! Core UI types shared by pages and the host loop

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::fetch::{FetchOutcome, FetchTicket};
use crate::reading::Centi;

/// Temperature above which the warm palette is used
pub const WARM_THRESHOLD: Centi = Centi::from_units(23);

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Touch events delivered to the active page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// Pointer went down
    Press(TouchPoint),
    /// Pointer moved while down
    Drag(TouchPoint),
    /// Pointer lifted
    Release(TouchPoint),
}

/// Actions that pages can request from the page manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Open the chart screen with the status screen's palette hint
    OpenChart(DisplayMode),
    /// Go back to previous page
    GoBack,
    /// Run a fetch off the UI thread and post its outcome to the mailbox
    Fetch(FetchTicket),
}

/// Page identifier for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Status,
    Chart,
}

/// Accent selection derived from the latest temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    Warm,
    #[default]
    Cool,
}

impl DisplayMode {
    /// `Warm` strictly above 23.00, `Cool` otherwise
    pub fn for_temperature(temperature: Centi) -> Self {
        if temperature > WARM_THRESHOLD {
            DisplayMode::Warm
        } else {
            DisplayMode::Cool
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Warm => "WARM",
            DisplayMode::Cool => "COOL",
        }
    }
}

/// Events routed to pages by the page manager
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A background fetch finished
    FetchCompleted(FetchOutcome),
}

/// A self-contained piece of UI that renders into a bounded area
pub trait Drawable {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;

    fn bounds(&self) -> Rectangle;

    /// Whether `point` falls inside this element
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds().contains(point.to_point())
    }
}
