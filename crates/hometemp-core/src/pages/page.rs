//! Page abstraction and the enum wrapper the page manager stores.
//!
//! [`PageWrapper`] delegates every [`Page`] method to the concrete page so
//! the [`PageManager`](super::page_manager::PageManager) can hold both
//! screens without trait objects.

use alloc::boxed::Box;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::core::{Action, PageEvent, PageId, TouchEvent};

use super::chart::ChartPage;
use super::status::StatusPage;

/// Trait that all navigable UI pages must implement.
///
/// The page manager calls these methods in a fixed order each frame:
///
/// 1. **`on_activate`** once, when the page becomes active. The returned
///    action (usually a fetch) is carried out by the manager.
/// 2. **`on_event`** for every event routed to the page.
/// 3. **`update`** once per frame.
/// 4. **`handle_touch`** for touch events while active.
/// 5. **`draw_page`** when `is_dirty()` is true.
/// 6. **`on_deactivate`** once, when navigating away.
///
/// Pages never block; anything slow is requested through [`Action::Fetch`].
pub trait Page {
    fn id(&self) -> PageId;

    fn title(&self) -> &str;

    fn on_activate(&mut self) -> Option<Action> {
        None
    }

    fn on_deactivate(&mut self) {}

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action>;

    fn update(&mut self);

    /// Returns `true` if the event changed what the page shows.
    ///
    /// Events may arrive while the page is inactive.
    fn on_event(&mut self, _event: &PageEvent) -> bool {
        false
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(&mut self, display: &mut D)
    -> Result<(), D::Error>;

    fn bounds(&self) -> Rectangle;

    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);

    fn mark_dirty(&mut self);
}

/// One of the application's screens
pub enum PageWrapper {
    Status(Box<StatusPage>),
    Chart(Box<ChartPage>),
}

impl Page for PageWrapper {
    fn id(&self) -> PageId {
        match self {
            PageWrapper::Status(page) => page.id(),
            PageWrapper::Chart(page) => page.id(),
        }
    }

    fn title(&self) -> &str {
        match self {
            PageWrapper::Status(page) => page.title(),
            PageWrapper::Chart(page) => page.title(),
        }
    }

    fn on_activate(&mut self) -> Option<Action> {
        match self {
            PageWrapper::Status(page) => page.on_activate(),
            PageWrapper::Chart(page) => page.on_activate(),
        }
    }

    fn on_deactivate(&mut self) {
        match self {
            PageWrapper::Status(page) => page.on_deactivate(),
            PageWrapper::Chart(page) => page.on_deactivate(),
        }
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self {
            PageWrapper::Status(page) => page.handle_touch(event),
            PageWrapper::Chart(page) => page.handle_touch(event),
        }
    }

    fn update(&mut self) {
        match self {
            PageWrapper::Status(page) => page.update(),
            PageWrapper::Chart(page) => page.update(),
        }
    }

    fn on_event(&mut self, event: &PageEvent) -> bool {
        match self {
            PageWrapper::Status(page) => page.on_event(event),
            PageWrapper::Chart(page) => page.on_event(event),
        }
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        match self {
            PageWrapper::Status(page) => page.draw_page(display),
            PageWrapper::Chart(page) => page.draw_page(display),
        }
    }

    fn bounds(&self) -> Rectangle {
        match self {
            PageWrapper::Status(page) => Page::bounds(page.as_ref()),
            PageWrapper::Chart(page) => Page::bounds(page.as_ref()),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            PageWrapper::Status(page) => page.is_dirty(),
            PageWrapper::Chart(page) => page.is_dirty(),
        }
    }

    fn mark_clean(&mut self) {
        match self {
            PageWrapper::Status(page) => page.mark_clean(),
            PageWrapper::Chart(page) => page.mark_clean(),
        }
    }

    fn mark_dirty(&mut self) {
        match self {
            PageWrapper::Status(page) => page.mark_dirty(),
            PageWrapper::Chart(page) => page.mark_dirty(),
        }
    }
}
