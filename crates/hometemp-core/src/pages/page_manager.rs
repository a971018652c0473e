//! Page manager with navigation and event dispatching.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use log::{debug, info};

use crate::fetch::{FetchTarget, FetchTicket};
use crate::pages::page::{Page, PageWrapper};
use crate::ui::core::{Action, PageEvent, PageId, TouchEvent};

/// Page that consumes outcomes for `target`
pub fn owner_of(target: FetchTarget) -> PageId {
    match target {
        FetchTarget::Latest => PageId::Status,
        FetchTarget::Page(_) => PageId::Chart,
    }
}

/// Manages page navigation, rendering, and event dispatching.
///
/// Methods that can activate a page return the fetch it asked for, if any;
/// the host is responsible for running it.
pub struct PageManager {
    pages: Vec<PageWrapper, 4>,
    current_page: PageId,
    navigation_stack: Vec<PageId, 8>,
    display_bounds: Rectangle,
}

impl PageManager {
    pub fn new(initial_page: PageId, display_bounds: Rectangle) -> Self {
        Self {
            pages: Vec::new(),
            current_page: initial_page,
            navigation_stack: Vec::new(),
            display_bounds,
        }
    }

    /// Register a new page
    pub fn register_page(&mut self, page: PageWrapper) {
        if self.pages.push(page).is_err() {
            log::warn!("Page registry full, page dropped");
        }
    }

    /// Activate the initial page
    pub fn start(&mut self) -> Option<FetchTicket> {
        let action = self.get_current_page_mut()?.on_activate();
        action.and_then(|a| self.handle_action(a))
    }

    /// Navigate to a specific page
    pub fn navigate_to(&mut self, page_id: PageId) -> Option<FetchTicket> {
        if page_id == self.current_page {
            return None;
        }
        if let Some(current) = self.get_current_page_mut() {
            current.on_deactivate();
        }

        if self.navigation_stack.push(self.current_page).is_err() {
            debug!("Navigation stack full, dropping back entry");
        }
        self.current_page = page_id;
        self.activate_current()
    }

    /// Go back to previous page
    pub fn go_back(&mut self) -> Option<FetchTicket> {
        let prev_page = self.navigation_stack.pop()?;
        if let Some(current) = self.get_current_page_mut() {
            current.on_deactivate();
        }
        self.current_page = prev_page;
        self.activate_current()
    }

    fn activate_current(&mut self) -> Option<FetchTicket> {
        let page = self.get_current_page_mut()?;
        info!("Showing {} page", page.title());
        page.mark_dirty();
        let action = page.on_activate();
        action.and_then(|a| self.handle_action(a))
    }

    /// Carry out a page's action
    pub fn handle_action(&mut self, action: Action) -> Option<FetchTicket> {
        debug!("Handling action {:?}", action);
        match action {
            Action::OpenChart(mode) => {
                for page in self.pages.iter_mut() {
                    if let PageWrapper::Chart(chart) = page {
                        chart.set_mode(mode);
                    }
                }
                self.navigate_to(PageId::Chart)
            }
            Action::GoBack => self.go_back(),
            Action::Fetch(ticket) => Some(ticket),
        }
    }

    fn get_current_page_mut(&mut self) -> Option<&mut PageWrapper> {
        self.pages.iter_mut().find(|p| p.id() == self.current_page)
    }

    fn get_current_page(&self) -> Option<&PageWrapper> {
        self.pages.iter().find(|p| p.id() == self.current_page)
    }

    /// Handle touch events, returns a fetch to run if any
    pub fn handle_touch(&mut self, event: TouchEvent) -> Option<FetchTicket> {
        let action = self.get_current_page_mut()?.handle_touch(event);
        if action.is_some() {
            debug!("Touch {:?} -> {:?}", event, action);
        }
        action.and_then(|a| self.handle_action(a))
    }

    /// Route an event to the page that owns it.
    ///
    /// Fetch outcomes go to the page that requested them even if it is not
    /// on screen. Returns `true` if the current page needs a redraw.
    pub fn dispatch_event(&mut self, event: &PageEvent) -> bool {
        let PageEvent::FetchCompleted(outcome) = event;
        let owner = owner_of(outcome.ticket.target);
        debug!("Dispatching {:?} to {:?}", outcome.ticket, owner);

        let Some(page) = self.pages.iter_mut().find(|p| p.id() == owner) else {
            debug!("No page registered for {:?}", owner);
            return false;
        };
        page.on_event(event) && owner == self.current_page
    }

    /// Update current page state
    pub fn update(&mut self) {
        if let Some(page) = self.get_current_page_mut() {
            page.update();
        }
    }

    /// Draw the current page if it changed. Returns whether anything was drawn.
    pub fn draw_dirty<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<bool, D::Error> {
        match self.get_current_page_mut() {
            Some(page) if page.is_dirty() => {
                page.draw_page(display)?;
                page.mark_clean();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Check if current page is dirty
    pub fn is_dirty(&self) -> bool {
        self.get_current_page().is_some_and(|p| p.is_dirty())
    }

    pub fn current_page_id(&self) -> PageId {
        self.current_page
    }

    pub fn display_bounds(&self) -> Rectangle {
        self.display_bounds
    }
}
