//! Glue between the page manager, the fetch dispatcher and the mailbox

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use hometemp_core::config::Config;
use hometemp_core::fetch::{FetchReceiver, FetchTicket};
use hometemp_core::framebuffer::FrameBuffer;
use hometemp_core::gesture::SwipeClassifier;
use hometemp_core::pages::{ChartPage, PageManager, PageWrapper, StatusPage};
use hometemp_core::ui::{
    Action, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, PageEvent, PageId, TouchEvent, TouchPoint,
};
use log::debug;

use crate::dispatcher::FetchDispatcher;

/// Full-screen bounding rectangle.
pub fn screen_bounds() -> Rectangle {
    Rectangle::new(
        Point::zero(),
        Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32),
    )
}

/// Status and chart pages wired into a manager, starting on status
pub fn build_manager(config: &Config) -> PageManager {
    let bounds = screen_bounds();
    let classifier = SwipeClassifier::new(config.gesture);
    let banner_frames = config.ui.error_banner_frames;

    let mut manager = PageManager::new(PageId::Status, bounds);
    manager.register_page(PageWrapper::Status(Box::new(StatusPage::new(
        bounds,
        classifier,
        banner_frames,
    ))));
    manager.register_page(PageWrapper::Chart(Box::new(ChartPage::new(
        bounds,
        config.sheet.layout,
        classifier,
        banner_frames,
    ))));
    manager
}

pub struct App {
    manager: PageManager,
    dispatcher: FetchDispatcher,
    outcomes: FetchReceiver,
}

impl App {
    pub fn new(manager: PageManager, dispatcher: FetchDispatcher, outcomes: FetchReceiver) -> Self {
        Self {
            manager,
            dispatcher,
            outcomes,
        }
    }

    /// Activate the first page
    pub fn start(&mut self) {
        let ticket = self.manager.start();
        self.dispatch(ticket);
    }

    pub fn touch(&mut self, event: TouchEvent) {
        let ticket = self.manager.handle_touch(event);
        self.dispatch(ticket);
    }

    /// A press and release from `from` to `to`
    pub fn swipe(&mut self, from: TouchPoint, to: TouchPoint) {
        self.touch(TouchEvent::Press(from));
        self.touch(TouchEvent::Drag(to));
        self.touch(TouchEvent::Release(to));
    }

    pub fn act(&mut self, action: Action) {
        let ticket = self.manager.handle_action(action);
        self.dispatch(ticket);
    }

    fn dispatch(&mut self, ticket: Option<FetchTicket>) {
        if let Some(ticket) = ticket {
            self.dispatcher.dispatch(ticket);
        }
    }

    /// Hand every waiting fetch outcome to its page
    pub fn drain_outcomes(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(outcome) = self.outcomes.try_receive() {
            let event = PageEvent::FetchCompleted(outcome);
            if self.manager.dispatch_event(&event) {
                debug!("Current page changed by fetch outcome");
            }
            drained += 1;
        }
        drained
    }

    /// One UI frame: apply outcomes, tick the page, redraw if needed
    pub fn frame(&mut self, framebuffer: &mut FrameBuffer) -> bool {
        self.drain_outcomes();
        self.manager.update();
        match self.manager.draw_dirty(framebuffer) {
            Ok(drawn) => drawn,
            Err(e) => match e {},
        }
    }

    /// No fetch running and nothing left in the mailbox
    pub fn is_settled(&mut self) -> bool {
        let busy = self.dispatcher.is_busy();
        self.drain_outcomes();
        !busy
    }

    pub fn current_page(&self) -> PageId {
        self.manager.current_page_id()
    }

    pub fn display_size(&self) -> Size {
        self.manager.display_bounds().size
    }

    pub fn shutdown(&mut self) {
        self.dispatcher.shutdown();
    }
}

/// A left swipe across the middle of the screen
pub fn next_page_swipe() -> (TouchPoint, TouchPoint) {
    let y = DISPLAY_HEIGHT_PX / 2;
    (
        TouchPoint::new(DISPLAY_WIDTH_PX - 40, y),
        TouchPoint::new(40, y),
    )
}

/// A right swipe across the middle of the screen
pub fn previous_page_swipe() -> (TouchPoint, TouchPoint) {
    let (from, to) = next_page_swipe();
    (to, from)
}
