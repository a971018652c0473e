//! Fetch coordination between the UI thread and background fetch tasks
//!
//! Pages never perform I/O. They issue a [`FetchTicket`] through
//! [`Action::Fetch`](crate::ui::Action::Fetch); the host runs the gateway for
//! that ticket off the UI thread and posts a [`FetchOutcome`] to
//! [`FETCH_MAILBOX`]. The UI loop drains the mailbox once per frame and hands
//! each outcome to the page owning its target, whose [`FetchTracker`] drops
//! anything but the most recently issued ticket.

use alloc::vec::Vec;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use log::debug;

use crate::paging::PageIndex;
use crate::reading::Reading;
use crate::sheets::FetchError;

/// Number of outcomes that may wait for the UI loop
pub const FETCH_MAILBOX_CAPACITY: usize = 8;

/// Mailbox carrying fetch outcomes back to the UI thread
pub type FetchMailbox = Channel<CriticalSectionRawMutex, FetchOutcome, FETCH_MAILBOX_CAPACITY>;

/// Sending half of a [`FetchMailbox`]
pub type FetchSender = Sender<'static, CriticalSectionRawMutex, FetchOutcome, FETCH_MAILBOX_CAPACITY>;

/// Receiving half of a [`FetchMailbox`]
pub type FetchReceiver =
    Receiver<'static, CriticalSectionRawMutex, FetchOutcome, FETCH_MAILBOX_CAPACITY>;

/// Global mailbox for fetch outcomes
pub static FETCH_MAILBOX: FetchMailbox = Channel::new();

/// Handle for posting outcomes from a fetch task
pub fn fetch_sender() -> FetchSender {
    FETCH_MAILBOX.sender()
}

/// Handle for draining outcomes on the UI thread
pub fn fetch_receiver() -> FetchReceiver {
    FETCH_MAILBOX.receiver()
}

/// What a fetch reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchTarget {
    /// The single newest row, for the status screen
    Latest,
    /// A page of historical rows, for the chart screen
    Page(PageIndex),
}

/// Identifies one fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub target: FetchTarget,
    /// Per-screen counter, bumped on every request
    pub generation: u32,
}

/// Result of a fetch tagged with the ticket that requested it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Reading>, FetchError>,
}

/// Tracks the latest fetch a screen is waiting for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTracker {
    generation: u32,
    pending: Option<FetchTicket>,
}

impl FetchTracker {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    /// Issue a ticket for `target`, superseding any ticket still pending
    pub fn issue(&mut self, target: FetchTarget) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        let ticket = FetchTicket {
            target,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Accept an outcome if it answers the pending ticket.
    ///
    /// Returns the result for the current ticket and clears it; stale or
    /// unsolicited outcomes return `None`.
    pub fn accept<'o>(
        &mut self,
        outcome: &'o FetchOutcome,
    ) -> Option<&'o Result<Vec<Reading>, FetchError>> {
        if self.pending == Some(outcome.ticket) {
            self.pending = None;
            Some(&outcome.result)
        } else {
            debug!(
                "Discarding stale fetch outcome {:?} (waiting for {:?})",
                outcome.ticket, self.pending
            );
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FetchTicket> {
        self.pending
    }
}
