//! Runs fetch tickets on the tokio runtime
//!
//! At most one fetch per screen is in flight: dispatching a new ticket for a
//! screen aborts the task still working on its previous one. Finished
//! outcomes are posted to the fetch mailbox for the UI loop.

use std::collections::HashMap;
use std::sync::Arc;

use hometemp_core::fetch::{FetchSender, FetchTicket};
use hometemp_core::pages::owner_of;
use hometemp_core::sheets::SheetGateway;
use hometemp_core::ui::PageId;
use log::{debug, info};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::source::ViewerSource;

pub struct FetchDispatcher {
    runtime: Handle,
    gateway: Arc<SheetGateway<ViewerSource>>,
    mailbox: FetchSender,
    in_flight: HashMap<PageId, JoinHandle<()>>,
}

impl FetchDispatcher {
    pub fn new(
        runtime: Handle,
        gateway: Arc<SheetGateway<ViewerSource>>,
        mailbox: FetchSender,
    ) -> Self {
        Self {
            runtime,
            gateway,
            mailbox,
            in_flight: HashMap::new(),
        }
    }

    /// Start the fetch for `ticket`, cancelling the one it supersedes
    pub fn dispatch(&mut self, ticket: FetchTicket) {
        let owner = owner_of(ticket.target);
        if let Some(previous) = self.in_flight.remove(&owner)
            && !previous.is_finished()
        {
            debug!("Cancelling superseded fetch for {:?}", owner);
            previous.abort();
        }

        info!(
            "Fetching {:?} from the {}",
            ticket.target,
            self.gateway.source().describe()
        );

        let gateway = Arc::clone(&self.gateway);
        let mailbox = self.mailbox;
        let task = self.runtime.spawn(async move {
            let outcome = gateway.run(ticket).await;
            mailbox.send(outcome).await;
        });
        self.in_flight.insert(owner, task);
    }

    /// Whether any fetch is still running
    pub fn is_busy(&self) -> bool {
        self.in_flight.values().any(|task| !task.is_finished())
    }

    /// Abort everything still running
    pub fn shutdown(&mut self) {
        for (_, task) in self.in_flight.drain() {
            task.abort();
        }
    }
}

impl Drop for FetchDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
