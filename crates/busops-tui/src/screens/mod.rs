//! Screen implementations. Each screen owns one page model from
//! `busops-core` behind its own async mutex.
//!
//! Backend work runs on spawned tasks that hold the page lock for the
//! duration of the call. Rendering and key handling only `try_lock`: a
//! locked page shows the loading throbber and ignores input.

mod buy_ticket;
mod categories;
mod dashboard;
mod line_detail;
mod lines;
mod stops;
mod tickets;

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use busops_core::{BusStop, CoreError, TicketingApi};

use crate::action::Action;
use crate::component::Component;
use crate::screen::Route;

pub type Api = Arc<dyn TicketingApi>;

/// Build a freshly mounted screen for `route`.
pub fn create(route: Route, api: Api) -> Box<dyn Component> {
    match route {
        Route::Dashboard => Box::new(dashboard::DashboardScreen::new(api)),
        Route::BusLines => Box::new(lines::LinesScreen::new(api)),
        Route::BusLine(id) => Box::new(line_detail::LineDetailScreen::new(id, api)),
        Route::BusStops => Box::new(stops::StopsScreen::new(api)),
        Route::TicketCategories => Box::new(categories::CategoriesScreen::new(api)),
        Route::BuyTicket => Box::new(buy_ticket::BuyTicketScreen::new(api)),
        Route::MyTickets => Box::new(tickets::TicketsScreen::new(api)),
    }
}

// ── Shared page model ─────────────────────────────────────────────────

/// A page model plus what its tasks need: the backend and the channel
/// used to ask for a redraw when a task finishes.
pub struct Shared<P> {
    page: Arc<Mutex<P>>,
    api: Api,
    tx: Option<UnboundedSender<Action>>,
}

impl<P: Send + 'static> Shared<P> {
    pub fn new(page: P, api: Api) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
            api,
            tx: None,
        }
    }

    pub fn attach(&mut self, tx: UnboundedSender<Action>) {
        self.tx = Some(tx);
    }

    /// The page, unless a task currently holds it.
    pub fn try_page(&self) -> Option<MutexGuard<'_, P>> {
        self.page.try_lock().ok()
    }

    /// Run `op` against the page on a background task.
    ///
    /// Failures are already in the page banner; they are only logged here.
    pub fn run<F>(&self, what: &'static str, op: F)
    where
        F: for<'a> FnOnce(&'a mut P, &'a dyn TicketingApi) -> BoxFuture<'a, Result<(), CoreError>>
            + Send
            + 'static,
    {
        let page = Arc::clone(&self.page);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            debug!(what, "page task started");
            let mut guard = page.lock().await;
            if let Err(e) = op(&mut guard, api.as_ref()).await {
                warn!(what, error = %e, "page task failed");
            }
            drop(guard);
            if let Some(tx) = tx {
                let _ = tx.send(Action::PageUpdated);
            }
        });
    }
}

// ── Stop picker ───────────────────────────────────────────────────────

/// Cursor over the stop catalog for adding stops to a route.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StopPicker {
    index: usize,
}

impl StopPicker {
    pub fn cycle(&mut self, len: usize, forward: bool) {
        if len == 0 {
            return;
        }
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
    }

    pub fn current<'a>(&self, catalog: &'a [BusStop]) -> Option<&'a BusStop> {
        catalog.get(self.index.min(catalog.len().saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busops_core::FakeBackend;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn picker_walks_the_catalog() {
        let stops = FakeBackend::new().list_stops().await.unwrap_or_default();
        let mut picker = StopPicker::default();
        assert_eq!(picker.current(&stops).map(|s| s.id), Some(1));
        picker.cycle(stops.len(), false);
        assert_eq!(picker.current(&stops).map(|s| s.id), Some(3));
        picker.cycle(stops.len(), true);
        picker.cycle(stops.len(), true);
        assert_eq!(picker.current(&stops).map(|s| s.id), Some(2));
        assert_eq!(picker.current(&[]), None);
    }
}
