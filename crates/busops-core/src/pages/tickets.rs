use std::fmt;

use tracing::debug;

use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{BusLine, LineId, Page, Ticket, TicketCategory, TicketId};
use crate::requests::TicketFilter;

use super::{Banner, PendingConfirm};

/// Rows per page on the tickets page.
pub const PAGE_SIZE: u32 = 10;

pub const EMPTY_STATE: &str = "No tickets found.";

/// Active-flag filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Inactive,
            Self::Inactive => Self::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        })
    }
}

/// Ticket search, paging, renew and cancel.
///
/// Results stay `None` until the first search. Renewal is offered per
/// the ticket's category policy, resolved against the loaded category
/// catalog; the server has the final word either way.
#[derive(Debug)]
pub struct TicketsPage {
    pub email: String,
    pub status: StatusFilter,
    pub line_id: Option<LineId>,
    pub page: u32,
    pub page_size: u32,
    pub results: Option<Page<Ticket>>,
    pub categories: Vec<TicketCategory>,
    pub lines: Vec<BusLine>,
    pub banner: Banner,
    pending_cancel: Option<PendingConfirm<TicketId>>,
}

impl Default for TicketsPage {
    fn default() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }
}

impl TicketsPage {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            email: String::new(),
            status: StatusFilter::All,
            line_id: None,
            page: 0,
            page_size: page_size.max(1),
            results: None,
            categories: Vec::new(),
            lines: Vec::new(),
            banner: Banner::default(),
            pending_cancel: None,
        }
    }

    /// Load the reference catalogs the page needs to decide what to offer.
    pub async fn mount(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.categories = self.banner.track(api.list_categories().await)?;
        self.lines = self.banner.track(api.list_lines().await)?;
        Ok(())
    }

    pub fn filter(&self) -> TicketFilter {
        self.filter_at(self.page)
    }

    fn filter_at(&self, page: u32) -> TicketFilter {
        TicketFilter {
            email: Some(self.email.trim().to_owned()).filter(|e| !e.is_empty()),
            active: self.status.as_flag(),
            line_id: self.line_id,
            page,
            size: self.page_size,
        }
    }

    /// Start a new search from the first page.
    pub async fn search(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.load_page(api, 0).await
    }

    /// Re-run the current query at the current page.
    pub async fn fetch(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.load_page(api, self.page).await
    }

    /// Fetch page `page` of the current query. The page index only moves
    /// once that page has arrived.
    async fn load_page(&mut self, api: &dyn TicketingApi, page: u32) -> Result<(), CoreError> {
        self.banner.clear();
        let filter = self.filter_at(page);
        debug!(?filter, "searching tickets");
        let results = self.banner.track(api.list_tickets(&filter).await)?;
        self.page = page;
        self.results = Some(results);
        Ok(())
    }

    pub async fn next_page(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        if !self.results.as_ref().is_some_and(Page::has_next) {
            return Ok(());
        }
        self.load_page(api, self.page + 1).await
    }

    pub async fn prev_page(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        if self.page == 0 {
            return Ok(());
        }
        self.load_page(api, self.page - 1).await
    }

    pub fn tickets(&self) -> &[Ticket] {
        self.results
            .as_ref()
            .map(|p| p.items.as_slice())
            .unwrap_or_default()
    }

    /// `Some("No tickets found.")` after a search that matched nothing.
    pub fn empty_state(&self) -> Option<&'static str> {
        self.results
            .as_ref()
            .filter(|p| p.is_empty())
            .map(|_| EMPTY_STATE)
    }

    /// Whether renewal should be offered for `ticket`: a running ticket
    /// is renewed, a cancelled one reactivated. Tickets that ran out
    /// while active are offered neither.
    ///
    /// Categories are matched by name because that is all a ticket
    /// carries. An unknown category is offered; the server decides.
    pub fn can_renew(&self, ticket: &Ticket) -> bool {
        if ticket.active && ticket.expired {
            return false;
        }
        self.categories
            .iter()
            .find(|c| c.name == ticket.category_name)
            .is_none_or(TicketCategory::is_renewable)
    }

    /// Offered for active tickets that have not expired.
    pub fn can_cancel(ticket: &Ticket) -> bool {
        ticket.active && !ticket.expired
    }

    /// Banner text after a successful renewal.
    pub fn renewed_message(ticket: &Ticket) -> String {
        format!(
            "Ticket #{} renewed until {}",
            ticket.id,
            ticket.expiration_date.format("%Y-%m-%d %H:%M")
        )
    }

    /// Renew a ticket, then refresh the current page. On rejection the
    /// shown list is left exactly as it was.
    pub async fn renew(
        &mut self,
        api: &dyn TicketingApi,
        id: TicketId,
    ) -> Result<Ticket, CoreError> {
        let renewed = self.banner.track(api.renew_ticket(id).await)?;
        self.fetch(api).await?;
        self.banner.info(Self::renewed_message(&renewed));
        Ok(renewed)
    }

    /// Ask to cancel a ticket from the current results.
    pub fn request_cancel(&mut self, id: TicketId) -> Option<&PendingConfirm<TicketId>> {
        let ticket = self.tickets().iter().find(|t| t.id == id)?.clone();
        Some(self.request_cancel_for(&ticket))
    }

    /// Ask to cancel a ticket fetched outside the current results.
    pub fn request_cancel_for(&mut self, ticket: &Ticket) -> &PendingConfirm<TicketId> {
        let prompt = format!(
            "Cancel ticket #{} for {}? This cannot be undone.",
            ticket.id, ticket.passenger_name
        );
        self.pending_cancel.insert(PendingConfirm {
            subject: ticket.id,
            prompt,
        })
    }

    pub fn pending_cancel(&self) -> Option<&PendingConfirm<TicketId>> {
        self.pending_cancel.as_ref()
    }

    pub async fn resolve_cancel(
        &mut self,
        api: &dyn TicketingApi,
        accepted: bool,
    ) -> Result<bool, CoreError> {
        let Some(pending) = self.pending_cancel.take() else {
            return Ok(false);
        };
        if !accepted {
            return Ok(false);
        }
        self.banner.track(api.cancel_ticket(pending.subject).await)?;
        self.fetch(api).await?;
        self.banner.info(format!("Ticket #{} cancelled", pending.subject));
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::FakeBackend;
    use pretty_assertions::assert_eq;

    async fn mounted(api: &FakeBackend) -> TicketsPage {
        let mut page = TicketsPage::default();
        page.mount(api).await.unwrap();
        page
    }

    #[tokio::test]
    async fn no_results_before_first_search() {
        let api = FakeBackend::new();
        let page = mounted(&api).await;
        assert!(page.results.is_none());
        assert_eq!(page.empty_state(), None);
    }

    #[tokio::test]
    async fn unknown_email_shows_empty_state_not_error() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.email = "nobody@example.com".into();
        page.search(&api).await.unwrap();

        assert_eq!(page.empty_state(), Some("No tickets found."));
        assert!(!page.banner.is_error());
    }

    #[tokio::test]
    async fn email_and_status_filters() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.email = " john@example.com ".into();
        page.status = StatusFilter::Active;
        page.search(&api).await.unwrap();

        let ids: Vec<TicketId> = page.tickets().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn renew_offer_follows_category_policy() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.search(&api).await.unwrap();

        let single = page.tickets().iter().find(|t| t.id == 2).unwrap();
        let weekly = page.tickets().iter().find(|t| t.id == 3).unwrap();
        assert!(!page.can_renew(single));
        assert!(page.can_renew(weekly));

        let mut renamed = weekly.clone();
        renamed.category_name = "Legacy Pass".into();
        assert!(page.can_renew(&renamed));
    }

    #[tokio::test]
    async fn offers_follow_ticket_state() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.search(&api).await.unwrap();
        let weekly = page.tickets().iter().find(|t| t.id == 3).unwrap().clone();

        assert!(page.can_renew(&weekly));
        assert!(TicketsPage::can_cancel(&weekly));

        let ran_out = Ticket {
            expired: true,
            ..weekly.clone()
        };
        assert!(!page.can_renew(&ran_out));
        assert!(!TicketsPage::can_cancel(&ran_out));

        let cancelled = Ticket {
            active: false,
            expired: true,
            ..weekly
        };
        assert!(page.can_renew(&cancelled));
        assert!(!TicketsPage::can_cancel(&cancelled));

        let single = page.tickets().iter().find(|t| t.id == 2).unwrap();
        assert!(!single.active);
        assert!(!page.can_renew(single));
    }

    #[tokio::test]
    async fn successful_search_clears_earlier_error() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.search(&api).await.unwrap();
        assert!(page.renew(&api, 2).await.is_err());
        assert!(page.banner.is_error());

        page.email = "nobody@example.com".into();
        page.search(&api).await.unwrap();

        assert_eq!(page.empty_state(), Some("No tickets found."));
        assert!(!page.banner.is_error());
        assert_eq!(page.banner.message(), None);
    }

    #[tokio::test]
    async fn failed_page_turn_keeps_index_and_rows() {
        let api = FakeBackend::new();
        let mut page = TicketsPage::with_page_size(2);
        page.search(&api).await.unwrap();
        let first: Vec<TicketId> = page.tickets().iter().map(|t| t.id).collect();

        api.fail_next(503, "Service Unavailable").await;
        assert!(page.next_page(&api).await.is_err());

        assert_eq!(page.page, 0);
        let shown: Vec<TicketId> = page.tickets().iter().map(|t| t.id).collect();
        assert_eq!(shown, first);
        assert!(page.banner.is_error());

        page.next_page(&api).await.unwrap();
        assert_eq!(page.page, 1);
        assert!(!page.banner.is_error());
    }

    #[tokio::test]
    async fn rejected_renewal_leaves_list_unchanged() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.search(&api).await.unwrap();
        let before = page.tickets().to_vec();

        let err = page.renew(&api, 2).await.unwrap_err();

        assert_eq!(err.to_string(), "Single ride tickets cannot be renewed");
        assert!(page.banner.is_error());
        assert_eq!(
            page.banner.message(),
            Some("Single ride tickets cannot be renewed")
        );
        assert_eq!(page.tickets(), before.as_slice());
    }

    #[tokio::test]
    async fn renew_refreshes_current_page() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.search(&api).await.unwrap();

        page.renew(&api, 3).await.unwrap();

        let weekly = page.tickets().iter().find(|t| t.id == 3).unwrap();
        assert_eq!(weekly.expiration_date.to_string(), "2026-02-18 00:00:00");
        assert!(!page.banner.is_error());
    }

    #[tokio::test]
    async fn cancel_requires_confirmation() {
        let api = FakeBackend::new();
        let mut page = mounted(&api).await;
        page.search(&api).await.unwrap();
        let before = api.call_count().await;

        page.request_cancel(1).unwrap();
        assert!(!page.resolve_cancel(&api, false).await.unwrap());
        assert_eq!(api.call_count().await, before);

        page.request_cancel(1).unwrap();
        assert!(page.resolve_cancel(&api, true).await.unwrap());
        let cancelled = page.tickets().iter().find(|t| t.id == 1).unwrap();
        assert!(!cancelled.active);
    }

    #[tokio::test]
    async fn paging_stops_at_bounds() {
        let api = FakeBackend::new();
        let mut page = TicketsPage::with_page_size(2);
        page.search(&api).await.unwrap();
        assert_eq!(page.tickets().len(), 2);

        page.next_page(&api).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.tickets().len(), 1);

        page.next_page(&api).await.unwrap();
        assert_eq!(page.page, 1);

        page.prev_page(&api).await.unwrap();
        page.prev_page(&api).await.unwrap();
        assert_eq!(page.page, 0);
    }
}
