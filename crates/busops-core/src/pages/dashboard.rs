use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::requests::TicketFilter;

use super::Banner;

/// Landing page: headline counts.
#[derive(Debug, Default)]
pub struct DashboardPage {
    pub line_count: Option<usize>,
    pub active_line_count: Option<usize>,
    pub category_count: Option<usize>,
    pub ticket_count: Option<u64>,
    pub banner: Banner,
}

impl DashboardPage {
    pub async fn load(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        let lines = self.banner.track(api.list_lines().await)?;
        self.line_count = Some(lines.len());
        self.active_line_count = Some(lines.iter().filter(|l| l.active).count());

        let categories = self.banner.track(api.list_categories().await)?;
        self.category_count = Some(categories.len());

        // A one-row page is enough to read the total.
        let probe = TicketFilter {
            size: 1,
            ..TicketFilter::default()
        };
        let tickets = self.banner.track(api.list_tickets(&probe).await)?;
        self.ticket_count = Some(tickets.total_elements);
        Ok(())
    }
}
