// ── Backend seam ──
//
// Everything above this trait (route editor, pages, CLI, TUI) talks to a
// `TicketingApi`. `HttpBackend` is the real server; `fake::FakeBackend`
// is the in-memory stand-in used by tests and `--demo`.

use async_trait::async_trait;
use busops_api::TicketingClient;
use busops_api::types;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::CoreError;
use crate::model::{
    BusLine, BusStop, CategoryId, LineId, Page, RouteStop, StopId, Ticket, TicketCategory,
    TicketId,
};
use crate::requests::{CategoryInput, LineInput, PurchaseInput, StopInput, TicketFilter};

/// Every remote operation the console performs.
///
/// Each call either resolves with the payload or fails with a single
/// [`CoreError`] whose `Display` is the operator-facing message.
/// Implementations never retry.
#[async_trait]
pub trait TicketingApi: Send + Sync {
    // ── Bus stops ────────────────────────────────────────────────────
    async fn list_stops(&self) -> Result<Vec<BusStop>, CoreError>;
    async fn create_stop(&self, input: &StopInput) -> Result<BusStop, CoreError>;
    async fn update_stop(&self, id: StopId, input: &StopInput) -> Result<BusStop, CoreError>;
    async fn delete_stop(&self, id: StopId) -> Result<(), CoreError>;

    // ── Bus lines ────────────────────────────────────────────────────
    async fn list_lines(&self) -> Result<Vec<BusLine>, CoreError>;
    async fn get_line(&self, id: LineId) -> Result<BusLine, CoreError>;
    async fn create_line(&self, input: &LineInput) -> Result<BusLine, CoreError>;
    async fn update_line(&self, id: LineId, input: &LineInput) -> Result<BusLine, CoreError>;
    async fn delete_line(&self, id: LineId) -> Result<(), CoreError>;
    /// Replace the whole route of a line with `stop_ids`, in order.
    async fn set_route(&self, id: LineId, stop_ids: &[StopId]) -> Result<BusLine, CoreError>;
    async fn get_route(&self, id: LineId) -> Result<Vec<RouteStop>, CoreError>;

    // ── Ticket categories ────────────────────────────────────────────
    async fn list_categories(&self) -> Result<Vec<TicketCategory>, CoreError>;
    async fn create_category(&self, input: &CategoryInput) -> Result<TicketCategory, CoreError>;
    async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<TicketCategory, CoreError>;
    async fn delete_category(&self, id: CategoryId) -> Result<(), CoreError>;

    // ── Tickets ──────────────────────────────────────────────────────
    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Page<Ticket>, CoreError>;
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, CoreError>;
    async fn purchase_ticket(&self, input: &PurchaseInput) -> Result<Ticket, CoreError>;
    async fn renew_ticket(&self, id: TicketId) -> Result<Ticket, CoreError>;
    async fn cancel_ticket(&self, id: TicketId) -> Result<(), CoreError>;
}

// ── HTTP implementation ──────────────────────────────────────────────

/// [`TicketingApi`] over the real REST server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: TicketingClient,
}

impl HttpBackend {
    pub fn connect(config: &ApiConfig) -> Result<Self, CoreError> {
        let client = TicketingClient::new(config.url.as_str(), &config.transport())?;
        debug!(base_url = %client.base_url(), "ticketing API client ready");
        Ok(Self { client })
    }

    pub fn from_client(client: TicketingClient) -> Self {
        Self { client }
    }
}

fn collect<A, B: From<A>>(raw: Vec<A>) -> Vec<B> {
    raw.into_iter().map(B::from).collect()
}

#[async_trait]
impl TicketingApi for HttpBackend {
    async fn list_stops(&self) -> Result<Vec<BusStop>, CoreError> {
        Ok(collect(self.client.list_bus_stops().await?))
    }

    async fn create_stop(&self, input: &StopInput) -> Result<BusStop, CoreError> {
        let body = types::BusStopRequest::from(input);
        Ok(self.client.create_bus_stop(&body).await?.into())
    }

    async fn update_stop(&self, id: StopId, input: &StopInput) -> Result<BusStop, CoreError> {
        let body = types::BusStopRequest::from(input);
        Ok(self.client.update_bus_stop(id, &body).await?.into())
    }

    async fn delete_stop(&self, id: StopId) -> Result<(), CoreError> {
        Ok(self.client.delete_bus_stop(id).await?)
    }

    async fn list_lines(&self) -> Result<Vec<BusLine>, CoreError> {
        Ok(collect(self.client.list_bus_lines().await?))
    }

    async fn get_line(&self, id: LineId) -> Result<BusLine, CoreError> {
        Ok(self.client.get_bus_line(id).await?.into())
    }

    async fn create_line(&self, input: &LineInput) -> Result<BusLine, CoreError> {
        let body = types::BusLineRequest::from(input);
        Ok(self.client.create_bus_line(&body).await?.into())
    }

    async fn update_line(&self, id: LineId, input: &LineInput) -> Result<BusLine, CoreError> {
        let body = types::BusLineRequest::from(input);
        Ok(self.client.update_bus_line(id, &body).await?.into())
    }

    async fn delete_line(&self, id: LineId) -> Result<(), CoreError> {
        Ok(self.client.delete_bus_line(id).await?)
    }

    async fn set_route(&self, id: LineId, stop_ids: &[StopId]) -> Result<BusLine, CoreError> {
        Ok(self.client.set_route(id, stop_ids).await?.into())
    }

    async fn get_route(&self, id: LineId) -> Result<Vec<RouteStop>, CoreError> {
        Ok(collect(self.client.get_route(id).await?))
    }

    async fn list_categories(&self) -> Result<Vec<TicketCategory>, CoreError> {
        Ok(collect(self.client.list_ticket_categories().await?))
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<TicketCategory, CoreError> {
        let body = types::TicketCategoryRequest::from(input);
        Ok(self.client.create_ticket_category(&body).await?.into())
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<TicketCategory, CoreError> {
        let body = types::TicketCategoryRequest::from(input);
        Ok(self.client.update_ticket_category(id, &body).await?.into())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), CoreError> {
        Ok(self.client.delete_ticket_category(id).await?)
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Page<Ticket>, CoreError> {
        let query = types::TicketQuery::from(filter);
        Ok(self.client.list_tickets(&query).await?.into())
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, CoreError> {
        Ok(self.client.get_ticket(id).await?.into())
    }

    async fn purchase_ticket(&self, input: &PurchaseInput) -> Result<Ticket, CoreError> {
        let body = types::TicketPurchaseRequest::from(input);
        Ok(self.client.purchase_ticket(&body).await?.into())
    }

    async fn renew_ticket(&self, id: TicketId) -> Result<Ticket, CoreError> {
        Ok(self.client.renew_ticket(id).await?.into())
    }

    async fn cancel_ticket(&self, id: TicketId) -> Result<(), CoreError> {
        Ok(self.client.cancel_ticket(id).await?)
    }
}
