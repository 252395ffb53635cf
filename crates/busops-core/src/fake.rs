// ── In-memory ticketing backend ──
//
// Seeded with a small fixed data set and a frozen clock so results are
// reproducible. Mirrors the server behaviour the console depends on:
// route replacement with recomputed positions, 404 wording, single-ride
// renewal rejection, exact email filtering, newest-first paging and
// soft-deactivation of lines that still have active tickets.

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{
    BusLine, BusStop, CategoryId, LineId, Page, RouteStop, StopId, Ticket, TicketCategory,
    TicketId,
};
use crate::requests::{CategoryInput, LineInput, PurchaseInput, StopInput, TicketFilter};

/// Frozen "now" of the seeded data set.
pub const FAKE_NOW: &str = "2026-02-07T12:00:00";

/// Id handed to the first ticket purchased against a fresh backend.
pub const FIRST_PURCHASE_ID: TicketId = 100;

fn at(raw: &str) -> NaiveDateTime {
    raw.parse().unwrap_or_default()
}

fn rejected(message: impl Into<String>) -> CoreError {
    CoreError::from_status(400, message)
}

fn conflict(message: impl Into<String>) -> CoreError {
    CoreError::from_status(409, message)
}

fn not_found(what: &str, id: i64) -> CoreError {
    CoreError::from_status(404, format!("{what} not found with id: {id}"))
}

// ── Stored records ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct StoredLine {
    id: LineId,
    name: String,
    description: Option<String>,
    active: bool,
    route: Vec<StopId>,
}

#[derive(Debug, Clone)]
struct StoredTicket {
    id: TicketId,
    passenger_name: String,
    passenger_email: String,
    category_id: CategoryId,
    line_id: Option<LineId>,
    purchase_date: NaiveDateTime,
    valid_from: NaiveDateTime,
    expiration_date: NaiveDateTime,
    active: bool,
}

#[derive(Debug)]
struct FakeState {
    now: NaiveDateTime,
    stops: Vec<BusStop>,
    lines: Vec<StoredLine>,
    categories: Vec<TicketCategory>,
    tickets: Vec<StoredTicket>,
    next_stop_id: StopId,
    next_line_id: LineId,
    next_category_id: CategoryId,
    next_ticket_id: TicketId,
    calls: Vec<String>,
    /// Calls still to pass before the injected failure, and the failure.
    fail_next: Option<(usize, u16, String)>,
}

impl FakeState {
    fn seeded() -> Self {
        let stop = |id, name: &str, lat, lon| BusStop {
            id,
            name: name.into(),
            latitude: Some(lat),
            longitude: Some(lon),
        };
        let category = |id, name: &str, duration_days, price, description: Option<&str>| {
            TicketCategory {
                id,
                name: name.into(),
                duration_days,
                price,
                description: description.map(Into::into),
            }
        };

        Self {
            now: at(FAKE_NOW),
            stops: vec![
                stop(1, "Central Station", 41.9973, 21.4280),
                stop(2, "City Hall", 41.9960, 21.4315),
                stop(3, "Old Market Square", 41.9945, 21.4350),
            ],
            lines: vec![
                StoredLine {
                    id: 1,
                    name: "Line 1 - Downtown Loop".into(),
                    description: Some("Circular route".into()),
                    active: true,
                    route: vec![1, 2],
                },
                StoredLine {
                    id: 2,
                    name: "Line 2 - Airport Express".into(),
                    description: Some("Direct to airport".into()),
                    active: true,
                    route: vec![1],
                },
                StoredLine {
                    id: 3,
                    name: "Line 3 - Inactive".into(),
                    description: Some("Decommissioned".into()),
                    active: false,
                    route: vec![],
                },
            ],
            categories: vec![
                category(1, "Single Ride", 0, 1.50, Some("Valid for one trip")),
                category(2, "Monthly Pass", 30, 45.00, Some("Unlimited rides for 30 days")),
                category(3, "Weekly Pass", 7, 15.00, Some("Unlimited rides for 7 days")),
            ],
            tickets: vec![
                StoredTicket {
                    id: 1,
                    passenger_name: "John Doe".into(),
                    passenger_email: "john@example.com".into(),
                    category_id: 2,
                    line_id: Some(1),
                    purchase_date: at("2026-02-01T10:00:00"),
                    valid_from: at("2026-02-01T00:00:00"),
                    expiration_date: at("2026-03-03T00:00:00"),
                    active: true,
                },
                StoredTicket {
                    id: 2,
                    passenger_name: "Jane Smith".into(),
                    passenger_email: "jane@example.com".into(),
                    category_id: 1,
                    line_id: None,
                    purchase_date: at("2026-02-05T14:00:00"),
                    valid_from: at("2026-02-05T14:00:00"),
                    expiration_date: at("2026-02-05T16:00:00"),
                    active: false,
                },
                StoredTicket {
                    id: 3,
                    passenger_name: "John Doe".into(),
                    passenger_email: "john@example.com".into(),
                    category_id: 3,
                    line_id: None,
                    purchase_date: at("2026-02-04T08:00:00"),
                    valid_from: at("2026-02-04T00:00:00"),
                    expiration_date: at("2026-02-11T00:00:00"),
                    active: true,
                },
            ],
            next_stop_id: 4,
            next_line_id: 4,
            next_category_id: 4,
            next_ticket_id: FIRST_PURCHASE_ID,
            calls: Vec::new(),
            fail_next: None,
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────

    fn stop(&self, id: StopId) -> Result<&BusStop, CoreError> {
        self.stops
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Bus stop", id))
    }

    fn line_index(&self, id: LineId) -> Result<usize, CoreError> {
        self.lines
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| not_found("Bus line", id))
    }

    fn category(&self, id: CategoryId) -> Result<&TicketCategory, CoreError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Ticket category", id))
    }

    fn ticket_index(&self, id: TicketId) -> Result<usize, CoreError> {
        self.tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found("Ticket", id))
    }

    // ── Views ────────────────────────────────────────────────────────

    fn route_view(&self, line: &StoredLine) -> Vec<RouteStop> {
        line.route
            .iter()
            .zip(1_u32..)
            .map(|(&stop_id, order)| RouteStop {
                order,
                stop_id,
                stop_name: self
                    .stop(stop_id)
                    .map_or_else(|_| format!("Stop #{stop_id}"), |s| s.name.clone()),
            })
            .collect()
    }

    fn line_view(&self, line: &StoredLine) -> BusLine {
        BusLine {
            id: line.id,
            name: line.name.clone(),
            description: line.description.clone(),
            active: line.active,
            stops: self.route_view(line),
        }
    }

    fn ticket_view(&self, ticket: &StoredTicket) -> Ticket {
        let category_name = self
            .category(ticket.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let line_name = ticket.line_id.and_then(|id| {
            self.lines
                .iter()
                .find(|l| l.id == id)
                .map(|l| l.name.clone())
        });

        Ticket {
            id: ticket.id,
            passenger_name: ticket.passenger_name.clone(),
            passenger_email: ticket.passenger_email.clone(),
            category_name,
            line_name,
            purchase_date: ticket.purchase_date,
            valid_from: ticket.valid_from,
            expiration_date: ticket.expiration_date,
            active: ticket.active,
            expired: self.now > ticket.expiration_date,
            days_remaining: (ticket.expiration_date - self.now).num_days().max(0),
        }
    }

    fn validity_end(start: NaiveDateTime, category: &TicketCategory) -> NaiveDateTime {
        if category.is_single_ride() {
            start + TimeDelta::hours(2)
        } else {
            start + TimeDelta::days(i64::from(category.duration_days))
        }
    }
}

// ── Input checks the real server performs ────────────────────────────

fn check_stop(input: &StopInput) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(rejected("Stop name is required"));
    }
    if input.name.chars().count() > 150 {
        return Err(rejected("Name must be under 150 characters"));
    }
    Ok(())
}

fn check_line(input: &LineInput) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(rejected("Bus line name is required"));
    }
    if input.name.chars().count() > 200 {
        return Err(rejected("Name must be under 200 characters"));
    }
    if input
        .description
        .as_ref()
        .is_some_and(|d| d.chars().count() > 500)
    {
        return Err(rejected("Description must be under 500 characters"));
    }
    Ok(())
}

fn check_category(input: &CategoryInput) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(rejected("Category name is required"));
    }
    if input.price < 0.0 {
        return Err(rejected("Price must be >= 0"));
    }
    Ok(())
}

fn check_purchase(input: &PurchaseInput) -> Result<(), CoreError> {
    if input.passenger_name.trim().is_empty() {
        return Err(rejected("Passenger name is required"));
    }
    let email = input.passenger_email.trim();
    if email.is_empty() {
        return Err(rejected("Passenger email is required"));
    }
    if !email.contains('@') {
        return Err(rejected("Invalid email format"));
    }
    Ok(())
}

// ── Backend ──────────────────────────────────────────────────────────

/// In-memory [`TicketingApi`] with a call log and one-shot failure injection.
#[derive(Debug)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    /// A backend holding the seeded data set.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::seeded()),
        }
    }

    /// Every call made so far, in order, e.g. `set_route(1, [2, 1])`.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Make the next call fail with `status` and `message`, whatever it is.
    pub async fn fail_next(&self, status: u16, message: impl Into<String>) {
        self.fail_after(0, status, message).await;
    }

    /// Let `skip` calls through, then fail the one after with `status`.
    pub async fn fail_after(&self, skip: usize, status: u16, message: impl Into<String>) {
        self.state.lock().await.fail_next = Some((skip, status, message.into()));
    }

    pub async fn now(&self) -> NaiveDateTime {
        self.state.lock().await.now
    }

    /// Record the call and apply any pending injected failure.
    async fn enter(&self, call: String) -> Result<MutexGuard<'_, FakeState>, CoreError> {
        let mut state = self.state.lock().await;
        debug!(%call, "fake backend call");
        state.calls.push(call);
        match state.fail_next.take() {
            Some((0, status, message)) => Err(CoreError::from_status(status, message)),
            Some((skip, status, message)) => {
                state.fail_next = Some((skip - 1, status, message));
                Ok(state)
            }
            None => Ok(state),
        }
    }
}

#[async_trait]
impl TicketingApi for FakeBackend {
    // ── Bus stops ────────────────────────────────────────────────────

    async fn list_stops(&self) -> Result<Vec<BusStop>, CoreError> {
        let state = self.enter("list_stops".into()).await?;
        Ok(state.stops.clone())
    }

    async fn create_stop(&self, input: &StopInput) -> Result<BusStop, CoreError> {
        let mut state = self.enter("create_stop".into()).await?;
        check_stop(input)?;
        let stop = BusStop {
            id: state.next_stop_id,
            name: input.name.trim().to_owned(),
            latitude: input.latitude,
            longitude: input.longitude,
        };
        state.next_stop_id += 1;
        state.stops.push(stop.clone());
        Ok(stop)
    }

    async fn update_stop(&self, id: StopId, input: &StopInput) -> Result<BusStop, CoreError> {
        let mut state = self.enter(format!("update_stop({id})")).await?;
        state.stop(id)?;
        check_stop(input)?;
        let stop = state
            .stops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Bus stop", id))?;
        stop.name = input.name.trim().to_owned();
        stop.latitude = input.latitude;
        stop.longitude = input.longitude;
        Ok(stop.clone())
    }

    async fn delete_stop(&self, id: StopId) -> Result<(), CoreError> {
        let mut state = self.enter(format!("delete_stop({id})")).await?;
        state.stop(id)?;
        if state.lines.iter().any(|l| l.route.contains(&id)) {
            return Err(conflict(format!(
                "Bus stop {id} is still part of a bus line route"
            )));
        }
        state.stops.retain(|s| s.id != id);
        Ok(())
    }

    // ── Bus lines ────────────────────────────────────────────────────

    async fn list_lines(&self) -> Result<Vec<BusLine>, CoreError> {
        let state = self.enter("list_lines".into()).await?;
        Ok(state.lines.iter().map(|l| state.line_view(l)).collect())
    }

    async fn get_line(&self, id: LineId) -> Result<BusLine, CoreError> {
        let state = self.enter(format!("get_line({id})")).await?;
        let idx = state.line_index(id)?;
        Ok(state.line_view(&state.lines[idx]))
    }

    async fn create_line(&self, input: &LineInput) -> Result<BusLine, CoreError> {
        let mut state = self.enter("create_line".into()).await?;
        check_line(input)?;
        let line = StoredLine {
            id: state.next_line_id,
            name: input.name.trim().to_owned(),
            description: input.description.clone().filter(|d| !d.trim().is_empty()),
            active: true,
            route: Vec::new(),
        };
        state.next_line_id += 1;
        let view = state.line_view(&line);
        state.lines.push(line);
        Ok(view)
    }

    async fn update_line(&self, id: LineId, input: &LineInput) -> Result<BusLine, CoreError> {
        let mut state = self.enter(format!("update_line({id})")).await?;
        let idx = state.line_index(id)?;
        check_line(input)?;
        state.lines[idx].name = input.name.trim().to_owned();
        state.lines[idx].description = input.description.clone().filter(|d| !d.trim().is_empty());
        Ok(state.line_view(&state.lines[idx]))
    }

    async fn delete_line(&self, id: LineId) -> Result<(), CoreError> {
        let mut state = self.enter(format!("delete_line({id})")).await?;
        let idx = state.line_index(id)?;
        let has_active_tickets = state
            .tickets
            .iter()
            .any(|t| t.line_id == Some(id) && t.active);
        if has_active_tickets {
            state.lines[idx].active = false;
        } else {
            state.lines.remove(idx);
        }
        Ok(())
    }

    async fn set_route(&self, id: LineId, stop_ids: &[StopId]) -> Result<BusLine, CoreError> {
        let mut state = self.enter(format!("set_route({id}, {stop_ids:?})")).await?;
        let idx = state.line_index(id)?;
        if stop_ids.is_empty() {
            return Err(rejected("Route must have at least one stop"));
        }
        for &stop_id in stop_ids {
            state.stop(stop_id)?;
        }
        state.lines[idx].route = stop_ids.to_vec();
        Ok(state.line_view(&state.lines[idx]))
    }

    async fn get_route(&self, id: LineId) -> Result<Vec<RouteStop>, CoreError> {
        let state = self.enter(format!("get_route({id})")).await?;
        let idx = state.line_index(id)?;
        Ok(state.route_view(&state.lines[idx]))
    }

    // ── Ticket categories ────────────────────────────────────────────

    async fn list_categories(&self) -> Result<Vec<TicketCategory>, CoreError> {
        let state = self.enter("list_categories".into()).await?;
        Ok(state.categories.clone())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<TicketCategory, CoreError> {
        let mut state = self.enter("create_category".into()).await?;
        check_category(input)?;
        let category = TicketCategory {
            id: state.next_category_id,
            name: input.name.trim().to_owned(),
            duration_days: input.duration_days,
            price: input.price,
            description: input.description.clone().filter(|d| !d.trim().is_empty()),
        };
        state.next_category_id += 1;
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<TicketCategory, CoreError> {
        let mut state = self.enter(format!("update_category({id})")).await?;
        state.category(id)?;
        check_category(input)?;
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Ticket category", id))?;
        category.name = input.name.trim().to_owned();
        category.duration_days = input.duration_days;
        category.price = input.price;
        category.description = input.description.clone().filter(|d| !d.trim().is_empty());
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), CoreError> {
        let mut state = self.enter(format!("delete_category({id})")).await?;
        state.category(id)?;
        if state.tickets.iter().any(|t| t.category_id == id) {
            return Err(conflict(format!(
                "Ticket category {id} is referenced by existing tickets"
            )));
        }
        state.categories.retain(|c| c.id != id);
        Ok(())
    }

    // ── Tickets ──────────────────────────────────────────────────────

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Page<Ticket>, CoreError> {
        let state = self
            .enter(format!(
                "list_tickets(email={:?}, active={:?}, line={:?}, page={}, size={})",
                filter.email, filter.active, filter.line_id, filter.page, filter.size
            ))
            .await?;

        let email = filter.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
        let mut matching: Vec<&StoredTicket> = state
            .tickets
            .iter()
            .filter(|t| email.is_none_or(|e| t.passenger_email == e))
            .filter(|t| filter.active.is_none_or(|a| t.active == a))
            .filter(|t| filter.line_id.is_none_or(|l| t.line_id == Some(l)))
            .collect();
        matching.sort_by(|a, b| {
            b.purchase_date
                .cmp(&a.purchase_date)
                .then_with(|| b.id.cmp(&a.id))
        });

        let size = filter.size.max(1);
        let total = u32::try_from(matching.len()).unwrap_or(u32::MAX);
        let start = usize::try_from(filter.page.saturating_mul(size)).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(start)
            .take(usize::try_from(size).unwrap_or(usize::MAX))
            .map(|t| state.ticket_view(t))
            .collect();

        Ok(Page {
            items,
            total_elements: u64::from(total),
            total_pages: total.div_ceil(size),
            number: filter.page,
            size,
        })
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, CoreError> {
        let state = self.enter(format!("get_ticket({id})")).await?;
        let idx = state.ticket_index(id)?;
        Ok(state.ticket_view(&state.tickets[idx]))
    }

    async fn purchase_ticket(&self, input: &PurchaseInput) -> Result<Ticket, CoreError> {
        let mut state = self.enter("purchase_ticket".into()).await?;
        check_purchase(input)?;
        let category = state.category(input.category_id)?.clone();
        if let Some(line_id) = input.line_id {
            state.line_index(line_id)?;
        }

        let now = state.now;
        let valid_from = input.valid_from.unwrap_or(now);
        let ticket = StoredTicket {
            id: state.next_ticket_id,
            passenger_name: input.passenger_name.trim().to_owned(),
            passenger_email: input.passenger_email.trim().to_owned(),
            category_id: category.id,
            line_id: input.line_id,
            purchase_date: now,
            valid_from,
            expiration_date: FakeState::validity_end(valid_from, &category),
            active: true,
        };
        state.next_ticket_id += 1;
        let view = state.ticket_view(&ticket);
        state.tickets.push(ticket);
        Ok(view)
    }

    async fn renew_ticket(&self, id: TicketId) -> Result<Ticket, CoreError> {
        let mut state = self.enter(format!("renew_ticket({id})")).await?;
        let idx = state.ticket_index(id)?;
        let category = state.category(state.tickets[idx].category_id)?.clone();
        if !category.is_renewable() {
            return Err(rejected("Single ride tickets cannot be renewed"));
        }

        let now = state.now;
        let ticket = &mut state.tickets[idx];
        let start = ticket.expiration_date.max(now);
        ticket.valid_from = start;
        ticket.expiration_date = FakeState::validity_end(start, &category);
        ticket.purchase_date = now;
        ticket.active = true;

        Ok(state.ticket_view(&state.tickets[idx]))
    }

    async fn cancel_ticket(&self, id: TicketId) -> Result<(), CoreError> {
        let mut state = self.enter(format!("cancel_ticket({id})")).await?;
        let idx = state.ticket_index(id)?;
        state.tickets[idx].active = false;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn seeded_ticket_views_use_frozen_clock() {
        let api = FakeBackend::new();
        let monthly = api.get_ticket(1).await.unwrap();
        assert_eq!(monthly.line_name.as_deref(), Some("Line 1 - Downtown Loop"));
        assert!(!monthly.expired);
        assert_eq!(monthly.days_remaining, 23);

        let single = api.get_ticket(2).await.unwrap();
        assert!(single.expired);
        assert_eq!(single.days_remaining, 0);
    }

    #[tokio::test]
    async fn set_route_recomputes_positions() {
        let api = FakeBackend::new();
        let line = api.set_route(1, &[3, 1, 3]).await.unwrap();
        let positions: Vec<(u32, StopId)> =
            line.stops.iter().map(|s| (s.order, s.stop_id)).collect();
        assert_eq!(positions, vec![(1, 3), (2, 1), (3, 3)]);
        assert_eq!(line.stops[0].stop_name, "Old Market Square");
    }

    #[tokio::test]
    async fn set_route_rejects_unknown_stop_without_change() {
        let api = FakeBackend::new();
        let err = api.set_route(1, &[2, 99]).await.unwrap_err();
        assert_eq!(err.to_string(), "Bus stop not found with id: 99");
        assert_eq!(api.get_line(1).await.unwrap().stop_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn purchase_expiration_follows_category() {
        let api = FakeBackend::new();
        let input = |category_id| PurchaseInput {
            passenger_name: "Ana".into(),
            passenger_email: "ana@example.com".into(),
            category_id,
            line_id: None,
            valid_from: Some(at("2026-02-10T08:00:00")),
        };

        let single = api.purchase_ticket(&input(1)).await.unwrap();
        assert_eq!(single.id, FIRST_PURCHASE_ID);
        assert_eq!(single.expiration_date, at("2026-02-10T10:00:00"));

        let weekly = api.purchase_ticket(&input(3)).await.unwrap();
        assert_eq!(weekly.expiration_date, at("2026-02-17T08:00:00"));
    }

    #[tokio::test]
    async fn renew_extends_from_later_of_expiry_and_now() {
        let api = FakeBackend::new();
        let renewed = api.renew_ticket(3).await.unwrap();
        assert_eq!(renewed.valid_from, at("2026-02-11T00:00:00"));
        assert_eq!(renewed.expiration_date, at("2026-02-18T00:00:00"));
        assert_eq!(renewed.purchase_date, at(FAKE_NOW));
    }

    #[tokio::test]
    async fn delete_line_with_active_tickets_only_deactivates() {
        let api = FakeBackend::new();
        api.delete_line(1).await.unwrap();
        assert!(!api.get_line(1).await.unwrap().active);

        api.delete_line(3).await.unwrap();
        assert!(api.get_line(3).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn tickets_are_newest_first_and_paged() {
        let api = FakeBackend::new();
        let page = api
            .list_tickets(&TicketFilter {
                size: 2,
                ..TicketFilter::default()
            })
            .await
            .unwrap();
        let ids: Vec<TicketId> = page.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next());
    }

    #[tokio::test]
    async fn injected_failure_hits_once_and_is_logged() {
        let api = FakeBackend::new();
        api.fail_next(503, "Service Unavailable").await;
        assert!(api.list_stops().await.is_err());
        assert!(api.list_stops().await.is_ok());
        assert_eq!(api.calls().await, vec!["list_stops", "list_stops"]);
    }

    #[tokio::test]
    async fn delayed_failure_skips_earlier_calls() {
        let api = FakeBackend::new();
        api.fail_after(1, 500, "Internal Server Error").await;
        assert!(api.list_stops().await.is_ok());
        assert!(api.list_lines().await.is_err());
        assert!(api.list_lines().await.is_ok());
    }
}
