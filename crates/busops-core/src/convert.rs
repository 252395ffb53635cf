// ── API-to-domain type conversions ──
//
// Bridges `busops_api` wire types and `busops_core::model` domain types.
// Responses convert into the model; request inputs convert into wire bodies.

use busops_api::types;

use crate::model::{BusLine, BusStop, Page, RouteStop, Ticket, TicketCategory};
use crate::requests::{CategoryInput, LineInput, PurchaseInput, StopInput, TicketFilter};

/// Clamp a server integer into an unsigned count. Negative values
/// never occur on a well-behaved server and read as zero.
fn non_negative<T: TryInto<u32>>(raw: T) -> u32 {
    raw.try_into().unwrap_or(0)
}

/// Blank optional text is omitted rather than sent as `""`.
fn optional_text(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

// ── Responses ──────────────────────────────────────────────────────

impl From<types::BusStopResponse> for BusStop {
    fn from(raw: types::BusStopResponse) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            latitude: raw.latitude,
            longitude: raw.longitude,
        }
    }
}

impl From<types::RouteStopResponse> for RouteStop {
    fn from(raw: types::RouteStopResponse) -> Self {
        Self {
            order: non_negative(raw.stop_order),
            stop_id: raw.stop_id,
            stop_name: raw.stop_name,
        }
    }
}

impl From<types::BusLineResponse> for BusLine {
    fn from(raw: types::BusLineResponse) -> Self {
        let mut stops: Vec<RouteStop> = raw.stops.into_iter().map(RouteStop::from).collect();
        stops.sort_by_key(|s| s.order);
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            active: raw.active,
            stops,
        }
    }
}

impl From<types::TicketCategoryResponse> for TicketCategory {
    fn from(raw: types::TicketCategoryResponse) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            duration_days: non_negative(raw.duration_days),
            price: raw.price,
            description: raw.description,
        }
    }
}

impl From<types::TicketResponse> for Ticket {
    fn from(raw: types::TicketResponse) -> Self {
        Self {
            id: raw.id,
            passenger_name: raw.passenger_name,
            passenger_email: raw.passenger_email,
            category_name: raw.category_name,
            line_name: raw.bus_line_name,
            purchase_date: raw.purchase_date,
            valid_from: raw.valid_from,
            expiration_date: raw.expiration_date,
            active: raw.active,
            expired: raw.expired,
            days_remaining: raw.days_remaining,
        }
    }
}

impl<A, B: From<A>> From<types::Page<A>> for Page<B> {
    fn from(raw: types::Page<A>) -> Self {
        Self {
            items: raw.content.into_iter().map(B::from).collect(),
            total_elements: u64::try_from(raw.total_elements).unwrap_or(0),
            total_pages: non_negative(raw.total_pages),
            number: non_negative(raw.number),
            size: non_negative(raw.size),
        }
    }
}

// ── Requests ───────────────────────────────────────────────────────

impl From<&StopInput> for types::BusStopRequest {
    fn from(input: &StopInput) -> Self {
        Self {
            name: input.name.trim().to_owned(),
            latitude: input.latitude,
            longitude: input.longitude,
        }
    }
}

impl From<&LineInput> for types::BusLineRequest {
    fn from(input: &LineInput) -> Self {
        Self {
            name: input.name.trim().to_owned(),
            description: optional_text(input.description.as_ref()),
        }
    }
}

impl From<&CategoryInput> for types::TicketCategoryRequest {
    fn from(input: &CategoryInput) -> Self {
        Self {
            name: input.name.trim().to_owned(),
            duration_days: i32::try_from(input.duration_days).unwrap_or(i32::MAX),
            price: input.price,
            description: optional_text(input.description.as_ref()),
        }
    }
}

impl From<&PurchaseInput> for types::TicketPurchaseRequest {
    fn from(input: &PurchaseInput) -> Self {
        Self {
            passenger_name: input.passenger_name.trim().to_owned(),
            passenger_email: input.passenger_email.trim().to_owned(),
            ticket_category_id: input.category_id,
            bus_line_id: input.line_id,
            valid_from: input.valid_from,
        }
    }
}

impl From<&TicketFilter> for types::TicketQuery {
    fn from(filter: &TicketFilter) -> Self {
        Self {
            email: optional_text(filter.email.as_ref()),
            active: filter.active,
            bus_line_id: filter.line_id,
            page: Some(filter.page),
            size: Some(filter.size),
        }
    }
}
