//! Wire types for the ticketing REST API.
//!
//! All types match the JSON bodies of `/api/` endpoints.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Spring-style page wrapper returned by `GET /api/tickets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i32,
    /// Zero-based page index.
    pub number: i32,
    pub size: i32,
}

// ── Bus stops ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStopResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Body for `POST /api/bus-stops` and `PUT /api/bus-stops/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStopRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

// ── Bus lines ────────────────────────────────────────────────────────

/// One entry of a persisted route. `stopOrder` is 1-based and assigned
/// by the server on every route replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopResponse {
    pub stop_order: i32,
    pub stop_id: i64,
    pub stop_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusLineResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub stops: Vec<RouteStopResponse>,
}

/// Body for `POST /api/bus-lines` and `PUT /api/bus-lines/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusLineRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `PUT /api/bus-lines/{id}/route`. Replaces the whole route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub stop_ids: Vec<i64>,
}

// ── Ticket categories ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCategoryResponse {
    pub id: i64,
    pub name: String,
    /// `0` marks a single-ride category.
    pub duration_days: i32,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST /api/ticket-categories` and `PUT /api/ticket-categories/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCategoryRequest {
    pub name: String,
    pub duration_days: i32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Tickets ──────────────────────────────────────────────────────────

/// Ticket as returned by the server. `expired` and `daysRemaining` are
/// computed server-side at response time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i64,
    pub passenger_name: String,
    pub passenger_email: String,
    pub category_name: String,
    #[serde(default)]
    pub bus_line_name: Option<String>,
    pub purchase_date: NaiveDateTime,
    pub valid_from: NaiveDateTime,
    pub expiration_date: NaiveDateTime,
    pub active: bool,
    pub expired: bool,
    pub days_remaining: i64,
}

/// Body for `POST /api/tickets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPurchaseRequest {
    pub passenger_name: String,
    pub passenger_email: String,
    pub ticket_category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_line_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDateTime>,
}

/// Filters and paging for `GET /api/tickets`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketQuery {
    pub email: Option<String>,
    pub active: Option<bool>,
    pub bus_line_id: Option<i64>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl TicketQuery {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    /// Render as query parameters. Paging and the newest-first sort are
    /// always sent; filters only when set.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            params.push(("email", email.to_owned()));
        }
        if let Some(active) = self.active {
            params.push(("active", active.to_string()));
        }
        if let Some(line) = self.bus_line_id {
            params.push(("busLineId", line.to_string()));
        }
        params.push(("page", self.page.unwrap_or(0).to_string()));
        params.push((
            "size",
            self.size.unwrap_or(Self::DEFAULT_PAGE_SIZE).to_string(),
        ));
        params.push(("sort", "purchaseDate,desc".to_owned()));
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticket_query_defaults() {
        let params = TicketQuery::default().to_params();
        assert_eq!(
            params,
            vec![
                ("page", "0".to_owned()),
                ("size", "20".to_owned()),
                ("sort", "purchaseDate,desc".to_owned()),
            ]
        );
    }

    #[test]
    fn ticket_query_skips_blank_email() {
        let query = TicketQuery {
            email: Some(String::new()),
            active: Some(false),
            size: Some(10),
            ..TicketQuery::default()
        };
        let params = query.to_params();
        assert!(params.iter().all(|(k, _)| *k != "email"));
        assert!(params.contains(&("active", "false".to_owned())));
        assert!(params.contains(&("size", "10".to_owned())));
    }

    #[test]
    fn purchase_request_omits_unset_optionals() {
        let body = TicketPurchaseRequest {
            passenger_name: "Ana".into(),
            passenger_email: "ana@example.com".into(),
            ticket_category_id: 2,
            bus_line_id: None,
            valid_from: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "passengerName": "Ana",
                "passengerEmail": "ana@example.com",
                "ticketCategoryId": 2,
            })
        );
    }

    #[test]
    fn ticket_decodes_local_timestamps() {
        let ticket: TicketResponse = serde_json::from_value(json!({
            "id": 1,
            "passengerName": "John Doe",
            "passengerEmail": "john@example.com",
            "categoryName": "Monthly Pass",
            "busLineName": null,
            "purchaseDate": "2026-02-01T10:00:00",
            "validFrom": "2026-02-01T00:00:00",
            "expirationDate": "2026-03-03T00:00:00",
            "active": true,
            "expired": false,
            "daysRemaining": 25
        }))
        .unwrap();
        assert_eq!(ticket.bus_line_name, None);
        assert_eq!(ticket.expiration_date.to_string(), "2026-03-03 00:00:00");
    }
}
