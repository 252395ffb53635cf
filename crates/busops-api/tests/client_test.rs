// Integration tests for `TicketingClient` using wiremock.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use busops_api::types::{BusStopRequest, TicketPurchaseRequest, TicketQuery};
use busops_api::{Error, TicketingClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TicketingClient) {
    let server = MockServer::start().await;
    let client = TicketingClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn ticket_json(id: i64, line: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "passengerName": "John Doe",
        "passengerEmail": "john@example.com",
        "categoryName": "Monthly Pass",
        "busLineName": line,
        "purchaseDate": "2026-02-01T10:00:00",
        "validFrom": "2026-02-01T00:00:00",
        "expirationDate": "2026-03-03T00:00:00",
        "active": true,
        "expired": false,
        "daysRemaining": 25
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_bus_lines_with_routes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bus-lines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "Line 1 - Downtown Loop",
                "description": "Circular route",
                "active": true,
                "stops": [
                    { "stopOrder": 1, "stopId": 1, "stopName": "Central Station" },
                    { "stopOrder": 2, "stopId": 2, "stopName": "City Hall" }
                ]
            },
            { "id": 3, "name": "Line 3 - Inactive", "description": null, "active": false, "stops": [] }
        ])))
        .mount(&server)
        .await;

    let lines = client.list_bus_lines().await.unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].stops.len(), 2);
    assert_eq!(lines[0].stops[1].stop_order, 2);
    assert_eq!(lines[0].stops[1].stop_name, "City Hall");
    assert!(!lines[1].active);
    assert_eq!(lines[1].description, None);
}

#[tokio::test]
async fn test_set_route_sends_full_sequence() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/bus-lines/1/route"))
        .and(body_json(json!({ "stopIds": [2, 1, 2] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Line 1",
            "description": null,
            "active": true,
            "stops": [
                { "stopOrder": 1, "stopId": 2, "stopName": "City Hall" },
                { "stopOrder": 2, "stopId": 1, "stopName": "Central Station" },
                { "stopOrder": 3, "stopId": 2, "stopName": "City Hall" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let line = client.set_route(1, &[2, 1, 2]).await.unwrap();
    let orders: Vec<i32> = line.stops.iter().map(|s| s.stop_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_create_bus_stop_omits_blank_coordinates() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bus-stops"))
        .and(body_json(json!({ "name": "Depot" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "name": "Depot", "latitude": null, "longitude": null
        })))
        .mount(&server)
        .await;

    let body = BusStopRequest {
        name: "Depot".into(),
        latitude: None,
        longitude: None,
    };
    let stop = client.create_bus_stop(&body).await.unwrap();
    assert_eq!(stop.id, 9);
    assert_eq!(stop.latitude, None);
}

#[tokio::test]
async fn test_list_tickets_sends_filters_and_paging() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .and(query_param("email", "john@example.com"))
        .and(query_param("active", "true"))
        .and(query_param("page", "1"))
        .and(query_param("size", "10"))
        .and(query_param("sort", "purchaseDate,desc"))
        .and(query_param_is_missing("busLineId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [ticket_json(1, Some("Line 1 - Downtown Loop"))],
            "totalElements": 11,
            "totalPages": 2,
            "number": 1,
            "size": 10
        })))
        .mount(&server)
        .await;

    let query = TicketQuery {
        email: Some("john@example.com".into()),
        active: Some(true),
        bus_line_id: None,
        page: Some(1),
        size: Some(10),
    };
    let page = client.list_tickets(&query).await.unwrap();

    assert_eq!(page.total_elements, 11);
    assert_eq!(page.number, 1);
    assert_eq!(page.content[0].bus_line_name.as_deref(), Some("Line 1 - Downtown Loop"));
}

#[tokio::test]
async fn test_purchase_ticket_without_line() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/tickets"))
        .and(body_json(json!({
            "passengerName": "John Doe",
            "passengerEmail": "john@example.com",
            "ticketCategoryId": 2
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ticket_json(100, None)))
        .mount(&server)
        .await;

    let body = TicketPurchaseRequest {
        passenger_name: "John Doe".into(),
        passenger_email: "john@example.com".into(),
        ticket_category_id: 2,
        bus_line_id: None,
        valid_from: None,
    };
    let ticket = client.purchase_ticket(&body).await.unwrap();
    assert_eq!(ticket.id, 100);
    assert_eq!(ticket.bus_line_name, None);
    assert!(ticket.active);
}

#[tokio::test]
async fn test_cancel_ticket_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/tickets/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.cancel_ticket(3).await.unwrap();
}

#[tokio::test]
async fn test_base_url_with_api_suffix() {
    let server = MockServer::start().await;
    let client =
        TicketingClient::from_reqwest(&format!("{}/api", server.uri()), reqwest::Client::new())
            .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/ticket-categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.list_ticket_categories().await.unwrap().is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_uses_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/tickets/2/renew"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "message": "Single ride tickets cannot be renewed"
        })))
        .mount(&server)
        .await;

    let err = client.renew_ticket(2).await.unwrap_err();

    match err {
        Error::Api { status, ref message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Single ride tickets cannot be renewed");
        }
        ref other => panic!("expected Api error, got: {other:?}"),
    }
    assert_eq!(err.to_string(), "Single ride tickets cannot be renewed");
}

#[tokio::test]
async fn test_error_without_body_uses_status_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bus-stops"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_bus_stops().await.unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 503, ref message } if message == "Service Unavailable"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_error_404_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bus-lines/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Bus line not found with id: 42"
        })))
        .mount(&server)
        .await;

    let err = client.get_bus_line(42).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Bus line not found with id: 42");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tickets/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_ticket(1).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { ref body, .. } if body.contains("oops")));
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let client =
        TicketingClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();
    let err = client.list_bus_lines().await.unwrap_err();
    assert!(err.is_transient(), "got: {err:?}");
}
