// Async HTTP client for the bus-ticketing REST API.
//
// Base path: /api/
// No authentication; the server owns every business rule.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the ticketing API.
///
/// Every call resolves to the decoded payload on 2xx, to `()` on
/// empty responses, and to a single [`Error::Api`] on any other status.
/// No call is retried.
#[derive(Debug, Clone)]
pub struct TicketingClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TicketingClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/api/`.
    ///
    /// `http://host:8080` and `http://host:8080/api` both become
    /// `http://host:8080/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Prefer the server's `message` field; fall back to the status text.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let status_text = status
            .canonical_reason()
            .map_or_else(|| status.as_u16().to_string(), str::to_owned);

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(status_text);

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Bus stops ────────────────────────────────────────────────────

    pub async fn list_bus_stops(&self) -> Result<Vec<types::BusStopResponse>, Error> {
        self.get("bus-stops").await
    }

    pub async fn create_bus_stop(
        &self,
        body: &types::BusStopRequest,
    ) -> Result<types::BusStopResponse, Error> {
        self.post("bus-stops", body).await
    }

    pub async fn update_bus_stop(
        &self,
        id: i64,
        body: &types::BusStopRequest,
    ) -> Result<types::BusStopResponse, Error> {
        self.put(&format!("bus-stops/{id}"), body).await
    }

    pub async fn delete_bus_stop(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("bus-stops/{id}")).await
    }

    // ── Bus lines ────────────────────────────────────────────────────

    pub async fn list_bus_lines(&self) -> Result<Vec<types::BusLineResponse>, Error> {
        self.get("bus-lines").await
    }

    pub async fn get_bus_line(&self, id: i64) -> Result<types::BusLineResponse, Error> {
        self.get(&format!("bus-lines/{id}")).await
    }

    pub async fn create_bus_line(
        &self,
        body: &types::BusLineRequest,
    ) -> Result<types::BusLineResponse, Error> {
        self.post("bus-lines", body).await
    }

    pub async fn update_bus_line(
        &self,
        id: i64,
        body: &types::BusLineRequest,
    ) -> Result<types::BusLineResponse, Error> {
        self.put(&format!("bus-lines/{id}"), body).await
    }

    pub async fn delete_bus_line(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("bus-lines/{id}")).await
    }

    /// Replace the whole route of a line in one request.
    pub async fn set_route(
        &self,
        id: i64,
        stop_ids: &[i64],
    ) -> Result<types::BusLineResponse, Error> {
        let body = types::RouteRequest {
            stop_ids: stop_ids.to_vec(),
        };
        self.put(&format!("bus-lines/{id}/route"), &body).await
    }

    pub async fn get_route(&self, id: i64) -> Result<Vec<types::RouteStopResponse>, Error> {
        self.get(&format!("bus-lines/{id}/route")).await
    }

    // ── Ticket categories ────────────────────────────────────────────

    pub async fn list_ticket_categories(
        &self,
    ) -> Result<Vec<types::TicketCategoryResponse>, Error> {
        self.get("ticket-categories").await
    }

    pub async fn create_ticket_category(
        &self,
        body: &types::TicketCategoryRequest,
    ) -> Result<types::TicketCategoryResponse, Error> {
        self.post("ticket-categories", body).await
    }

    pub async fn update_ticket_category(
        &self,
        id: i64,
        body: &types::TicketCategoryRequest,
    ) -> Result<types::TicketCategoryResponse, Error> {
        self.put(&format!("ticket-categories/{id}"), body).await
    }

    pub async fn delete_ticket_category(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("ticket-categories/{id}")).await
    }

    // ── Tickets ──────────────────────────────────────────────────────

    pub async fn list_tickets(
        &self,
        query: &types::TicketQuery,
    ) -> Result<types::Page<types::TicketResponse>, Error> {
        self.get_with_params("tickets", &query.to_params()).await
    }

    pub async fn get_ticket(&self, id: i64) -> Result<types::TicketResponse, Error> {
        self.get(&format!("tickets/{id}")).await
    }

    pub async fn purchase_ticket(
        &self,
        body: &types::TicketPurchaseRequest,
    ) -> Result<types::TicketResponse, Error> {
        self.post("tickets", body).await
    }

    pub async fn renew_ticket(&self, id: i64) -> Result<types::TicketResponse, Error> {
        self.post_empty(&format!("tickets/{id}/renew")).await
    }

    /// Cancel a ticket. The server answers `204 No Content`.
    pub async fn cancel_ticket(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("tickets/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_suffix() {
        let url = TicketingClient::normalize_base_url("http://localhost:8080").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn base_url_keeps_existing_api_suffix() {
        let url = TicketingClient::normalize_base_url("https://tickets.example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://tickets.example.com/api/");
    }

    #[test]
    fn base_url_under_prefix() {
        let url = TicketingClient::normalize_base_url("https://host/transit").unwrap();
        assert_eq!(url.as_str(), "https://host/transit/api/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            TicketingClient::normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
