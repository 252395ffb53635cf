//! Domain layer between `busops-api` and the consoles (CLI / TUI).
//!
//! - **[`TicketingApi`]**: the async seam every consumer talks to.
//!   [`HttpBackend`] drives the real REST server; [`FakeBackend`] is a
//!   seeded in-memory server with a frozen clock, used by tests and by
//!   `--demo`.
//!
//! - **[`RouteEditor`]**: working-copy editing of a bus line's stop
//!   sequence, persisted with a single replace-route request.
//!
//! - **[`pages`]**: headless page models (stops, lines, line detail,
//!   categories, tickets, purchase, dashboard). Each loads on mount, keeps
//!   its own form state and reloads after a successful mutation.
//!
//! - **Domain model** ([`model`]): canonical types decoded from the wire
//!   DTOs, with presentation helpers only. Business rules live server-side.

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod fake;
pub mod model;
pub mod pages;
pub mod requests;
pub mod route_editor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{HttpBackend, TicketingApi};
pub use config::{ApiConfig, TlsVerification};
pub use error::CoreError;
pub use fake::FakeBackend;
pub use requests::{CategoryInput, LineInput, PurchaseInput, StopInput, TicketFilter};
pub use route_editor::{Direction, RouteEditor};

pub use model::{
    BusLine, BusStop, CategoryId, LineId, Page, RouteStop, StopId, Ticket, TicketCategory,
    TicketId, TicketStatus,
};
