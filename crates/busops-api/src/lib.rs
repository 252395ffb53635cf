// busops-api: Async Rust client for the bus-ticketing administration API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::TicketingClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
