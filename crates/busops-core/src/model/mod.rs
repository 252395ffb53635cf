// ── Domain model ──
//
// Canonical types shared by the CLI and TUI. Built from `busops_api`
// wire types in `convert.rs`; business rules stay on the server, only
// presentation helpers live here.

pub mod category;
pub mod line;
pub mod page;
pub mod stop;
pub mod ticket;

pub use category::TicketCategory;
pub use line::{BusLine, RouteStop};
pub use page::Page;
pub use stop::BusStop;
pub use ticket::{Ticket, TicketStatus};

pub type StopId = i64;
pub type LineId = i64;
pub type CategoryId = i64;
pub type TicketId = i64;
