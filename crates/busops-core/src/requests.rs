// ── Typed inputs for mutating backend calls ──
//
// What pages and commands hand to a `TicketingApi`. These are already
// parsed from operator input; semantic validation is the server's job.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{CategoryId, LineId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopInput {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub duration_days: u32,
    pub price: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub passenger_name: String,
    pub passenger_email: String,
    pub category_id: CategoryId,
    /// `None` buys a ticket valid on all lines.
    pub line_id: Option<LineId>,
    /// `None` lets the server start validity at purchase time.
    pub valid_from: Option<NaiveDateTime>,
}

/// Ticket search filters. Results come back newest purchase first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFilter {
    /// Exact passenger email match.
    pub email: Option<String>,
    pub active: Option<bool>,
    pub line_id: Option<LineId>,
    pub page: u32,
    pub size: u32,
}

impl TicketFilter {
    pub const DEFAULT_SIZE: u32 = 20;
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self {
            email: None,
            active: None,
            line_id: None,
            page: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}
