use serde::{Deserialize, Serialize};

use super::{LineId, StopId};

/// One persisted position in a line's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    /// 1-based, assigned by the server when the route is saved.
    pub order: u32,
    pub stop_id: StopId,
    pub stop_name: String,
}

/// A bus line and its ordered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusLine {
    pub id: LineId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub stops: Vec<RouteStop>,
}

impl BusLine {
    /// Stop ids in route order. Duplicates are kept.
    pub fn stop_ids(&self) -> Vec<StopId> {
        self.stops.iter().map(|s| s.stop_id).collect()
    }

    /// `Central Station → City Hall`, or `(no stops)`.
    pub fn route_summary(&self) -> String {
        if self.stops.is_empty() {
            return "(no stops)".into();
        }
        self.stops
            .iter()
            .map(|s| s.stop_name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    pub fn status_label(&self) -> &'static str {
        if self.active { "Active" } else { "Inactive" }
    }
}
