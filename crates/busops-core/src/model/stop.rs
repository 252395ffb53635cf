use serde::{Deserialize, Serialize};

use super::StopId;

/// A named point a bus can visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    pub id: StopId,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl BusStop {
    /// `41.9973, 21.4280`, or `-` when either coordinate is missing.
    pub fn coordinates_label(&self) -> String {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => format!("{lat:.4}, {lon:.4}"),
            _ => "-".into(),
        }
    }
}
