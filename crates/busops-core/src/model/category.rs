use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A purchasable ticket type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketCategory {
    pub id: CategoryId,
    pub name: String,
    /// Validity window in days. `0` means single-ride.
    pub duration_days: u32,
    pub price: f64,
    pub description: Option<String>,
}

impl TicketCategory {
    pub fn is_single_ride(&self) -> bool {
        self.duration_days == 0
    }

    /// Renewal policy. Single-ride categories cannot be renewed; the
    /// server enforces this, callers use it to decide what to offer.
    pub fn is_renewable(&self) -> bool {
        !self.is_single_ride()
    }

    /// `single ride` or `30 days`.
    pub fn validity_label(&self) -> String {
        match self.duration_days {
            0 => "single ride".into(),
            1 => "1 day".into(),
            n => format!("{n} days"),
        }
    }

    pub fn price_label(&self) -> String {
        format!("€{:.2}", self.price)
    }

    /// `Monthly Pass (30 days) - €45.00`, used in pickers.
    pub fn option_label(&self) -> String {
        format!(
            "{} ({}) - {}",
            self.name,
            self.validity_label(),
            self.price_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(duration_days: u32, price: f64) -> TicketCategory {
        TicketCategory {
            id: 1,
            name: "Pass".into(),
            duration_days,
            price,
            description: None,
        }
    }

    #[test]
    fn renewal_policy_follows_duration() {
        assert!(!category(0, 1.5).is_renewable());
        assert!(category(7, 15.0).is_renewable());
    }

    #[test]
    fn labels() {
        assert_eq!(category(0, 1.5).validity_label(), "single ride");
        assert_eq!(category(30, 45.0).validity_label(), "30 days");
        assert_eq!(category(30, 45.0).price_label(), "€45.00");
        assert_eq!(category(1, 2.0).option_label(), "Pass (1 day) - €2.00");
    }
}
