use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::TicketId;

/// Days remaining at or below which an active ticket is flagged.
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// A purchased ticket. `expired` and `days_remaining` are computed by the
/// server at response time and taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub passenger_name: String,
    pub passenger_email: String,
    pub category_name: String,
    pub line_name: Option<String>,
    pub purchase_date: NaiveDateTime,
    pub valid_from: NaiveDateTime,
    pub expiration_date: NaiveDateTime,
    pub active: bool,
    pub expired: bool,
    pub days_remaining: i64,
}

/// Display classification of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Cancelled,
    Expired,
    ExpiringSoon { days: i64 },
    Active { days: i64 },
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("Cancelled"),
            Self::Expired => f.write_str("Expired"),
            Self::ExpiringSoon { days } => write!(f, "Expiring Soon ({days}d)"),
            Self::Active { days } => write!(f, "Active ({days}d left)"),
        }
    }
}

impl Ticket {
    pub fn status(&self) -> TicketStatus {
        if !self.active {
            TicketStatus::Cancelled
        } else if self.expired {
            TicketStatus::Expired
        } else if self.days_remaining <= EXPIRING_SOON_DAYS {
            TicketStatus::ExpiringSoon {
                days: self.days_remaining,
            }
        } else {
            TicketStatus::Active {
                days: self.days_remaining,
            }
        }
    }

    /// The line a ticket is bound to, or `All lines`.
    pub fn line_label(&self) -> &str {
        self.line_name.as_deref().unwrap_or("All lines")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ticket(active: bool, expired: bool, days_remaining: i64) -> Ticket {
        let at = "2026-02-01T00:00:00".parse().unwrap();
        Ticket {
            id: 1,
            passenger_name: "John Doe".into(),
            passenger_email: "john@example.com".into(),
            category_name: "Monthly Pass".into(),
            line_name: None,
            purchase_date: at,
            valid_from: at,
            expiration_date: at,
            active,
            expired,
            days_remaining,
        }
    }

    #[test]
    fn cancelled_wins_over_expired() {
        assert_eq!(ticket(false, true, 0).status(), TicketStatus::Cancelled);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(ticket(true, true, 0).status(), TicketStatus::Expired);
        assert_eq!(
            ticket(true, false, 7).status(),
            TicketStatus::ExpiringSoon { days: 7 }
        );
        assert_eq!(
            ticket(true, false, 8).status(),
            TicketStatus::Active { days: 8 }
        );
        assert_eq!(ticket(true, false, 3).status().to_string(), "Expiring Soon (3d)");
        assert_eq!(ticket(true, false, 23).status().to_string(), "Active (23d left)");
    }

    #[test]
    fn unbound_ticket_covers_all_lines() {
        let mut t = ticket(true, false, 10);
        assert_eq!(t.line_label(), "All lines");
        t.line_name = Some("Line 1 - Downtown Loop".into());
        assert_eq!(t.line_label(), "Line 1 - Downtown Loop");
    }
}
