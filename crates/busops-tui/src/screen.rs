//! Navigation table: page paths, screen identifiers and tab order.

use std::fmt;

use busops_core::LineId;

/// Identifies each console screen. All but `LineDetail` sit in the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard, // 1
    Lines,      // 2
    Stops,      // 3
    Categories, // 4
    BuyTicket,  // 5
    Tickets,    // 6
    /// Reached from the lines screen; not in the tab bar.
    LineDetail,
}

impl ScreenId {
    /// Screens in tab-bar order.
    pub const TABS: [ScreenId; 6] = [
        Self::Dashboard,
        Self::Lines,
        Self::Stops,
        Self::Categories,
        Self::BuyTicket,
        Self::Tickets,
    ];

    /// Number key (1-6). Line detail has none.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Lines => 2,
            Self::Stops => 3,
            Self::Categories => 4,
            Self::BuyTicket => 5,
            Self::Tickets => 6,
            Self::LineDetail => 0,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::TABS.iter().copied().find(|s| s.number() == n)
    }

    /// Next tab (wraps). Line detail counts as the lines tab.
    pub fn next(self) -> Self {
        let idx = self.tab_index();
        Self::TABS[(idx + 1) % Self::TABS.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.tab_index();
        Self::TABS[(idx + Self::TABS.len() - 1) % Self::TABS.len()]
    }

    /// Position in [`ScreenId::TABS`].
    pub fn tab_index(self) -> usize {
        let this = if self == Self::LineDetail {
            Self::Lines
        } else {
            self
        };
        Self::TABS.iter().position(|&s| s == this).unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Home",
            Self::Lines => "Bus Lines",
            Self::Stops => "Bus Stops",
            Self::Categories => "Categories",
            Self::BuyTicket => "Buy Ticket",
            Self::Tickets => "My Tickets",
            Self::LineDetail => "Line",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Routes ────────────────────────────────────────────────────────────

/// A page address. Maps one-to-one onto the paths the console serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    BusLines,
    BusLine(LineId),
    BusStops,
    TicketCategories,
    BuyTicket,
    MyTickets,
}

impl Route {
    /// Resolve a path such as `/bus-lines/4`. Unknown paths give `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);
        match trimmed {
            "/" | "" => Some(Self::Dashboard),
            "/bus-lines" => Some(Self::BusLines),
            "/bus-stops" => Some(Self::BusStops),
            "/ticket-categories" => Some(Self::TicketCategories),
            "/buy-ticket" => Some(Self::BuyTicket),
            "/my-tickets" => Some(Self::MyTickets),
            other => other
                .strip_prefix("/bus-lines/")
                .and_then(|id| id.parse().ok())
                .map(Self::BusLine),
        }
    }

    pub fn path(self) -> String {
        match self {
            Self::Dashboard => "/".into(),
            Self::BusLines => "/bus-lines".into(),
            Self::BusLine(id) => format!("/bus-lines/{id}"),
            Self::BusStops => "/bus-stops".into(),
            Self::TicketCategories => "/ticket-categories".into(),
            Self::BuyTicket => "/buy-ticket".into(),
            Self::MyTickets => "/my-tickets".into(),
        }
    }

    pub fn screen(self) -> ScreenId {
        match self {
            Self::Dashboard => ScreenId::Dashboard,
            Self::BusLines => ScreenId::Lines,
            Self::BusLine(_) => ScreenId::LineDetail,
            Self::BusStops => ScreenId::Stops,
            Self::TicketCategories => ScreenId::Categories,
            Self::BuyTicket => ScreenId::BuyTicket,
            Self::MyTickets => ScreenId::Tickets,
        }
    }
}

impl From<ScreenId> for Route {
    /// The tab's own page. Line detail has no id here, so it maps to the list.
    fn from(id: ScreenId) -> Self {
        match id {
            ScreenId::Dashboard => Self::Dashboard,
            ScreenId::Lines | ScreenId::LineDetail => Self::BusLines,
            ScreenId::Stops => Self::BusStops,
            ScreenId::Categories => Self::TicketCategories,
            ScreenId::BuyTicket => Self::BuyTicket,
            ScreenId::Tickets => Self::MyTickets,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
