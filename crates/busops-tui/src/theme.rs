//! Color palette and semantic styles for the console.

use busops_core::TicketStatus;
use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ROUTE_AMBER: Color = Color::Rgb(255, 184, 76); // #ffb84c
pub const SIGNAL_TEAL: Color = Color::Rgb(94, 234, 212); // #5eead4
pub const GO_GREEN: Color = Color::Rgb(74, 222, 128); // #4ade80
pub const STOP_RED: Color = Color::Rgb(248, 113, 113); // #f87171
pub const CAUTION_YELLOW: Color = Color::Rgb(250, 204, 21); // #facc15

pub const TEXT: Color = Color::Rgb(203, 213, 225); // #cbd5e1
pub const MUTED: Color = Color::Rgb(100, 116, 139); // #64748b
pub const BG_PANEL: Color = Color::Rgb(30, 41, 59); // #1e293b
pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0f172a

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(SIGNAL_TEAL).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ROUTE_AMBER)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(SIGNAL_TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ROUTE_AMBER)
        .bg(BG_PANEL)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(ROUTE_AMBER).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

/// Key hint text (e.g. "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(SIGNAL_TEAL).add_modifier(Modifier::BOLD)
}

/// Active/inactive badge colors.
pub fn badge(active: bool) -> Style {
    Style::default().fg(if active { GO_GREEN } else { STOP_RED })
}

pub fn banner_info() -> Style {
    Style::default().fg(GO_GREEN)
}

pub fn banner_error() -> Style {
    Style::default().fg(STOP_RED).add_modifier(Modifier::BOLD)
}

/// The input field that currently has focus.
pub fn field_focused() -> Style {
    Style::default().fg(ROUTE_AMBER).bg(BG_PANEL)
}

pub fn ticket_status(status: TicketStatus) -> Style {
    let color = match status {
        TicketStatus::Active { .. } => GO_GREEN,
        TicketStatus::ExpiringSoon { .. } => CAUTION_YELLOW,
        TicketStatus::Expired => MUTED,
        TicketStatus::Cancelled => STOP_RED,
    };
    Style::default().fg(color)
}
