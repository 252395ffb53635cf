//! Small shared widgets: page banner, loading throbber, hint rows.

pub mod form;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use busops_core::pages::{Banner, BannerKind};

use crate::theme;

/// One-line banner text, or an empty line when the page has nothing to say.
pub fn banner_line(banner: &Banner) -> Line<'static> {
    match (banner.kind(), banner.message()) {
        (Some(BannerKind::Error), Some(msg)) => {
            Line::from(Span::styled(format!(" ✗ {msg}"), theme::banner_error()))
        }
        (Some(BannerKind::Info), Some(msg)) => {
            Line::from(Span::styled(format!(" ✓ {msg}"), theme::banner_info()))
        }
        _ => Line::from(""),
    }
}

/// Shown while a backend call holds the page model.
pub fn loading(frame: &mut Frame, area: Rect, state: &ThrobberState) {
    let throbber = Throbber::default()
        .label("  Loading...")
        .style(Style::default().fg(theme::SIGNAL_TEAL))
        .throbber_style(Style::default().fg(theme::ROUTE_AMBER));
    frame.render_stateful_widget(throbber, area, &mut state.clone());
}

/// Bordered panel; returns the inner area.
pub fn panel(frame: &mut Frame, area: Rect, title: &str, focused: bool) -> Rect {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// `key description` pairs rendered as a hint row.
pub fn hints(frame: &mut Frame, area: Rect, pairs: &[(&str, &str)]) {
    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in pairs {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled((*desc).to_owned(), theme::key_hint()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Move a selection by `delta` within `len` rows, clamped.
pub fn step(selected: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = selected.unwrap_or(0);
    let next = current.saturating_add_signed(delta).min(len - 1);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_clamps_to_rows() {
        assert_eq!(step(None, 0, 1), None);
        assert_eq!(step(None, 3, 1), Some(1));
        assert_eq!(step(Some(2), 3, 1), Some(2));
        assert_eq!(step(Some(0), 3, -1), Some(0));
        assert_eq!(step(Some(9), 3, 0), Some(2));
    }
}
