//! My-tickets screen: search by email and status, page through results,
//! renew or cancel the selected ticket.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use busops_core::LineId;
use busops_core::pages::TicketsPage;

use super::{Api, Shared};
use crate::action::Action;
use crate::component::Component;
use crate::widgets;
use crate::theme;

pub struct TicketsScreen {
    shared: Shared<TicketsPage>,
    table: TableState,
    editing_email: bool,
    throbber: ThrobberState,
}

impl TicketsScreen {
    pub fn new(api: Api) -> Self {
        Self {
            shared: Shared::new(TicketsPage::default(), api),
            table: TableState::default().with_selected(Some(0)),
            editing_email: false,
            throbber: ThrobberState::default(),
        }
    }

    fn search(&self) {
        self.shared
            .run("tickets.search", |page, api| Box::pin(page.search(api)));
    }
}

/// Step the line filter through `All lines` and every known line.
fn cycle_line(page: &mut TicketsPage) {
    let ids: Vec<Option<LineId>> = std::iter::once(None)
        .chain(page.lines.iter().map(|l| Some(l.id)))
        .collect();
    let next = ids
        .iter()
        .position(|id| *id == page.line_id)
        .map_or(0, |i| (i + 1) % ids.len());
    page.line_id = ids.get(next).copied().flatten();
}

fn line_filter_label(page: &TicketsPage) -> String {
    page.line_id
        .and_then(|id| page.lines.iter().find(|l| l.id == id))
        .map_or_else(|| "All lines".into(), |l| l.name.clone())
}

/// Email input keys. Returns `true` when a search should run.
fn email_key(page: &mut TicketsPage, editing: &mut bool, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => {
            *editing = false;
            return true;
        }
        KeyCode::Esc => *editing = false,
        KeyCode::Backspace => {
            page.email.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => page.email.push(c),
        _ => {}
    }
    false
}

impl Component for TicketsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.shared.attach(action_tx);
        self.shared
            .run("tickets.mount", |page, api| Box::pin(page.mount(api)));
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(mut page) = self.shared.try_page() else {
            return Ok(None);
        };

        if self.editing_email {
            if email_key(&mut page, &mut self.editing_email, key) {
                drop(page);
                self.search();
            }
            return Ok(None);
        }

        let len = page.tickets().len();
        let selected = self
            .table
            .selected()
            .and_then(|i| page.tickets().get(i))
            .cloned();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(widgets::step(self.table.selected(), len, 1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(widgets::step(self.table.selected(), len, -1));
            }
            KeyCode::Char('/') => self.editing_email = true,
            KeyCode::Char('f') => {
                page.status = page.status.cycle();
                drop(page);
                self.search();
            }
            KeyCode::Char('l') => {
                cycle_line(&mut page);
                drop(page);
                self.search();
            }
            KeyCode::Enter | KeyCode::Char('s') => {
                drop(page);
                self.search();
            }
            KeyCode::Char(']' | 'n') | KeyCode::PageDown => {
                drop(page);
                self.table.select(Some(0));
                self.shared
                    .run("tickets.next_page", |page, api| Box::pin(page.next_page(api)));
            }
            KeyCode::Char('[' | 'p') | KeyCode::PageUp => {
                drop(page);
                self.table.select(Some(0));
                self.shared
                    .run("tickets.prev_page", |page, api| Box::pin(page.prev_page(api)));
            }
            KeyCode::Char('R') => {
                if let Some(ticket) = selected {
                    if page.can_renew(&ticket) {
                        drop(page);
                        let id = ticket.id;
                        self.shared.run("tickets.renew", move |page, api| {
                            Box::pin(async move { page.renew(api, id).await.map(drop) })
                        });
                    } else if ticket.active && ticket.expired {
                        page.banner.error(format!("Ticket #{} has expired", ticket.id));
                    } else {
                        page.banner
                            .error(format!("{} tickets cannot be renewed", ticket.category_name));
                    }
                }
            }
            KeyCode::Char('c') => {
                if let Some(ticket) = selected {
                    if TicketsPage::can_cancel(&ticket) {
                        if let Some(pending) = page.request_cancel(ticket.id) {
                            return Ok(Some(Action::ShowConfirm(pending.prompt.clone())));
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber.calc_next(),
            Action::ConfirmYes | Action::ConfirmNo => {
                let accepted = *action == Action::ConfirmYes;
                self.shared.run("tickets.cancel", move |page, api| {
                    Box::pin(async move { page.resolve_cancel(api, accepted).await.map(drop) })
                });
            }
            Action::PageUpdated => {
                if let Some(page) = self.shared.try_page() {
                    let len = page.tickets().len();
                    self.table.select(widgets::step(self.table.selected(), len, 0));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(page) = self.shared.try_page() else {
            let inner = widgets::panel(frame, area, "My Tickets", true);
            widgets::loading(frame, inner, &self.throbber);
            return;
        };
        let inner = widgets::panel(frame, area, "My Tickets", true);
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let email = if self.editing_email {
            Span::styled(format!("{}▏", page.email), theme::field_focused())
        } else if page.email.is_empty() {
            Span::styled("(any)", theme::key_hint())
        } else {
            Span::styled(page.email.clone(), theme::table_row())
        };
        let filters = Line::from(vec![
            Span::styled(" Email ", theme::key_hint_key()),
            email,
            Span::styled("   Status ", theme::key_hint_key()),
            Span::styled(page.status.to_string(), theme::table_row()),
            Span::styled("   Line ", theme::key_hint_key()),
            Span::styled(line_filter_label(&page), theme::table_row()),
        ]);
        frame.render_widget(Paragraph::new(filters), layout[0]);
        frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[1]);

        match (&page.results, page.empty_state()) {
            (None, _) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        " Press / to enter an email, Enter to search.",
                        theme::key_hint(),
                    )),
                    layout[2],
                );
            }
            (Some(_), Some(empty)) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!(" {empty}"), theme::key_hint())),
                    layout[2],
                );
            }
            (Some(results), None) => {
                let header = Row::new(
                    ["ID", "Passenger", "Category", "Line", "Valid from", "Expires", "Status"]
                        .map(|h| Cell::from(h).style(theme::table_header())),
                );
                let rows = results.items.iter().map(|t| {
                    let status = t.status();
                    Row::new(vec![
                        Cell::from(t.id.to_string()),
                        Cell::from(format!("{} <{}>", t.passenger_name, t.passenger_email)),
                        Cell::from(t.category_name.clone()),
                        Cell::from(t.line_label().to_owned()),
                        Cell::from(t.valid_from.format("%Y-%m-%d %H:%M").to_string()),
                        Cell::from(t.expiration_date.format("%Y-%m-%d %H:%M").to_string()),
                        Cell::from(status.to_string()).style(theme::ticket_status(status)),
                    ])
                    .style(theme::table_row())
                });
                let table = Table::new(
                    rows,
                    [
                        Constraint::Length(5),
                        Constraint::Min(24),
                        Constraint::Length(14),
                        Constraint::Length(22),
                        Constraint::Length(17),
                        Constraint::Length(17),
                        Constraint::Length(22),
                    ],
                )
                .header(header)
                .row_highlight_style(theme::table_selected())
                .highlight_symbol("▸");
                let mut state = self.table;
                frame.render_stateful_widget(table, layout[2], &mut state);

                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!(" {}", results.position_label()),
                        theme::key_hint(),
                    )),
                    layout[3],
                );
            }
        }

        let hints: &[(&str, &str)] = if self.editing_email {
            &[("Enter", "search"), ("Esc", "done")]
        } else {
            &[
                ("/", "email"),
                ("f", "status"),
                ("l", "line"),
                ("[/]", "page"),
                ("R", "renew"),
                ("c", "cancel"),
            ]
        };
        widgets::hints(frame, layout[4], hints);
    }

    fn captures_input(&self) -> bool {
        self.editing_email
    }

    fn id(&self) -> &str {
        "My Tickets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busops_core::FakeBackend;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn email_input_edits_and_submits() {
        let mut page = TicketsPage::default();
        let mut editing = true;
        for c in "jane@example.comx".chars() {
            assert!(!email_key(&mut page, &mut editing, press(KeyCode::Char(c))));
        }
        email_key(&mut page, &mut editing, press(KeyCode::Backspace));
        assert_eq!(page.email, "jane@example.com");

        assert!(email_key(&mut page, &mut editing, press(KeyCode::Enter)));
        assert!(!editing);
    }

    #[tokio::test]
    async fn line_filter_wraps_back_to_all_lines() {
        let api = FakeBackend::new();
        let mut page = TicketsPage::default();
        page.mount(&api).await.ok();
        let count = page.lines.len();

        cycle_line(&mut page);
        assert_eq!(page.line_id, Some(1));
        for _ in 0..count {
            cycle_line(&mut page);
        }
        assert_eq!(page.line_id, None);
        assert_eq!(line_filter_label(&page), "All lines");
    }
}
