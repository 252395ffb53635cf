//! Bus lines screen. The create/edit form carries a route editor, so a
//! new line can be saved together with its stops.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use busops_core::BusStop;
use busops_core::pages::{LineForm, LinesPage};

use super::{Api, Shared, StopPicker};
use crate::action::Action;
use crate::component::Component;
use crate::screen::Route;
use crate::widgets::{self, form, form::FormKey};
use crate::theme;

pub struct LinesScreen {
    shared: Shared<LinesPage>,
    table: TableState,
    focus: usize,
    picker: StopPicker,
    throbber: ThrobberState,
}

impl LinesScreen {
    pub fn new(api: Api) -> Self {
        Self {
            shared: Shared::new(LinesPage::default(), api),
            table: TableState::default().with_selected(Some(0)),
            focus: 0,
            picker: StopPicker::default(),
            throbber: ThrobberState::default(),
        }
    }

    fn reload(&self) {
        self.shared
            .run("lines.load", |page, api| Box::pin(page.load(api)));
    }
}

/// Route keys inside the line form. Returns `true` when consumed.
fn route_key(
    line_form: &mut LineForm,
    picker: &mut StopPicker,
    stops: &[BusStop],
    key: KeyEvent,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::PageDown => picker.cycle(stops.len(), true),
        KeyCode::PageUp => picker.cycle(stops.len(), false),
        KeyCode::Char('a') if ctrl => {
            if let Some(stop) = picker.current(stops) {
                line_form.route.append(stop.id);
            }
        }
        KeyCode::Char('x') if ctrl => {
            let last = line_form.route.len().saturating_sub(1);
            line_form.route.remove_at(last);
        }
        _ => return false,
    }
    true
}

fn route_lines(line_form: &LineForm, picker: StopPicker, stops: &[BusStop]) -> Vec<Line<'static>> {
    let route = line_form
        .route
        .entries(stops)
        .into_iter()
        .map(|(_, _, label)| label)
        .collect::<Vec<_>>();
    let route = if route.is_empty() {
        "(no stops)".to_owned()
    } else {
        route.join(" → ")
    };
    let candidate = picker
        .current(stops)
        .map_or_else(|| "─".to_owned(), |s| s.name.clone());
    vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Route  ", theme::key_hint()),
            Span::styled(route, theme::table_row()),
        ]),
        Line::from(vec![
            Span::styled("  Stop   ", theme::key_hint()),
            Span::styled(format!("◂ {candidate} ▸"), theme::table_row()),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn ", theme::key_hint_key()),
            Span::styled("pick  ", theme::key_hint()),
            Span::styled("Ctrl+A ", theme::key_hint_key()),
            Span::styled("add  ", theme::key_hint()),
            Span::styled("Ctrl+X ", theme::key_hint_key()),
            Span::styled("drop last", theme::key_hint()),
        ]),
    ]
}

impl Component for LinesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.shared.attach(action_tx);
        self.reload();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(mut guard) = self.shared.try_page() else {
            return Ok(None);
        };
        let page = &mut *guard;

        if let Some(line_form) = page.form.as_mut() {
            if route_key(line_form, &mut self.picker, &page.stops, key) {
                return Ok(None);
            }
            match form::handle_key(line_form, &mut self.focus, key) {
                FormKey::Submit => {
                    drop(guard);
                    self.shared.run("lines.submit", |page, api| {
                        Box::pin(async move { page.submit(api).await.map(drop) })
                    });
                }
                FormKey::Cancel => page.close_form(),
                _ => {}
            }
            return Ok(None);
        }

        let len = page.lines.len();
        let selected = self
            .table
            .selected()
            .and_then(|i| page.lines.get(i))
            .map(|l| l.id);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(widgets::step(self.table.selected(), len, 1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(widgets::step(self.table.selected(), len, -1));
            }
            KeyCode::Enter => {
                if let Some(id) = selected {
                    return Ok(Some(Action::Navigate(Route::BusLine(id))));
                }
            }
            KeyCode::Char('n') => {
                page.open_create();
                self.focus = 0;
                self.picker = StopPicker::default();
            }
            KeyCode::Char('e') => {
                if let Some(id) = selected {
                    page.open_edit(id);
                    self.focus = 0;
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = selected {
                    if let Some(pending) = page.request_delete(id) {
                        return Ok(Some(Action::ShowConfirm(pending.prompt.clone())));
                    }
                }
            }
            KeyCode::Char('r') => {
                drop(guard);
                self.reload();
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
                self.shared.run("lines.delete", move |page, api| {
                    Box::pin(async move { page.resolve_delete(api, accepted).await.map(drop) })
                });
            }
            Action::PageUpdated => {
                if let Some(page) = self.shared.try_page() {
                    let len = page.lines.len();
                    self.table.select(widgets::step(self.table.selected(), len, 0));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(page) = self.shared.try_page() else {
            let inner = widgets::panel(frame, area, "Bus Lines", true);
            widgets::loading(frame, inner, &self.throbber);
            return;
        };
        let title = format!("Bus Lines ({})", page.lines.len());
        let inner = widgets::panel(frame, area, &title, true);
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[0]);

        let header = Row::new(
            ["ID", "Name", "Stops", "Status", "Route"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows = page.lines.iter().map(|l| {
            Row::new(vec![
                Cell::from(l.id.to_string()),
                Cell::from(l.name.clone()),
                Cell::from(l.stops.len().to_string()),
                Cell::from(l.status_label()).style(theme::badge(l.active)),
                Cell::from(l.route_summary()),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(28),
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸");
        let mut state = self.table;
        frame.render_stateful_widget(table, layout[1], &mut state);

        widgets::hints(
            frame,
            layout[2],
            &[
                ("j/k", "move"),
                ("Enter", "open"),
                ("n", "new"),
                ("e", "edit"),
                ("d", "delete"),
                ("r", "refresh"),
            ],
        );

        if let Some(line_form) = &page.form {
            let title = match line_form.editing {
                Some(id) => format!("Edit bus line #{id}"),
                None => "New bus line".into(),
            };
            let extra = route_lines(line_form, self.picker, &page.stops);
            form::render(frame, inner, &title, line_form, self.focus, &[], extra);
        }
    }

    fn captures_input(&self) -> bool {
        self.shared.try_page().is_some_and(|p| p.form.is_some())
    }

    fn id(&self) -> &str {
        "Bus Lines"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busops_core::{FakeBackend, TicketingApi};
    use pretty_assertions::assert_eq;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn form_route_keys_build_the_route() {
        let stops = FakeBackend::new().list_stops().await.unwrap_or_default();
        let mut line_form = LineForm::new_line();
        let mut picker = StopPicker::default();

        assert!(route_key(&mut line_form, &mut picker, &stops, ctrl('a')));
        let page_down = KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE);
        assert!(route_key(&mut line_form, &mut picker, &stops, page_down));
        assert!(route_key(&mut line_form, &mut picker, &stops, page_down));
        assert!(route_key(&mut line_form, &mut picker, &stops, ctrl('a')));
        assert_eq!(line_form.route.working(), &[1, 3]);

        assert!(route_key(&mut line_form, &mut picker, &stops, ctrl('x')));
        assert_eq!(line_form.route.working(), &[1]);

        let typed = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(!route_key(&mut line_form, &mut picker, &stops, typed));
    }
}
