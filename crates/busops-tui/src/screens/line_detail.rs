//! Line detail screen: one line's route, with the route editor.
//!
//! Viewing shows the persisted route. `e` starts editing a working copy;
//! nothing reaches the server until `Enter` saves it in one request.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use busops_core::pages::LineDetailPage;
use busops_core::{Direction, LineId};

use super::{Api, Shared, StopPicker};
use crate::action::Action;
use crate::component::Component;
use crate::{theme, widgets};

pub struct LineDetailScreen {
    shared: Shared<LineDetailPage>,
    picker: StopPicker,
    throbber: ThrobberState,
}

impl LineDetailScreen {
    pub fn new(line_id: LineId, api: Api) -> Self {
        Self {
            shared: Shared::new(LineDetailPage::new(line_id), api),
            picker: StopPicker::default(),
            throbber: ThrobberState::default(),
        }
    }

    fn reload(&self) {
        self.shared
            .run("line_detail.load", |page, api| Box::pin(page.load(api)));
    }
}

/// Edit-mode keys. Returns `true` when the working route should be saved.
fn edit_key(page: &mut LineDetailPage, picker: &mut StopPicker, key: KeyEvent) -> bool {
    // Some terminals report `J`/`K` without the shift modifier.
    let shift = key.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(key.code, KeyCode::Char('J' | 'K'));
    match key.code {
        KeyCode::Char('K') | KeyCode::Up if shift => {
            page.move_selected(Direction::Up);
        }
        KeyCode::Char('J') | KeyCode::Down if shift => {
            page.move_selected(Direction::Down);
        }
        KeyCode::Char('k') | KeyCode::Up => page.editor.select_prev(),
        KeyCode::Char('j') | KeyCode::Down => page.editor.select_next(),
        KeyCode::Char('x') | KeyCode::Delete => {
            page.remove_selected();
        }
        KeyCode::PageDown => picker.cycle(page.stops.len(), true),
        KeyCode::PageUp => picker.cycle(page.stops.len(), false),
        KeyCode::Char('a') => {
            if let Some(stop) = picker.current(&page.stops) {
                let id = stop.id;
                page.append(id);
            }
        }
        KeyCode::Esc => page.cancel_edit(),
        KeyCode::Enter | KeyCode::Char('s') => return true,
        _ => {}
    }
    false
}

impl Component for LineDetailScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.shared.attach(action_tx);
        self.reload();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(mut page) = self.shared.try_page() else {
            return Ok(None);
        };

        if page.editor.is_editing() {
            if edit_key(&mut page, &mut self.picker, key) {
                drop(page);
                self.shared
                    .run("line_detail.save", |page, api| Box::pin(page.save(api)));
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('e') if page.line.is_some() => {
                page.begin_edit();
                self.picker = StopPicker::default();
            }
            KeyCode::Char('r') => {
                drop(page);
                self.reload();
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Tick = action {
            self.throbber.calc_next();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(page) = self.shared.try_page() else {
            let inner = widgets::panel(frame, area, "Line", true);
            widgets::loading(frame, inner, &self.throbber);
            return;
        };
        let inner = widgets::panel(frame, area, &page.title(), true);
        let layout = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(inner);

        let Some(line) = page.line.as_ref() else {
            frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[1]);
            widgets::hints(frame, layout[4], &[("Esc", "back to bus lines"), ("r", "retry")]);
            return;
        };

        let header = vec![
            Line::from(vec![
                Span::styled(format!(" {}  ", line.name), theme::title_style()),
                Span::styled(line.status_label(), theme::badge(line.active)),
            ]),
            Line::from(Span::styled(
                format!(" {}", line.description.as_deref().unwrap_or("")),
                theme::key_hint(),
            )),
        ];
        frame.render_widget(Paragraph::new(header), layout[0]);
        frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[1]);

        let editing = page.editor.is_editing();
        let labels = page.route_labels();
        let heading = if editing {
            format!(" Route (editing, {} stops)", labels.len())
        } else {
            format!(" Route ({} stops)", labels.len())
        };
        frame.render_widget(Paragraph::new(Span::styled(heading, theme::table_header())), layout[2]);

        let rows: Vec<Row> = if labels.is_empty() {
            vec![Row::new(vec![Cell::from(""), Cell::from("No stops assigned")]).style(theme::key_hint())]
        } else {
            labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| {
                    Row::new(vec![Cell::from(format!("{}.", i + 1)), Cell::from(label)])
                        .style(theme::table_row())
                })
                .collect()
        };
        let table = Table::new(rows, [Constraint::Length(5), Constraint::Min(20)])
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");
        let mut state = TableState::default();
        if editing && !page.editor.is_empty() {
            state.select(Some(page.editor.cursor()));
        }
        frame.render_stateful_widget(table, layout[3], &mut state);

        if editing {
            let candidate = self
                .picker
                .current(&page.stops)
                .map_or_else(|| "─".to_owned(), |s| s.name.clone());
            let footer = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(layout[4]);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("  Add stop ", theme::key_hint()),
                    Span::styled(format!("◂ {candidate} ▸"), theme::field_focused()),
                ])),
                footer[0],
            );
            widgets::hints(
                frame,
                footer[1],
                &[
                    ("j/k", "select"),
                    ("J/K", "move"),
                    ("x", "remove"),
                    ("PgUp/PgDn", "pick"),
                    ("a", "add"),
                    ("Enter", "save"),
                    ("Esc", "cancel"),
                ],
            );
        } else {
            widgets::hints(
                frame,
                layout[4],
                &[("e", "edit route"), ("r", "refresh"), ("Esc", "back")],
            );
        }
    }

    fn captures_input(&self) -> bool {
        self.shared.try_page().is_some_and(|p| p.editor.is_editing())
    }

    fn id(&self) -> &str {
        "Line"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busops_core::FakeBackend;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[tokio::test]
    async fn edit_keys_drive_the_working_route() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(1);
        page.load(&api).await.ok();
        page.begin_edit();
        let mut picker = StopPicker::default();

        // Seeded route is [1, 2]: move the first stop down, then add stop 3.
        assert!(!edit_key(&mut page, &mut picker, key(KeyCode::Char('J'), KeyModifiers::SHIFT)));
        picker.cycle(page.stops.len(), false);
        edit_key(&mut page, &mut picker, key(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(page.editor.working(), &[2, 1, 3]);

        // Cursor follows the appended stop; walk back to the top and drop it.
        edit_key(&mut page, &mut picker, key(KeyCode::Up, KeyModifiers::NONE));
        edit_key(&mut page, &mut picker, key(KeyCode::Char('k'), KeyModifiers::NONE));
        edit_key(&mut page, &mut picker, key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(page.editor.working(), &[1, 3]);

        assert!(edit_key(&mut page, &mut picker, key(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn escape_discards_the_working_copy() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(1);
        page.load(&api).await.ok();
        page.begin_edit();
        let mut picker = StopPicker::default();

        edit_key(&mut page, &mut picker, key(KeyCode::Char('x'), KeyModifiers::NONE));
        edit_key(&mut page, &mut picker, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!page.editor.is_editing());
        assert_eq!(page.route_labels(), vec!["Central Station", "City Hall"]);
    }
}
