//! Ticket categories screen.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use busops_core::pages::CategoriesPage;

use super::{Api, Shared};
use crate::action::Action;
use crate::component::Component;
use crate::widgets::{self, form, form::FormKey};
use crate::theme;

pub struct CategoriesScreen {
    shared: Shared<CategoriesPage>,
    table: TableState,
    focus: usize,
    throbber: ThrobberState,
}

impl CategoriesScreen {
    pub fn new(api: Api) -> Self {
        Self {
            shared: Shared::new(CategoriesPage::default(), api),
            table: TableState::default().with_selected(Some(0)),
            focus: 0,
            throbber: ThrobberState::default(),
        }
    }

    fn reload(&self) {
        self.shared
            .run("categories.load", |page, api| Box::pin(page.load(api)));
    }
}

impl Component for CategoriesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.shared.attach(action_tx);
        self.reload();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(mut page) = self.shared.try_page() else {
            return Ok(None);
        };

        if let Some(category_form) = page.form.as_mut() {
            match form::handle_key(category_form, &mut self.focus, key) {
                FormKey::Submit => {
                    drop(page);
                    self.shared.run("categories.submit", |page, api| {
                        Box::pin(async move { page.submit(api).await.map(drop) })
                    });
                }
                FormKey::Cancel => page.close_form(),
                _ => {}
            }
            return Ok(None);
        }

        let len = page.categories.len();
        let selected = self
            .table
            .selected()
            .and_then(|i| page.categories.get(i))
            .map(|c| c.id);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(widgets::step(self.table.selected(), len, 1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(widgets::step(self.table.selected(), len, -1));
            }
            KeyCode::Char('n') => {
                page.open_create();
                self.focus = 0;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
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
                drop(page);
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
                self.shared.run("categories.delete", move |page, api| {
                    Box::pin(async move { page.resolve_delete(api, accepted).await.map(drop) })
                });
            }
            Action::PageUpdated => {
                if let Some(page) = self.shared.try_page() {
                    let len = page.categories.len();
                    self.table.select(widgets::step(self.table.selected(), len, 0));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(page) = self.shared.try_page() else {
            let inner = widgets::panel(frame, area, "Ticket Categories", true);
            widgets::loading(frame, inner, &self.throbber);
            return;
        };
        let title = format!("Ticket Categories ({})", page.categories.len());
        let inner = widgets::panel(frame, area, &title, true);
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[0]);

        let header = Row::new(
            ["ID", "Name", "Validity", "Price", "Renewable", "Description"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows = page.categories.iter().map(|c| {
            let renewable = if c.is_renewable() { "yes" } else { "no" };
            Row::new(vec![
                Cell::from(c.id.to_string()),
                Cell::from(c.name.clone()),
                Cell::from(c.validity_label()),
                Cell::from(c.price_label()).style(Style::default().fg(theme::ROUTE_AMBER)),
                Cell::from(renewable).style(theme::badge(c.is_renewable())),
                Cell::from(c.description.clone().unwrap_or_default()),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(18),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Min(10),
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
            &[("j/k", "move"), ("n", "new"), ("e", "edit"), ("d", "delete"), ("r", "refresh")],
        );

        if let Some(category_form) = &page.form {
            let title = match category_form.editing {
                Some(id) => format!("Edit ticket category #{id}"),
                None => "New ticket category".into(),
            };
            form::render(frame, inner, &title, category_form, self.focus, &[], Vec::new());
        }
    }

    fn captures_input(&self) -> bool {
        self.shared.try_page().is_some_and(|p| p.form.is_some())
    }

    fn id(&self) -> &str {
        "Categories"
    }
}
