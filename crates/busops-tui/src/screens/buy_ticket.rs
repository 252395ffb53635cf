//! Buy-ticket screen: purchase form, then the created ticket.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use busops_core::Ticket;
use busops_core::pages::{PurchaseForm, PurchasePage};

use super::{Api, Shared};
use crate::action::Action;
use crate::component::Component;
use crate::screen::Route;
use crate::widgets::{self, form, form::FormKey};
use crate::theme;

pub struct BuyTicketScreen {
    shared: Shared<PurchasePage>,
    focus: usize,
    throbber: ThrobberState,
}

impl BuyTicketScreen {
    pub fn new(api: Api) -> Self {
        Self {
            shared: Shared::new(PurchasePage::default(), api),
            focus: 0,
            throbber: ThrobberState::default(),
        }
    }
}

/// Left/right on a picker field cycles its options. Returns `true` when consumed.
fn picker_key(page: &mut PurchasePage, focus: usize, key: KeyEvent) -> bool {
    let forward = match key.code {
        KeyCode::Right => true,
        KeyCode::Left => false,
        _ => return false,
    };
    match focus {
        PurchaseForm::CATEGORY_FIELD => page.cycle_category(forward),
        PurchaseForm::LINE_FIELD => page.cycle_line(forward),
        _ => return false,
    }
    true
}

fn summary(ticket: &Ticket) -> Vec<Line<'static>> {
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<16}"), theme::key_hint()),
            Span::styled(value, theme::table_row()),
        ])
    };
    let status = ticket.status();
    vec![
        Line::from(""),
        row("Ticket", format!("#{}", ticket.id)),
        row("Passenger", ticket.passenger_name.clone()),
        row("Email", ticket.passenger_email.clone()),
        row("Category", ticket.category_name.clone()),
        row("Bus line", ticket.line_label().to_owned()),
        row("Valid from", ticket.valid_from.format("%Y-%m-%d %H:%M").to_string()),
        row("Expires", ticket.expiration_date.format("%Y-%m-%d %H:%M").to_string()),
        Line::from(vec![
            Span::styled(format!("  {:<16}", "Status"), theme::key_hint()),
            Span::styled(status.to_string(), theme::ticket_status(status)),
        ]),
    ]
}

impl Component for BuyTicketScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.shared.attach(action_tx);
        self.shared
            .run("purchase.mount", |page, api| Box::pin(page.mount(api)));
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(mut page) = self.shared.try_page() else {
            return Ok(None);
        };

        if page.result.is_some() {
            match key.code {
                KeyCode::Char('b') | KeyCode::Enter => {
                    page.buy_another();
                    self.focus = 0;
                }
                KeyCode::Char('t') => return Ok(Some(Action::Navigate(Route::MyTickets))),
                _ => {}
            }
            return Ok(None);
        }

        if picker_key(&mut page, self.focus, key) {
            return Ok(None);
        }
        match form::handle_key(&mut page.form, &mut self.focus, key) {
            FormKey::Submit => {
                drop(page);
                self.shared.run("purchase.submit", |page, api| {
                    Box::pin(async move { page.submit(api).await.map(drop) })
                });
            }
            FormKey::Cancel => return Ok(Some(Action::GoBack)),
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
            let inner = widgets::panel(frame, area, "Buy Ticket", true);
            widgets::loading(frame, inner, &self.throbber);
            return;
        };
        let inner = widgets::panel(frame, area, "Buy Ticket", true);
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);
        frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[0]);

        if let Some(ticket) = &page.result {
            frame.render_widget(Paragraph::new(summary(ticket)), layout[1]);
            widgets::hints(
                frame,
                layout[2],
                &[("b", "buy another"), ("t", "my tickets"), ("Esc", "back")],
            );
            return;
        }

        let category = page
            .selected_category()
            .map_or_else(|| "─".to_owned(), |c| c.option_label());
        let pickers = [
            (PurchaseForm::CATEGORY_FIELD, category),
            (PurchaseForm::LINE_FIELD, page.line_label()),
        ];
        let extra = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Valid from: blank for now, or 2026-02-10T08:00",
                theme::key_hint(),
            )),
        ];
        widgets::hints(frame, layout[2], &[("←/→", "pick category or line")]);
        form::render(frame, layout[1], "Passenger", &page.form, self.focus, &pickers, extra);
    }

    fn captures_input(&self) -> bool {
        self.shared.try_page().is_some_and(|p| p.result.is_none())
    }

    fn id(&self) -> &str {
        "Buy Ticket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busops_core::FakeBackend;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn arrows_cycle_only_picker_fields() {
        let api = FakeBackend::new();
        let mut page = PurchasePage::default();
        page.mount(&api).await.ok();
        let first = page.form.category_id;

        assert!(!picker_key(&mut page, 0, press(KeyCode::Right)));
        assert!(picker_key(&mut page, PurchaseForm::CATEGORY_FIELD, press(KeyCode::Right)));
        assert_ne!(page.form.category_id, first);
        assert!(picker_key(&mut page, PurchaseForm::CATEGORY_FIELD, press(KeyCode::Left)));
        assert_eq!(page.form.category_id, first);

        assert!(picker_key(&mut page, PurchaseForm::LINE_FIELD, press(KeyCode::Right)));
        assert_eq!(page.form.line_id, Some(1));
        assert!(!picker_key(&mut page, PurchaseForm::LINE_FIELD, press(KeyCode::Char('x'))));
    }
}
