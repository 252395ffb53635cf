//! Home screen: headline counts and page shortcuts.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use busops_core::pages::DashboardPage;

use super::{Api, Shared};
use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::{theme, widgets};

pub struct DashboardScreen {
    shared: Shared<DashboardPage>,
    throbber: ThrobberState,
}

impl DashboardScreen {
    pub fn new(api: Api) -> Self {
        Self {
            shared: Shared::new(DashboardPage::default(), api),
            throbber: ThrobberState::default(),
        }
    }

    fn reload(&self) {
        self.shared
            .run("dashboard.load", |page, api| Box::pin(page.load(api)));
    }
}

fn count<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "─".into(), |v| v.to_string())
}

impl Component for DashboardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.shared.attach(action_tx);
        self.reload();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('r') {
            self.reload();
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
        let inner = widgets::panel(frame, area, "🚌 Bus Tickets", true);
        let Some(page) = self.shared.try_page() else {
            widgets::loading(frame, inner, &self.throbber);
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(widgets::banner_line(&page.banner)), layout[0]);

        let value = Style::default().fg(theme::ROUTE_AMBER);
        let label = Style::default().fg(theme::TEXT);
        let stats = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Bus lines          ", label),
                Span::styled(count(page.line_count), value),
                Span::styled(
                    format!("  ({} active)", count(page.active_line_count)),
                    theme::key_hint(),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Ticket categories  ", label),
                Span::styled(count(page.category_count), value),
            ]),
            Line::from(vec![
                Span::styled("  Tickets sold       ", label),
                Span::styled(count(page.ticket_count), value),
            ]),
        ];
        frame.render_widget(Paragraph::new(stats), layout[1]);

        let mut shortcuts = vec![Line::from(Span::styled("  Go to", theme::title_style()))];
        for screen in ScreenId::TABS.iter().skip(1) {
            shortcuts.push(Line::from(vec![
                Span::styled(format!("    {}  ", screen.number()), theme::key_hint_key()),
                Span::styled(screen.label(), theme::table_row()),
            ]));
        }
        frame.render_widget(Paragraph::new(shortcuts), layout[2]);

        widgets::hints(frame, layout[3], &[("r", "refresh")]);
    }

    fn id(&self) -> &str {
        "Home"
    }
}
