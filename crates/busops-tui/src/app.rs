//! Application core: event loop, navigation history, action dispatch.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::{Route, ScreenId};
use crate::screens::{self, Api};
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    api: Api,
    /// Page currently mounted.
    route: Route,
    /// Pages to return to on `GoBack`, most recent last.
    history: Vec<Route>,
    screen: Box<dyn Component>,
    running: bool,
    help_visible: bool,
    /// Prompt of the open confirm dialog.
    confirm: Option<String>,
    /// Where data comes from, for the status bar.
    source: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

/// Keys the shell owns while the active screen is not capturing text.
fn global_action(key: KeyEvent, active: ScreenId) -> Option<Action> {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
        (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
        (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='6')) => c
            .to_digit(10)
            .and_then(|n| u8::try_from(n).ok())
            .and_then(ScreenId::from_number)
            .map(|s| Action::Navigate(s.into())),
        (KeyModifiers::NONE, KeyCode::Tab) => Some(Action::Navigate(active.next().into())),
        (_, KeyCode::BackTab) => Some(Action::Navigate(active.prev().into())),
        (KeyModifiers::NONE, KeyCode::Esc) => Some(Action::GoBack),
        _ => None,
    }
}

impl App {
    pub fn new(api: Api, route: Route, source: impl Into<String>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screen = screens::create(route, api.clone());

        Self {
            api,
            route,
            history: Vec::new(),
            screen,
            running: true,
            help_visible: false,
            confirm: None,
            source: source.into(),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(route = %self.route, screen = self.screen.id(), "console event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        info!("console event loop ended");
        Ok(())
    }

    /// Map a key event to an action. The confirm dialog and help overlay
    /// are modal; otherwise global keys win unless the screen is taking
    /// text input.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if !self.screen.captures_input() {
            if let Some(action) = global_action(key, self.route.screen()) {
                return Ok(Some(action));
            }
        }

        self.screen.handle_key_event(key)
    }

    /// Unmount the current screen and mount a fresh one for `route`.
    fn mount(&mut self, route: Route) -> Result<()> {
        debug!(from = %self.route, to = %route, "navigating");
        self.route = route;
        self.confirm = None;
        self.screen = screens::create(route, self.api.clone());
        self.screen.init(self.action_tx.clone())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),
            Action::Render => {}

            Action::Navigate(target) => {
                if *target != self.route {
                    self.history.push(self.route);
                    self.mount(*target)?;
                }
            }
            Action::GoBack => {
                if let Some(prev) = self.history.pop() {
                    self.mount(prev)?;
                }
            }

            Action::ShowConfirm(prompt) => self.confirm = Some(prompt.clone()),
            Action::ConfirmYes | Action::ConfirmNo => {
                self.confirm = None;
                self.forward(action)?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Tick | Action::PageUpdated => self.forward(action)?,
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.screen.render(frame, layout[0]);
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
        if let Some(prompt) = &self.confirm {
            Self::render_confirm(frame, area, prompt);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.route.screen().tab_index();
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let style = if i == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(active);

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(format!(" {} ", self.route.path()), theme::key_hint_key()),
            Span::styled(format!("│ {} ", self.source), theme::key_hint()),
            Span::styled("│ ? help  Esc back  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_confirm(frame: &mut Frame, area: Rect, prompt: &str) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 7u16.min(area.height);
        let dialog = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, dialog);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::STOP_RED))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let text = vec![
            Line::from(Span::styled(format!(" {prompt}"), theme::table_row())),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", theme::key_hint_key()),
                Span::styled("yes   ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("no", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 60u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(help_width) / 2,
            area.y + area.height.saturating_sub(help_height) / 2,
            help_width,
            help_height,
        );

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |key: &str, desc: &str| {
            Line::from(vec![
                Span::styled(format!("  {key:<12}"), theme::key_hint_key()),
                Span::styled(desc.to_owned(), theme::key_hint()),
            ])
        };
        let heading = |text: &str| {
            Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(theme::SIGNAL_TEAL),
            ))
        };

        let help_text = vec![
            Line::from(""),
            heading("Navigation"),
            entry("1-6", "Jump to page"),
            entry("Tab", "Next page"),
            entry("Esc", "Back / close"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("Enter", "Open / save"),
            Line::from(""),
            heading("Lists"),
            entry("n e d", "New / edit / delete"),
            entry("r", "Refresh"),
            Line::from(""),
            heading("Global"),
            entry("?", "This help"),
            entry("q  Ctrl+C", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_open_tabs() {
        assert_eq!(
            global_action(press(KeyCode::Char('6')), ScreenId::Dashboard),
            Some(Action::Navigate(Route::MyTickets))
        );
        assert_eq!(global_action(press(KeyCode::Char('7')), ScreenId::Dashboard), None);
    }

    #[test]
    fn tab_cycles_from_line_detail_as_lines() {
        assert_eq!(
            global_action(press(KeyCode::Tab), ScreenId::LineDetail),
            Some(Action::Navigate(Route::BusStops))
        );
        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            global_action(back_tab, ScreenId::Dashboard),
            Some(Action::Navigate(Route::MyTickets))
        );
    }

    #[test]
    fn esc_goes_back_and_letters_fall_through() {
        assert_eq!(global_action(press(KeyCode::Esc), ScreenId::Stops), Some(Action::GoBack));
        assert_eq!(global_action(press(KeyCode::Char('n')), ScreenId::Stops), None);
    }

    #[tokio::test]
    async fn navigation_keeps_history() {
        let api: Api = std::sync::Arc::new(busops_core::FakeBackend::new());
        let mut app = App::new(api, Route::Dashboard, "demo data");

        app.process_action(&Action::Navigate(Route::BusLines)).ok();
        app.process_action(&Action::Navigate(Route::BusLine(1))).ok();
        assert_eq!(app.route, Route::BusLine(1));
        assert_eq!(app.history, vec![Route::Dashboard, Route::BusLines]);

        app.process_action(&Action::GoBack).ok();
        app.process_action(&Action::GoBack).ok();
        app.process_action(&Action::GoBack).ok();
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.history.is_empty());
    }

    #[tokio::test]
    async fn confirm_dialog_is_modal() {
        let api: Api = std::sync::Arc::new(busops_core::FakeBackend::new());
        let mut app = App::new(api, Route::BusStops, "demo data");
        app.process_action(&Action::ShowConfirm("Delete bus stop?".into())).ok();

        assert_eq!(
            app.handle_key_event(press(KeyCode::Char('q'))).ok().flatten(),
            None
        );
        assert_eq!(
            app.handle_key_event(press(KeyCode::Esc)).ok().flatten(),
            Some(Action::ConfirmNo)
        );
        app.process_action(&Action::ConfirmNo).ok();
        assert_eq!(app.confirm, None);
    }
}
