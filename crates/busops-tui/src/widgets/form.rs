//! Generic text form: key handling and rendering over any page [`Form`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use busops_core::pages::Form;

use crate::theme;

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Submit,
    Cancel,
    Edited,
    Moved,
    Ignored,
}

/// Apply a key to `form`, moving `focus` between fields.
///
/// Pickers (fields without free text) ignore typing; screens handle
/// their left/right cycling before delegating here.
pub fn handle_key(form: &mut dyn Form, focus: &mut usize, key: KeyEvent) -> FormKey {
    let count = form.field_count();
    if count == 0 {
        return FormKey::Ignored;
    }
    match key.code {
        KeyCode::Esc => FormKey::Cancel,
        KeyCode::Enter => FormKey::Submit,
        KeyCode::Tab | KeyCode::Down => {
            *focus = (*focus + 1) % count;
            FormKey::Moved
        }
        KeyCode::BackTab | KeyCode::Up => {
            *focus = (*focus + count - 1) % count;
            FormKey::Moved
        }
        KeyCode::Backspace => match form.value_mut(*focus) {
            Some(value) => {
                value.pop();
                FormKey::Edited
            }
            None => FormKey::Ignored,
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            match form.value_mut(*focus) {
                Some(value) => {
                    value.push(c);
                    FormKey::Edited
                }
                None => FormKey::Ignored,
            }
        }
        _ => FormKey::Ignored,
    }
}

/// Draw `form` as a floating panel over `area`.
///
/// `pickers` supplies display text for non-text fields by index;
/// `extra` lines are drawn between the fields and the key hints.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &dyn Form,
    focus: usize,
    pickers: &[(usize, String)],
    extra: Vec<Line<'static>>,
) {
    let labels = form.labels();
    let width = 64u16.min(area.width.saturating_sub(4));
    let height = u16::try_from(labels.len() + extra.len())
        .unwrap_or(u16::MAX)
        .saturating_add(5)
        .min(area.height);
    let panel = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0) + 2;
    let mut lines = vec![Line::from("")];
    for (i, label) in labels.iter().enumerate() {
        let picked = pickers.iter().find(|(idx, _)| *idx == i);
        let value = match picked {
            Some((_, text)) => format!("◂ {text} ▸"),
            None if i == focus => format!("{}▏", form.value(i)),
            None => form.value(i).to_owned(),
        };
        let style = if i == focus {
            theme::field_focused()
        } else {
            theme::table_row()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<label_width$}"), theme::key_hint()),
            Span::styled(value, style),
        ]));
    }
    lines.extend(extra);
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Tab ", theme::key_hint_key()),
        Span::styled("next  ", theme::key_hint()),
        Span::styled("Enter ", theme::key_hint_key()),
        Span::styled("save  ", theme::key_hint()),
        Span::styled("Esc ", theme::key_hint_key()),
        Span::styled("cancel", theme::key_hint()),
    ]));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use busops_core::pages::{PurchaseForm, StopForm};
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut dyn Form, focus: &mut usize, text: &str) {
        for c in text.chars() {
            handle_key(form, focus, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut form = StopForm::default();
        let mut focus = 0;
        type_text(&mut form, &mut focus, "Harbor");
        assert_eq!(handle_key(&mut form, &mut focus, press(KeyCode::Tab)), FormKey::Moved);
        type_text(&mut form, &mut focus, "45.1x");
        handle_key(&mut form, &mut focus, press(KeyCode::Backspace));

        assert_eq!(
            (form.name.as_str(), form.latitude.as_str(), form.longitude.as_str()),
            ("Harbor", "45.1", "")
        );
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = StopForm::default();
        let mut focus = 0;
        handle_key(&mut form, &mut focus, press(KeyCode::BackTab));
        assert_eq!(focus, 2);
        handle_key(&mut form, &mut focus, press(KeyCode::Down));
        assert_eq!(focus, 0);
    }

    #[test]
    fn pickers_ignore_typing() {
        let mut form = PurchaseForm::default();
        let mut focus = 2;
        assert_eq!(
            handle_key(&mut form, &mut focus, press(KeyCode::Char('x'))),
            FormKey::Ignored
        );
        assert_eq!(form.category_id, None);
    }

    #[test]
    fn enter_and_esc_are_reported() {
        let mut form = StopForm::default();
        let mut focus = 1;
        assert_eq!(handle_key(&mut form, &mut focus, press(KeyCode::Enter)), FormKey::Submit);
        assert_eq!(handle_key(&mut form, &mut focus, press(KeyCode::Esc)), FormKey::Cancel);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut form, &mut focus, ctrl_c), FormKey::Ignored);
        assert_eq!(form.name, "");
    }
}
