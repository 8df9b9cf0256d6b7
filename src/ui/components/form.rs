use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use validator::ValidationErrors;

/// Free text: printable characters are appended, Backspace removes the last one.
pub fn edit_text(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => value.push(c),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// Decimal input. A comma is taken as the decimal separator.
pub fn edit_number(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() => value.push(c),
        KeyCode::Char('.') | KeyCode::Char(',') if !value.contains('.') => value.push('.'),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// `None` for empty or malformed input
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim().replace(',', ".");
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest decimal text for a number, `2` rather than `2.0`
pub fn number_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

pub fn first_error(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the form".to_string())
}

/// Label/value rows with the current row highlighted and a `|` cursor while editing
pub fn render_fields<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    title: &str,
    fields: &[(&str, String)],
    current: usize,
    editing: bool,
) {
    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == current && editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if i == current {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.clone()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items).block(Block::default().borders(Borders::ALL).title(title.to_string()));

    frame.render_widget(form_list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_input_keeps_a_single_separator() {
        let mut value = String::new();
        for key in ['1', ',', '5', '.', 'x', '0'] {
            edit_number(&mut value, KeyCode::Char(key));
        }
        assert_eq!(value, "1.50");

        edit_number(&mut value, KeyCode::Backspace);
        assert_eq!(value, "1.5");
    }

    #[test]
    fn parses_numbers_leniently() {
        assert_eq!(parse_number(" 32,5 "), Some(32.5));
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn number_text_drops_trailing_zero() {
        assert_eq!(number_text(2.0), "2");
        assert_eq!(number_text(1.25), "1.25");
    }
}
