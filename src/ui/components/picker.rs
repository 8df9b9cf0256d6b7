use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::popup::centered_rect;
use super::selection::{clamp_index, next_index, previous_index};

pub enum PickerOutcome {
    Selected(i32),
    Cancelled,
}

/// Type-to-filter popup list for choosing a customer or product by id
pub struct PickerState {
    title: String,
    options: Vec<(i32, String)>,
    query: String,
    list_state: ListState,
}

impl PickerState {
    pub fn new(title: &str, options: Vec<(i32, String)>, selected_id: Option<i32>) -> Self {
        let mut list_state = ListState::default();
        let initial = selected_id
            .and_then(|id| options.iter().position(|(option_id, _)| *option_id == id))
            .or(if options.is_empty() { None } else { Some(0) });
        list_state.select(initial);

        Self {
            title: title.to_string(),
            options,
            query: String::new(),
            list_state,
        }
    }

    pub fn filtered(&self) -> Vec<&(i32, String)> {
        let needle = self.query.to_lowercase();
        self.options
            .iter()
            .filter(|(_, label)| label.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn selected_id(&self) -> Option<i32> {
        let filtered = self.filtered();
        self.list_state
            .selected()
            .and_then(|i| filtered.get(i))
            .map(|(id, _)| *id)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<PickerOutcome> {
        match key {
            KeyCode::Esc => return Some(PickerOutcome::Cancelled),
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    return Some(PickerOutcome::Selected(id));
                }
            }
            KeyCode::Down => {
                let len = self.filtered().len();
                self.list_state.select(next_index(self.list_state.selected(), len));
            }
            KeyCode::Up => {
                let len = self.filtered().len();
                self.list_state.select(previous_index(self.list_state.selected(), len));
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.list_state.select(clamp_index(Some(0), self.filtered().len()));
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.list_state.select(clamp_index(Some(0), self.filtered().len()));
            }
            _ => {}
        }
        None
    }
}

pub fn render_picker<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut PickerState) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(popup_area);

    let query = Paragraph::new(Spans::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{}|", state.query)),
    ]))
    .block(Block::default().title(state.title.clone()).borders(Borders::ALL));
    frame.render_widget(query, chunks[0]);

    let items: Vec<ListItem> = state
        .filtered()
        .iter()
        .map(|(_, label)| ListItem::new(label.clone()))
        .collect();

    let list = List::new(items)
        .block(Block::default().title("<Enter> Choose | <Esc> Cancel").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, chunks[1], &mut state.list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> PickerState {
        PickerState::new(
            "Customer",
            vec![
                (1, "Acme Ambalaj".to_string()),
                (2, "Delta Kimya".to_string()),
                (3, "Acar Plastik".to_string()),
            ],
            Some(2),
        )
    }

    #[test]
    fn starts_on_current_value() {
        assert_eq!(picker().selected_id(), Some(2));
    }

    #[test]
    fn typing_filters_and_resets_cursor() {
        let mut p = picker();
        p.handle_key(KeyCode::Char('a'));
        p.handle_key(KeyCode::Char('c'));
        assert_eq!(p.filtered().len(), 2);
        assert_eq!(p.selected_id(), Some(1));

        p.handle_key(KeyCode::Down);
        assert!(matches!(p.handle_key(KeyCode::Enter), Some(PickerOutcome::Selected(3))));
    }

    #[test]
    fn no_match_selects_nothing() {
        let mut p = picker();
        for c in "zzz".chars() {
            p.handle_key(KeyCode::Char(c));
        }
        assert_eq!(p.selected_id(), None);
        assert!(p.handle_key(KeyCode::Enter).is_none());
        assert!(matches!(p.handle_key(KeyCode::Esc), Some(PickerOutcome::Cancelled)));
    }
}
