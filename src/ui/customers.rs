use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::Customer;
use crate::ui::components::form::edit_text;
use crate::ui::components::popup::render_confirmation;
use crate::ui::components::selection::{clamp_index, next_index, previous_index};

// Represents the state of the customers table
pub struct CustomersState {
    customers: Vec<Customer>,
    pub search: String,
    pub searching: bool,
    table_state: TableState,
    show_delete_confirmation: bool,
}

pub enum CustomerAction {
    Back,
    NewCustomer,
    EditCustomer(Customer),
    DeleteCustomer(i32),
}

impl CustomersState {
    pub fn new(customers: Vec<Customer>) -> Self {
        let mut state = Self {
            customers,
            search: String::new(),
            searching: false,
            table_state: TableState::default(),
            show_delete_confirmation: false,
        };
        state.clamp_selection();
        state
    }

    /// Swap in a refetched list, keeping the search and cursor.
    pub fn replace(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
        self.clamp_selection();
    }

    pub fn total(&self) -> usize {
        self.customers.len()
    }

    pub fn filtered(&self) -> Vec<&Customer> {
        self.customers
            .iter()
            .filter(|c| c.matches(&self.search))
            .collect()
    }

    pub fn selected_customer(&self) -> Option<&Customer> {
        let filtered = self.filtered();
        self.table_state
            .selected()
            .and_then(|i| filtered.get(i).copied())
    }

    pub fn next(&mut self) {
        let len = self.filtered().len();
        self.table_state.select(next_index(self.table_state.selected(), len));
    }

    pub fn previous(&mut self) {
        let len = self.filtered().len();
        self.table_state.select(previous_index(self.table_state.selected(), len));
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        self.table_state.select(clamp_index(self.table_state.selected(), len));
    }
}

pub fn render_customers<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut CustomersState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let header = Paragraph::new(Spans::from(vec![
        Span::styled(format!("Total {} customers", state.total()), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Search: ", search_style),
        Span::raw(format!("{}{}", state.search, if state.searching { "|" } else { "" })),
    ]))
    .block(Block::default().title("Customers").borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let rows: Vec<Row> = state
        .filtered()
        .into_iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.name.clone()),
                Cell::from(c.company_title.clone()),
                Cell::from(c.city.clone()),
                Cell::from(c.tax_office.clone()),
                Cell::from(c.tax_number.clone()),
                Cell::from(c.phone.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(22),
        Constraint::Percentage(22),
        Constraint::Percentage(12),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(16),
    ];
    let table = Table::new(rows)
        .header(
            Row::new(vec!["Name", "Title", "City", "Tax Office", "Tax No", "Phone"])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL))
        .widths(&widths)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    let buttons_text = if state.searching {
        "Type to filter | <Enter> Keep | <Esc> Clear"
    } else if state.selected_customer().is_some() {
        "<N> New | <E> Edit | <D> Delete | </> Search | <Esc> Back"
    } else {
        "<N> New | </> Search | <Esc> Back"
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);

    if state.show_delete_confirmation {
        render_confirmation(frame, area, "Confirm Delete", "Are you sure you want to delete this customer?");
    }
}

pub fn handle_key(state: &mut CustomersState, key: KeyEvent) -> Option<CustomerAction> {
    if state.show_delete_confirmation {
        match key.code {
            KeyCode::Char('y') => {
                state.show_delete_confirmation = false;
                return state.selected_customer().map(|c| CustomerAction::DeleteCustomer(c.id));
            }
            KeyCode::Char('n') | KeyCode::Esc => state.show_delete_confirmation = false,
            _ => {}
        }
        return None;
    }

    if state.searching {
        match key.code {
            KeyCode::Enter => state.searching = false,
            KeyCode::Esc => {
                state.searching = false;
                state.search.clear();
            }
            KeyCode::Up => state.previous(),
            KeyCode::Down => state.next(),
            code => edit_text(&mut state.search, code),
        }
        state.clamp_selection();
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(CustomerAction::Back),
        KeyCode::Char('n') => return Some(CustomerAction::NewCustomer),
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_customer().cloned().map(CustomerAction::EditCustomer);
        }
        KeyCode::Char('d') => {
            if state.selected_customer().is_some() {
                state.show_delete_confirmation = true;
            }
        }
        KeyCode::Char('/') => state.searching = true,
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut CustomersState, code: KeyCode) -> Option<CustomerAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn customers() -> Vec<Customer> {
        [(1, "Acme Ambalaj", "Bursa"), (2, "Delta Kimya", "Ankara"), (3, "Ege Plastik", "Manisa")]
            .into_iter()
            .map(|(id, name, city)| Customer {
                id,
                name: name.to_string(),
                city: city.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn search_filters_but_total_counts_everything() {
        let mut state = CustomersState::new(customers());
        press(&mut state, KeyCode::Char('/'));
        for c in "ankara".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.filtered().len(), 1);
        assert_eq!(state.total(), 3);
        assert_eq!(state.selected_customer().map(|c| c.id), Some(2));
    }

    #[test]
    fn escape_clears_search() {
        let mut state = CustomersState::new(customers());
        press(&mut state, KeyCode::Char('/'));
        press(&mut state, KeyCode::Char('z'));
        assert!(state.filtered().is_empty());
        assert!(state.selected_customer().is_none());

        press(&mut state, KeyCode::Esc);
        assert!(!state.searching);
        assert_eq!(state.filtered().len(), 3);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = CustomersState::new(customers());
        press(&mut state, KeyCode::Down);
        assert!(press(&mut state, KeyCode::Char('d')).is_none());
        assert!(press(&mut state, KeyCode::Char('n')).is_none());

        press(&mut state, KeyCode::Char('d'));
        assert!(matches!(press(&mut state, KeyCode::Char('y')), Some(CustomerAction::DeleteCustomer(2))));
    }

    #[test]
    fn edit_carries_selected_customer() {
        let mut state = CustomersState::new(customers());
        press(&mut state, KeyCode::Up);
        match press(&mut state, KeyCode::Char('e')) {
            Some(CustomerAction::EditCustomer(c)) => assert_eq!(c.name, "Ege Plastik"),
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn replace_keeps_cursor_in_range() {
        let mut state = CustomersState::new(customers());
        press(&mut state, KeyCode::Up);
        state.replace(customers().into_iter().take(1).collect());
        assert_eq!(state.selected_customer().map(|c| c.id), Some(1));
    }
}
