use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::invoice_calc::format_amount;
use crate::models::Product;
use crate::ui::components::form::edit_text;
use crate::ui::components::popup::render_confirmation;
use crate::ui::components::selection::{clamp_index, next_index, previous_index};

pub struct ProductsState {
    products: Vec<Product>,
    pub search: String,
    pub searching: bool,
    table_state: TableState,
    show_delete_confirmation: bool,
}

pub enum ProductAction {
    Back,
    NewProduct,
    EditProduct(Product),
    DeleteProduct(i32),
}

impl ProductsState {
    pub fn new(products: Vec<Product>) -> Self {
        let mut state = Self {
            products,
            search: String::new(),
            searching: false,
            table_state: TableState::default(),
            show_delete_confirmation: false,
        };
        state.clamp_selection();
        state
    }

    /// Swap in a refetched list, keeping the search and cursor.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.clamp_selection();
    }

    pub fn total(&self) -> usize {
        self.products.len()
    }

    pub fn filtered(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.matches(&self.search))
            .collect()
    }

    pub fn selected_product(&self) -> Option<&Product> {
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

pub fn render_products<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ProductsState) {
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
        Span::styled(format!("Total {} products", state.total()), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Search: ", search_style),
        Span::raw(format!("{}{}", state.search, if state.searching { "|" } else { "" })),
    ]))
    .block(Block::default().title("Products").borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let rows: Vec<Row> = state
        .filtered()
        .into_iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.product_code.clone()),
                Cell::from(p.product_name.clone()),
                Cell::from(p.raw_material_type.clone()),
                Cell::from(p.description.clone()),
                Cell::from(p.origin.clone()),
                Cell::from(format_amount(p.unit_price)),
                Cell::from(p.currency.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(10),
        Constraint::Percentage(22),
        Constraint::Percentage(10),
        Constraint::Percentage(26),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
        Constraint::Percentage(8),
    ];
    let table = Table::new(rows)
        .header(
            Row::new(vec!["Code", "Name", "Material", "Description", "Origin", "Price", "Currency"])
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
    } else if state.selected_product().is_some() {
        "<N> New | <E> Edit | <D> Delete | </> Search | <Esc> Back"
    } else {
        "<N> New | </> Search | <Esc> Back"
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);

    if state.show_delete_confirmation {
        render_confirmation(frame, area, "Confirm Delete", "Are you sure you want to delete this product?");
    }
}

pub fn handle_key(state: &mut ProductsState, key: KeyEvent) -> Option<ProductAction> {
    if state.show_delete_confirmation {
        match key.code {
            KeyCode::Char('y') => {
                state.show_delete_confirmation = false;
                return state.selected_product().map(|p| ProductAction::DeleteProduct(p.id));
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
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProductAction::Back),
        KeyCode::Char('n') => return Some(ProductAction::NewProduct),
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_product().cloned().map(ProductAction::EditProduct);
        }
        KeyCode::Char('d') => {
            if state.selected_product().is_some() {
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

    fn press(state: &mut ProductsState, code: KeyCode) -> Option<ProductAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn products() -> Vec<Product> {
        [(1, "PP-01", "Homopolymer"), (2, "PE-07", "Film grade"), (3, "PVC-2", "Pipe grade")]
            .into_iter()
            .map(|(id, code, name)| Product {
                id,
                product_code: code.to_string(),
                product_name: name.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn search_matches_code_or_name() {
        let mut state = ProductsState::new(products());
        state.search = "grade".to_string();
        assert_eq!(state.filtered().len(), 2);
        state.search = "pp-".to_string();
        assert_eq!(state.filtered().len(), 1);
    }

    #[test]
    fn delete_confirmed_returns_id() {
        let mut state = ProductsState::new(products());
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Char('d'));
        assert!(matches!(press(&mut state, KeyCode::Char('y')), Some(ProductAction::DeleteProduct(3))));
    }

    #[test]
    fn empty_list_has_nothing_to_edit() {
        let mut state = ProductsState::new(Vec::new());
        assert!(press(&mut state, KeyCode::Char('e')).is_none());
        assert!(press(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(press(&mut state, KeyCode::Char('n')), Some(ProductAction::NewProduct)));
    }
}
