use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::invoice_calc::{build_payload, compute_totals, format_amount, line_total, ItemInput, Totals};
use crate::models::{Customer, Invoice, InvoiceItem, InvoicePayload, Product};
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::form::{edit_number, edit_text, number_text, parse_number, render_fields};
use crate::ui::components::picker::{render_picker, PickerOutcome, PickerState};
use crate::ui::components::selection::{clamp_index, next_index, previous_index};

pub const DEFAULT_UNIT: &str = "KG";

// Represents a field in the order form
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InvoiceField {
    Customer,
    Date,
    ExchangeRate,
    Notes,
    Items,
}

// Represents a field being edited on a single item
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ItemField {
    Product,
    Quantity,
    Unit,
    UnitPrice,
    DeliveryLocation,
}

impl ItemField {
    const ALL: [ItemField; 5] = [
        ItemField::Product,
        ItemField::Quantity,
        ItemField::Unit,
        ItemField::UnitPrice,
        ItemField::DeliveryLocation,
    ];

    fn next(self) -> Option<ItemField> {
        ItemField::ALL.get(self as usize + 1).copied()
    }

    fn previous(self) -> Option<ItemField> {
        (self as usize).checked_sub(1).map(|i| ItemField::ALL[i])
    }
}

/// An order line as typed: numbers stay text until the form is saved.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDraft {
    pub product_id: Option<i32>,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    pub delivery_location: String,
}

impl ItemDraft {
    pub fn empty() -> Self {
        Self {
            product_id: None,
            quantity: "1".to_string(),
            unit: DEFAULT_UNIT.to_string(),
            unit_price: "0".to_string(),
            delivery_location: String::new(),
        }
    }

    fn from_item(item: &InvoiceItem) -> Self {
        let unit = if item.unit.trim().is_empty() {
            DEFAULT_UNIT.to_string()
        } else {
            item.unit.clone()
        };

        Self {
            product_id: item.product_id.or(item.product.as_ref().map(|p| p.id)),
            quantity: number_text(item.quantity),
            unit,
            unit_price: number_text(item.unit_price),
            delivery_location: item.delivery_location.clone(),
        }
    }

    /// Quantity and price for the running total; unparsable text counts as zero.
    fn amounts(&self) -> (f64, f64) {
        (
            parse_number(&self.quantity).unwrap_or(0.0),
            parse_number(&self.unit_price).unwrap_or(0.0),
        )
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum PickerTarget {
    Customer,
    Product(usize),
}

pub enum InvoiceWizardAction {
    Cancel,
    Save {
        invoice_id: Option<i32>,
        payload: InvoicePayload,
    },
}

pub struct InvoiceWizardState {
    invoice_id: Option<i32>,
    invoice_no: String,
    customers: Vec<Customer>,
    products: Vec<Product>,
    pub customer_id: Option<i32>,
    pub date_state: DateInputState,
    pub rate_input: String,
    suggested_rate: Option<f64>,
    pub notes: String,
    pub items: Vec<ItemDraft>,
    pub current_field: InvoiceField,
    pub editing: bool,
    items_list_state: ListState,
    editing_item: Option<(usize, ItemField)>,
    picker: Option<(PickerTarget, PickerState)>,
    pub error: Option<String>,
}

impl InvoiceWizardState {
    /// Blank order for today with one empty line.
    pub fn new(
        customers: Vec<Customer>,
        products: Vec<Product>,
        default_rate: f64,
        suggested_rate: Option<f64>,
    ) -> Self {
        let mut state = Self::blank(customers, products, suggested_rate);
        state.rate_input = number_text(default_rate);
        state.items.push(ItemDraft::empty());
        state.items_list_state.select(Some(0));
        state
    }

    /// Form prefilled from an order fetched with its items. An order stored
    /// without a rate gets `default_rate`.
    pub fn from_existing(
        invoice: &Invoice,
        customers: Vec<Customer>,
        products: Vec<Product>,
        default_rate: f64,
        suggested_rate: Option<f64>,
    ) -> Self {
        let mut state = Self::blank(customers, products, suggested_rate);
        state.invoice_id = Some(invoice.id);
        state.invoice_no = invoice.invoice_no.clone();
        state.customer_id = invoice
            .customer_id
            .or(invoice.customer.as_ref().map(|c| c.id));
        if let Some(date) = invoice.date {
            state.date_state = DateInputState::new(date);
        }
        let rate = if invoice.exchange_rate_usd > 0.0 {
            invoice.exchange_rate_usd
        } else {
            default_rate
        };
        state.rate_input = number_text(rate);
        state.notes = invoice.notes.clone();
        state.items = invoice.items.iter().map(ItemDraft::from_item).collect();
        state.items_list_state.select(clamp_index(None, state.items.len()));
        state
    }

    fn blank(customers: Vec<Customer>, products: Vec<Product>, suggested_rate: Option<f64>) -> Self {
        Self {
            invoice_id: None,
            invoice_no: String::new(),
            customers,
            products,
            customer_id: None,
            date_state: DateInputState::new(Local::now().date_naive()),
            rate_input: String::new(),
            suggested_rate,
            notes: String::new(),
            items: Vec::new(),
            current_field: InvoiceField::Customer,
            editing: false,
            items_list_state: ListState::default(),
            editing_item: None,
            picker: None,
            error: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date_state.date
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            InvoiceField::Customer => InvoiceField::Date,
            InvoiceField::Date => InvoiceField::ExchangeRate,
            InvoiceField::ExchangeRate => InvoiceField::Notes,
            InvoiceField::Notes => InvoiceField::Items,
            InvoiceField::Items => InvoiceField::Customer,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            InvoiceField::Customer => InvoiceField::Items,
            InvoiceField::Date => InvoiceField::Customer,
            InvoiceField::ExchangeRate => InvoiceField::Date,
            InvoiceField::Notes => InvoiceField::ExchangeRate,
            InvoiceField::Items => InvoiceField::Notes,
        };
    }

    pub fn customer_name(&self) -> Option<&str> {
        let id = self.customer_id?;
        self.customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    fn product(&self, id: i32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn product_label(&self, id: Option<i32>) -> String {
        match id {
            None => "(choose product)".to_string(),
            Some(id) => self
                .product(id)
                .map(|p| p.label())
                .unwrap_or_else(|| format!("Product #{}", id)),
        }
    }

    /// Fill the exchange rate with the current USD selling rate, if one was loaded.
    pub fn use_suggested_rate(&mut self) {
        if let Some(rate) = self.suggested_rate {
            self.rate_input = format!("{:.4}", rate);
        }
    }

    pub fn totals(&self) -> Totals {
        let rate = parse_number(&self.rate_input).unwrap_or(0.0);
        compute_totals(self.items.iter().map(ItemDraft::amounts), rate)
    }

    pub fn add_item(&mut self) {
        self.items.push(ItemDraft::empty());
        let idx = self.items.len() - 1;
        self.items_list_state.select(Some(idx));
        self.editing_item = Some((idx, ItemField::Product));
    }

    pub fn delete_item(&mut self) {
        if let Some(idx) = self.items_list_state.selected() {
            if idx < self.items.len() {
                self.items.remove(idx);
            }
            self.items_list_state
                .select(clamp_index(Some(idx), self.items.len()));
        }
    }

    fn open_customer_picker(&mut self) {
        let options = self.customers.iter().map(|c| (c.id, c.name.clone())).collect();
        self.picker = Some((
            PickerTarget::Customer,
            PickerState::new("Choose customer", options, self.customer_id),
        ));
    }

    fn open_product_picker(&mut self, idx: usize) {
        let options = self.products.iter().map(|p| (p.id, p.label())).collect();
        let current = self.items.get(idx).and_then(|item| item.product_id);
        self.picker = Some((
            PickerTarget::Product(idx),
            PickerState::new("Choose product", options, current),
        ));
    }

    fn apply_pick(&mut self, target: PickerTarget, id: i32) {
        match target {
            PickerTarget::Customer => self.customer_id = Some(id),
            PickerTarget::Product(idx) => {
                let price = self.product(id).map(|p| p.unit_price);
                if let Some(item) = self.items.get_mut(idx) {
                    item.product_id = Some(id);
                    if let Some(price) = price {
                        item.unit_price = number_text(price);
                    }
                }
                self.editing_item = Some((idx, ItemField::Quantity));
            }
        }
    }

    fn edit_item_field(&mut self, idx: usize, field: ItemField, key: KeyCode) {
        let Some(item) = self.items.get_mut(idx) else {
            return;
        };
        match field {
            ItemField::Product => {}
            ItemField::Quantity => edit_number(&mut item.quantity, key),
            ItemField::Unit => edit_text(&mut item.unit, key),
            ItemField::UnitPrice => edit_number(&mut item.unit_price, key),
            ItemField::DeliveryLocation => edit_text(&mut item.delivery_location, key),
        }
    }

    /// Validate the form and build the request body.
    pub fn to_payload(&self) -> Result<InvoicePayload, String> {
        let customer_id = self
            .customer_id
            .ok_or_else(|| "Please choose a customer".to_string())?;

        let rate = parse_number(&self.rate_input)
            .filter(|r| *r > 0.0)
            .ok_or_else(|| "Exchange rate must be greater than 0".to_string())?;

        if self.items.is_empty() {
            return Err("Add at least one item".to_string());
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (i, draft) in self.items.iter().enumerate() {
            let line = i + 1;
            let product_id = draft
                .product_id
                .ok_or_else(|| format!("Item {}: please choose a product", line))?;
            let quantity = parse_number(&draft.quantity)
                .filter(|q| *q > 0.0)
                .ok_or_else(|| format!("Item {}: quantity must be greater than 0", line))?;
            let unit_price = match draft.unit_price.trim() {
                "" => 0.0,
                text => parse_number(text).ok_or_else(|| format!("Item {}: invalid unit price", line))?,
            };
            let unit = match draft.unit.trim() {
                "" => DEFAULT_UNIT.to_string(),
                unit => unit.to_string(),
            };

            items.push(ItemInput {
                product_id,
                quantity,
                unit,
                unit_price,
                delivery_location: draft.delivery_location.trim().to_string(),
            });
        }

        Ok(build_payload(
            customer_id,
            self.date(),
            rate,
            self.notes.trim().to_string(),
            items,
        ))
    }

    fn item_fields(&self, item: &ItemDraft) -> Vec<(&'static str, String)> {
        vec![
            ("Product", self.product_label(item.product_id)),
            ("Quantity", item.quantity.clone()),
            ("Unit", item.unit.clone()),
            ("Unit Price", item.unit_price.clone()),
            ("Delivery Location", item.delivery_location.clone()),
        ]
    }
}

pub fn render_invoice_wizard<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut InvoiceWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Min(10),   // Form
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(area);

    let title_text = match state.invoice_id {
        Some(_) => format!("Edit Order {}", state.invoice_no),
        None => "New Order".to_string(),
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);

    let help_text = if let Some(error) = &state.error {
        error.clone()
    } else if state.editing_item.is_some() {
        "Tab/Down - Next field | Shift+Tab/Up - Previous | Enter - Next / choose product | Esc - Done".to_string()
    } else if state.editing && state.current_field == InvoiceField::Items {
        "A - Add item | E/Enter - Edit item | D - Delete item | Esc - Done".to_string()
    } else if state.editing {
        "Enter - Save field | Esc - Done".to_string()
    } else {
        "Enter - Edit field | Up/Down - Navigate | R - Use USD selling rate | S - Save order | Esc - Cancel".to_string()
    };
    let color = if state.error.is_some() { Color::Red } else { Color::Gray };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);

    if let Some((_, picker)) = &mut state.picker {
        render_picker(frame, area, picker);
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceWizardState, area: Rect) {
    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(6), // Header fields
                Constraint::Min(4),    // Items
                Constraint::Length(3), // Totals
            ]
            .as_ref(),
        )
        .split(area);

    let label_style = |field: InvoiceField| {
        if state.current_field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };
    let editing = |field: InvoiceField| state.editing && state.current_field == field;

    let customer = state
        .customer_name()
        .map(str::to_string)
        .unwrap_or_else(|| "(choose customer)".to_string());
    let date = if editing(InvoiceField::Date) {
        state.date_state.get_display_string()
    } else {
        state.date().format("%d.%m.%Y").to_string()
    };
    let cursor = |field: InvoiceField| if editing(field) { "|" } else { "" };
    let suggested = state
        .suggested_rate
        .map(|r| format!("   (USD selling {:.4})", r))
        .unwrap_or_default();

    let header = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("Customer: ", label_style(InvoiceField::Customer)),
            Span::raw(customer),
        ]),
        Spans::from(vec![
            Span::styled("Date: ", label_style(InvoiceField::Date)),
            Span::raw(date),
        ]),
        Spans::from(vec![
            Span::styled("Exchange Rate (USD/TRY): ", label_style(InvoiceField::ExchangeRate)),
            Span::raw(format!("{}{}", state.rate_input, cursor(InvoiceField::ExchangeRate))),
            Span::styled(suggested, Style::default().fg(Color::Gray)),
        ]),
        Spans::from(vec![
            Span::styled("Notes: ", label_style(InvoiceField::Notes)),
            Span::raw(format!("{}{}", state.notes, cursor(InvoiceField::Notes))),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, form_chunks[0]);

    let items_block = Block::default()
        .title("Items")
        .borders(Borders::ALL)
        .style(label_style(InvoiceField::Items));

    if let Some((idx, field)) = state.editing_item {
        if let Some(item) = state.items.get(idx) {
            let fields = state.item_fields(item);
            let title = format!("Item {}", idx + 1);
            let text_editing = field != ItemField::Product;
            render_fields(frame, form_chunks[1], &title, &fields, field as usize, text_editing);
        }
    } else {
        let items: Vec<ListItem> = state
            .items
            .iter()
            .map(|item| {
                let (quantity, unit_price) = item.amounts();
                let mut text = format!(
                    "{} | {} {} x {} = {}",
                    state.product_label(item.product_id),
                    item.quantity,
                    item.unit,
                    item.unit_price,
                    format_amount(line_total(quantity, unit_price)),
                );
                if !item.delivery_location.is_empty() {
                    text.push_str(&format!(" | {}", item.delivery_location));
                }
                ListItem::new(text)
            })
            .collect();

        let list = List::new(items).block(items_block).highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, form_chunks[1], &mut state.items_list_state);
    }

    let totals = state.totals();
    let totals = Paragraph::new(Spans::from(vec![
        Span::styled("Total: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("$ {}", format_amount(totals.currency))),
        Span::raw("    "),
        Span::styled("Total TRY: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("₺ {}", format_amount(totals.try_amount))),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(totals, form_chunks[2]);
}

fn handle_item_key(state: &mut InvoiceWizardState, idx: usize, field: ItemField, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.editing_item = None,
        KeyCode::Tab | KeyCode::Down => {
            state.editing_item = Some((idx, field.next().unwrap_or(ItemField::Product)));
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.editing_item = Some((idx, field.previous().unwrap_or(ItemField::DeliveryLocation)));
        }
        KeyCode::Enter if field == ItemField::Product => state.open_product_picker(idx),
        KeyCode::Enter => state.editing_item = field.next().map(|next| (idx, next)),
        code => state.edit_item_field(idx, field, code),
    }
}

fn handle_items_key(state: &mut InvoiceWizardState, key: KeyEvent) {
    if let Some((idx, field)) = state.editing_item {
        handle_item_key(state, idx, field, key);
        return;
    }

    let len = state.items.len();
    match key.code {
        KeyCode::Esc => state.editing = false,
        KeyCode::Char('a') => state.add_item(),
        KeyCode::Char('d') => state.delete_item(),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(idx) = state.items_list_state.selected().filter(|i| *i < len) {
                state.editing_item = Some((idx, ItemField::Product));
            }
        }
        KeyCode::Down => state.items_list_state.select(next_index(state.items_list_state.selected(), len)),
        KeyCode::Up => state
            .items_list_state
            .select(previous_index(state.items_list_state.selected(), len)),
        _ => {}
    }
}

pub fn handle_key(state: &mut InvoiceWizardState, key: KeyEvent) -> Option<InvoiceWizardAction> {
    if let Some((target, picker)) = &mut state.picker {
        let target = *target;
        match picker.handle_key(key.code) {
            Some(PickerOutcome::Selected(id)) => {
                state.picker = None;
                state.apply_pick(target, id);
            }
            Some(PickerOutcome::Cancelled) => state.picker = None,
            None => {}
        }
        return None;
    }

    if state.editing {
        match state.current_field {
            InvoiceField::Items => handle_items_key(state, key),
            field => match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    state.editing = false;
                    state.date_state.editing = false;
                }
                code => match field {
                    InvoiceField::Date => state.date_state.handle_input(code),
                    InvoiceField::ExchangeRate => edit_number(&mut state.rate_input, code),
                    InvoiceField::Notes => edit_text(&mut state.notes, code),
                    InvoiceField::Customer | InvoiceField::Items => {}
                },
            },
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(InvoiceWizardAction::Cancel),
        KeyCode::Up | KeyCode::BackTab => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Enter => {
            state.error = None;
            match state.current_field {
                InvoiceField::Customer => state.open_customer_picker(),
                InvoiceField::Date => {
                    state.editing = true;
                    state.date_state.toggle_editing();
                }
                InvoiceField::Items => {
                    state.editing = true;
                    let len = state.items.len();
                    let selected = state.items_list_state.selected();
                    state.items_list_state.select(clamp_index(selected, len));
                }
                InvoiceField::ExchangeRate | InvoiceField::Notes => state.editing = true,
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => state.use_suggested_rate(),
        KeyCode::Char('s') => match state.to_payload() {
            Ok(payload) => {
                return Some(InvoiceWizardAction::Save {
                    invoice_id: state.invoice_id,
                    payload,
                });
            }
            Err(error) => state.error = Some(error),
        },
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut InvoiceWizardState, code: KeyCode) -> Option<InvoiceWizardAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut InvoiceWizardState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn customers() -> Vec<Customer> {
        vec![
            Customer {
                id: 1,
                name: "Acme Ambalaj".to_string(),
                ..Default::default()
            },
            Customer {
                id: 2,
                name: "Delta Kimya".to_string(),
                ..Default::default()
            },
        ]
    }

    fn products() -> Vec<Product> {
        vec![
            Product {
                id: 10,
                product_code: "PP-01".to_string(),
                product_name: "Homopolymer".to_string(),
                unit_price: 1.25,
                ..Default::default()
            },
            Product {
                id: 11,
                product_code: "PE-07".to_string(),
                product_name: "Film grade".to_string(),
                unit_price: 2.0,
                ..Default::default()
            },
        ]
    }

    fn new_form() -> InvoiceWizardState {
        InvoiceWizardState::new(customers(), products(), 30.0, Some(32.5))
    }

    #[test]
    fn new_form_starts_with_one_empty_item() {
        let state = new_form();
        assert_eq!(state.items, vec![ItemDraft::empty()]);
        assert_eq!(state.items[0].unit, "KG");
        assert_eq!(state.rate_input, "30");
        assert_eq!(state.date(), Local::now().date_naive());
    }

    #[test]
    fn choosing_customer_through_picker() {
        let mut state = new_form();
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "delta");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.customer_id, Some(2));
        assert_eq!(state.customer_name(), Some("Delta Kimya"));
    }

    #[test]
    fn choosing_product_copies_its_price() {
        let mut state = new_form();
        state.current_field = InvoiceField::Items;
        press(&mut state, KeyCode::Enter); // into items
        press(&mut state, KeyCode::Enter); // edit first item
        press(&mut state, KeyCode::Enter); // open product picker
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.items[0].product_id, Some(11));
        assert_eq!(state.items[0].unit_price, "2");
        assert_eq!(state.editing_item, Some((0, ItemField::Quantity)));

        press(&mut state, KeyCode::Backspace);
        type_text(&mut state, "500");
        assert_eq!(state.totals().currency, 1000.0);
        assert_eq!(state.totals().try_amount, 30000.0);
    }

    #[test]
    fn rate_key_uses_selling_rate() {
        let mut state = new_form();
        press(&mut state, KeyCode::Char('r'));
        assert_eq!(state.rate_input, "32.5000");

        let mut without = InvoiceWizardState::new(customers(), products(), 30.0, None);
        press(&mut without, KeyCode::Char('R'));
        assert_eq!(without.rate_input, "30");
    }

    #[test]
    fn save_checks_customer_then_items() {
        let mut state = new_form();
        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("Please choose a customer"));

        state.customer_id = Some(1);
        press(&mut state, KeyCode::Char('s'));
        assert_eq!(state.error.as_deref(), Some("Item 1: please choose a product"));

        state.items[0].product_id = Some(10);
        state.items[0].quantity = "0".to_string();
        press(&mut state, KeyCode::Char('s'));
        assert_eq!(state.error.as_deref(), Some("Item 1: quantity must be greater than 0"));

        state.items.clear();
        press(&mut state, KeyCode::Char('s'));
        assert_eq!(state.error.as_deref(), Some("Add at least one item"));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut state = new_form();
        state.customer_id = Some(1);
        state.rate_input = "0".to_string();
        assert_eq!(
            state.to_payload().unwrap_err(),
            "Exchange rate must be greater than 0"
        );
    }

    #[test]
    fn valid_form_saves_payload_with_totals() {
        let mut state = new_form();
        state.customer_id = Some(1);
        state.items[0] = ItemDraft {
            product_id: Some(10),
            quantity: "1000".to_string(),
            unit: String::new(),
            unit_price: "1.25".to_string(),
            delivery_location: " Gebze ".to_string(),
        };

        match press(&mut state, KeyCode::Char('s')) {
            Some(InvoiceWizardAction::Save { invoice_id, payload }) => {
                assert_eq!(invoice_id, None);
                assert_eq!(payload.customer_id, 1);
                assert_eq!(payload.items[0].unit, "KG");
                assert_eq!(payload.items[0].delivery_location, "Gebze");
                assert_eq!(payload.total_amount_currency, 1250.0);
                assert_eq!(payload.total_amount_try, 37500.0);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn items_can_be_added_and_removed() {
        let mut state = new_form();
        state.current_field = InvoiceField::Items;
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('a'));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.editing_item, Some((1, ItemField::Product)));

        press(&mut state, KeyCode::Esc);
        press(&mut state, KeyCode::Char('d'));
        press(&mut state, KeyCode::Char('d'));
        assert!(state.items.is_empty());
        press(&mut state, KeyCode::Char('d'));
        assert!(state.items.is_empty());

        press(&mut state, KeyCode::Esc);
        assert!(!state.editing);
    }

    #[test]
    fn item_fields_wrap_with_tab() {
        let mut state = new_form();
        state.editing = true;
        state.current_field = InvoiceField::Items;
        state.editing_item = Some((0, ItemField::DeliveryLocation));
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.editing_item, Some((0, ItemField::Product)));
        press(&mut state, KeyCode::BackTab);
        assert_eq!(state.editing_item, Some((0, ItemField::DeliveryLocation)));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.editing_item, None);
    }

    #[test]
    fn existing_order_maps_items() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "id": 9,
            "invoice_no": "PRF-0009",
            "customer_id": 2,
            "date": "2024-05-02T00:00:00.000Z",
            "exchange_rate_usd": "32.1",
            "notes": "FOB",
            "InvoiceItems": [
                { "product_id": 10, "quantity": "250", "unit": null, "unit_price": "1.5", "delivery_location": null }
            ]
        }))
        .unwrap();

        let state = InvoiceWizardState::from_existing(&invoice, customers(), products(), 30.0, None);
        assert_eq!(state.customer_id, Some(2));
        assert_eq!(state.date(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(state.rate_input, "32.1");
        assert_eq!(
            state.items,
            vec![ItemDraft {
                product_id: Some(10),
                quantity: "250".to_string(),
                unit: "KG".to_string(),
                unit_price: "1.5".to_string(),
                delivery_location: String::new(),
            }]
        );
    }

    #[test]
    fn existing_order_without_rate_uses_default() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "id": 11,
            "customer_id": 1,
            "exchange_rate_usd": null,
            "InvoiceItems": [
                { "product_id": 10, "quantity": "2", "unit_price": "1.5" }
            ]
        }))
        .unwrap();

        let state = InvoiceWizardState::from_existing(&invoice, customers(), products(), 30.0, None);
        assert_eq!(state.rate_input, "30");
        let payload = state.to_payload().unwrap();
        assert_eq!(state.invoice_id, Some(11));
        assert_eq!(payload.exchange_rate_usd, 30.0);
        assert_eq!(payload.total_amount_try, 90.0);
    }

    #[test]
    fn existing_order_without_items_stays_empty() {
        let invoice = Invoice {
            id: 4,
            ..Default::default()
        };
        let state = InvoiceWizardState::from_existing(&invoice, customers(), products(), 30.0, None);
        assert!(state.items.is_empty());
    }
}
