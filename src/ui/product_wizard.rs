use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use validator::Validate;

use crate::models::{Product, CURRENCIES, RAW_MATERIAL_TYPES};
use crate::ui::components::form::{edit_number, edit_text, first_error, number_text, parse_number, render_fields};

pub enum ProductWizardAction {
    Cancel,
    Save(Product),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ProductField {
    Code,
    Name,
    RawMaterial,
    Origin,
    Packaging,
    UnitPrice,
    Currency,
    VatRate,
    Description,
}

impl ProductField {
    const ALL: [ProductField; 9] = [
        ProductField::Code,
        ProductField::Name,
        ProductField::RawMaterial,
        ProductField::Origin,
        ProductField::Packaging,
        ProductField::UnitPrice,
        ProductField::Currency,
        ProductField::VatRate,
        ProductField::Description,
    ];

    fn label(&self) -> &'static str {
        match self {
            ProductField::Code => "Product Code",
            ProductField::Name => "Product Name",
            ProductField::RawMaterial => "Raw Material",
            ProductField::Origin => "Origin",
            ProductField::Packaging => "Packaging",
            ProductField::UnitPrice => "Unit Price",
            ProductField::Currency => "Currency",
            ProductField::VatRate => "VAT Rate (%)",
            ProductField::Description => "Description",
        }
    }

    /// Choice fields cycle through a fixed list instead of taking text.
    fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            ProductField::RawMaterial => Some(&RAW_MATERIAL_TYPES[..]),
            ProductField::Currency => Some(&CURRENCIES[..]),
            _ => None,
        }
    }
}

/// Step through `choices` from `current`; an unknown value starts at the first entry.
fn cycle(choices: &[&str], current: &str, forward: bool) -> String {
    let len = choices.len();
    let next = match choices.iter().position(|c| *c == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    choices[next].to_string()
}

pub struct ProductWizardState {
    pub product: Product,
    pub unit_price_input: String,
    pub vat_input: String,
    pub current_field: ProductField,
    pub editing: bool,
    pub error: Option<String>,
}

impl ProductWizardState {
    pub fn new() -> Self {
        Self::from_existing(Product::default())
    }

    pub fn from_existing(product: Product) -> Self {
        Self {
            unit_price_input: number_text(product.unit_price),
            vat_input: number_text(product.default_vat_rate),
            product,
            current_field: ProductField::Code,
            editing: false,
            error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.product.id == 0
    }

    pub fn next_field(&mut self) {
        let i = (self.current_field as usize + 1) % ProductField::ALL.len();
        self.current_field = ProductField::ALL[i];
    }

    pub fn previous_field(&mut self) {
        let len = ProductField::ALL.len();
        let i = (self.current_field as usize + len - 1) % len;
        self.current_field = ProductField::ALL[i];
    }

    fn cycle_choice(&mut self, forward: bool) {
        let Some(choices) = self.current_field.choices() else {
            return;
        };
        let value = match self.current_field {
            ProductField::RawMaterial => &mut self.product.raw_material_type,
            _ => &mut self.product.currency,
        };
        *value = cycle(choices, value, forward);
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        let p = &mut self.product;
        match self.current_field {
            ProductField::Code => edit_text(&mut p.product_code, key),
            ProductField::Name => edit_text(&mut p.product_name, key),
            ProductField::Origin => edit_text(&mut p.origin, key),
            ProductField::Packaging => edit_text(&mut p.packaging, key),
            ProductField::Description => edit_text(&mut p.description, key),
            ProductField::UnitPrice => edit_number(&mut self.unit_price_input, key),
            ProductField::VatRate => edit_number(&mut self.vat_input, key),
            ProductField::RawMaterial | ProductField::Currency => {}
        }
    }

    /// Validated product ready to send. Empty price reads as 0, empty VAT as 20.
    pub fn to_product(&self) -> Result<Product, String> {
        let mut product = self.product.clone();

        product.unit_price = match self.unit_price_input.trim() {
            "" => 0.0,
            text => parse_number(text).ok_or_else(|| "Unit price must be a number".to_string())?,
        };
        product.default_vat_rate = match self.vat_input.trim() {
            "" => 20.0,
            text => parse_number(text).ok_or_else(|| "VAT rate must be a number".to_string())?,
        };

        product.validate().map_err(|e| first_error(&e))?;
        Ok(product)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let p = &self.product;
        ProductField::ALL
            .iter()
            .map(|field| {
                let value = match field {
                    ProductField::Code => p.product_code.clone(),
                    ProductField::Name => p.product_name.clone(),
                    ProductField::RawMaterial if p.raw_material_type.is_empty() => "-".to_string(),
                    ProductField::RawMaterial => p.raw_material_type.clone(),
                    ProductField::Origin => p.origin.clone(),
                    ProductField::Packaging => p.packaging.clone(),
                    ProductField::UnitPrice => self.unit_price_input.clone(),
                    ProductField::Currency => p.currency.clone(),
                    ProductField::VatRate => self.vat_input.clone(),
                    ProductField::Description => p.description.clone(),
                };
                (field.label(), value)
            })
            .collect()
    }
}

pub fn render_product_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut ProductWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title_text = if state.is_new() { "New Product" } else { "Edit Product" };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_fields(
        f,
        chunks[1],
        "Product Details",
        &state.fields(),
        state.current_field as usize,
        state.editing,
    );

    let help_text = if let Some(error) = &state.error {
        error.as_str()
    } else if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.current_field.choices().is_some() {
        "Left/Right - Change | Up/Down - Navigate fields | S - Save product | Esc - Cancel"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save product | Esc - Cancel"
    };
    let color = if state.error.is_some() { Color::Red } else { Color::Gray };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn handle_key(state: &mut ProductWizardState, key: KeyEvent) -> Option<ProductWizardAction> {
    if state.editing {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => state.editing = false,
            code => state.edit_current_field(code),
        }
        return None;
    }

    let is_choice = state.current_field.choices().is_some();
    match key.code {
        KeyCode::Esc => return Some(ProductWizardAction::Cancel),
        KeyCode::Enter | KeyCode::Right if is_choice => state.cycle_choice(true),
        KeyCode::Left if is_choice => state.cycle_choice(false),
        KeyCode::Enter => {
            state.error = None;
            state.editing = true;
        }
        KeyCode::Up | KeyCode::BackTab => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Char('s') => match state.to_product() {
            Ok(product) => return Some(ProductWizardAction::Save(product)),
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

    fn press(state: &mut ProductWizardState, code: KeyCode) -> Option<ProductWizardAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn goto(state: &mut ProductWizardState, field: ProductField) {
        while state.current_field != field {
            press(state, KeyCode::Down);
        }
    }

    #[test]
    fn name_is_required() {
        let mut state = ProductWizardState::new();
        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("Product name is required"));
    }

    #[test]
    fn choice_fields_cycle() {
        let mut state = ProductWizardState::new();
        goto(&mut state, ProductField::RawMaterial);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.product.raw_material_type, "PP");
        press(&mut state, KeyCode::Left);
        assert_eq!(state.product.raw_material_type, "HIPS");
        assert!(!state.editing);

        goto(&mut state, ProductField::Currency);
        press(&mut state, KeyCode::Right);
        assert_eq!(state.product.currency, "EUR");
        press(&mut state, KeyCode::Right);
        assert_eq!(state.product.currency, "USD");
    }

    #[test]
    fn numbers_are_parsed_on_save() {
        let mut state = ProductWizardState::new();
        state.product.product_name = "Homopolymer".to_string();
        state.unit_price_input = "1,25".to_string();
        state.vat_input.clear();

        match press(&mut state, KeyCode::Char('s')) {
            Some(ProductWizardAction::Save(p)) => {
                assert_eq!(p.unit_price, 1.25);
                assert_eq!(p.default_vat_rate, 20.0);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn bad_number_blocks_save() {
        let mut state = ProductWizardState::new();
        state.product.product_name = "Homopolymer".to_string();
        state.vat_input = "1.2.3".to_string();
        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("VAT rate must be a number"));
    }

    #[test]
    fn existing_values_prefill_inputs() {
        let state = ProductWizardState::from_existing(Product {
            id: 4,
            unit_price: 1.5,
            default_vat_rate: 10.0,
            ..Default::default()
        });
        assert_eq!(state.unit_price_input, "1.5");
        assert_eq!(state.vat_input, "10");
    }
}
