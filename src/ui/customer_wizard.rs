use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use validator::Validate;

use crate::models::Customer;
use crate::ui::components::form::{edit_text, first_error, render_fields};

pub enum CustomerWizardAction {
    Cancel,
    Save(Customer),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum CustomerField {
    Name,
    CompanyTitle,
    TaxOffice,
    TaxNumber,
    City,
    ContactPerson,
    Email,
    Phone,
    Address,
}

impl CustomerField {
    const ALL: [CustomerField; 9] = [
        CustomerField::Name,
        CustomerField::CompanyTitle,
        CustomerField::TaxOffice,
        CustomerField::TaxNumber,
        CustomerField::City,
        CustomerField::ContactPerson,
        CustomerField::Email,
        CustomerField::Phone,
        CustomerField::Address,
    ];

    fn label(&self) -> &'static str {
        match self {
            CustomerField::Name => "Name",
            CustomerField::CompanyTitle => "Company Title",
            CustomerField::TaxOffice => "Tax Office",
            CustomerField::TaxNumber => "Tax Number",
            CustomerField::City => "City",
            CustomerField::ContactPerson => "Contact Person",
            CustomerField::Email => "Email",
            CustomerField::Phone => "Phone",
            CustomerField::Address => "Address",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

pub struct CustomerWizardState {
    pub customer: Customer,
    pub current_field: CustomerField,
    pub editing: bool,
    pub error: Option<String>,
}

impl CustomerWizardState {
    pub fn new() -> Self {
        Self::from_existing(Customer::default())
    }

    pub fn from_existing(customer: Customer) -> Self {
        Self {
            customer,
            current_field: CustomerField::Name,
            editing: false,
            error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.customer.id == 0
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        let i = (self.current_field.index() + 1) % CustomerField::ALL.len();
        self.current_field = CustomerField::ALL[i];
    }

    pub fn previous_field(&mut self) {
        let len = CustomerField::ALL.len();
        let i = (self.current_field.index() + len - 1) % len;
        self.current_field = CustomerField::ALL[i];
    }

    fn value_mut(&mut self, field: CustomerField) -> &mut String {
        let c = &mut self.customer;
        match field {
            CustomerField::Name => &mut c.name,
            CustomerField::CompanyTitle => &mut c.company_title,
            CustomerField::TaxOffice => &mut c.tax_office,
            CustomerField::TaxNumber => &mut c.tax_number,
            CustomerField::City => &mut c.city,
            CustomerField::ContactPerson => &mut c.contact_person,
            CustomerField::Email => &mut c.email,
            CustomerField::Phone => &mut c.phone,
            CustomerField::Address => &mut c.address,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }
        let field = self.current_field;
        edit_text(self.value_mut(field), key);
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let c = &self.customer;
        CustomerField::ALL
            .iter()
            .zip([
                &c.name,
                &c.company_title,
                &c.tax_office,
                &c.tax_number,
                &c.city,
                &c.contact_person,
                &c.email,
                &c.phone,
                &c.address,
            ])
            .map(|(field, value)| (field.label(), value.clone()))
            .collect()
    }
}

pub fn render_customer_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut CustomerWizardState) {
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

    let title_text = if state.is_new() { "New Customer" } else { "Edit Customer" };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_fields(
        f,
        chunks[1],
        "Customer Details",
        &state.fields(),
        state.current_field.index(),
        state.editing,
    );

    let (help_text, style) = match (&state.error, state.editing) {
        (Some(error), _) => (error.as_str(), Style::default().fg(Color::Red)),
        (None, true) => ("Enter - Save field | Esc - Cancel editing", Style::default().fg(Color::Gray)),
        (None, false) => (
            "Enter - Edit field | Up/Down - Navigate fields | S - Save customer | Esc - Cancel",
            Style::default().fg(Color::Gray),
        ),
    };
    let help = Paragraph::new(help_text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn handle_key(state: &mut CustomerWizardState, key: KeyEvent) -> Option<CustomerWizardAction> {
    if state.editing {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => state.toggle_editing(),
            code => state.edit_current_field(code),
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(CustomerWizardAction::Cancel),
        KeyCode::Enter => {
            state.error = None;
            state.toggle_editing();
        }
        KeyCode::Up | KeyCode::BackTab => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Char('s') => match state.customer.validate() {
            Ok(()) => return Some(CustomerWizardAction::Save(state.customer.clone())),
            Err(errors) => {
                state.error = Some(first_error(&errors));
                state.current_field = CustomerField::Name;
            }
        },
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut CustomerWizardState, code: KeyCode) -> Option<CustomerWizardAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn save_without_name_shows_required() {
        let mut state = CustomerWizardState::new();
        state.current_field = CustomerField::City;
        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("Required"));
        assert_eq!(state.current_field, CustomerField::Name);
    }

    #[test]
    fn typed_fields_end_up_in_saved_customer() {
        let mut state = CustomerWizardState::new();
        press(&mut state, KeyCode::Enter);
        for c in "Acme".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Up);
        assert_eq!(state.current_field, CustomerField::Address);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('X'));
        press(&mut state, KeyCode::Esc);

        match press(&mut state, KeyCode::Char('s')) {
            Some(CustomerWizardAction::Save(c)) => {
                assert_eq!(c.name, "Acme");
                assert_eq!(c.address, "X");
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn typing_s_while_editing_is_text() {
        let mut state = CustomerWizardState::new();
        press(&mut state, KeyCode::Enter);
        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.customer.name, "s");
    }

    #[test]
    fn existing_customer_is_not_new() {
        let state = CustomerWizardState::from_existing(Customer {
            id: 7,
            name: "Delta".to_string(),
            ..Default::default()
        });
        assert!(!state.is_new());
        assert_eq!(state.fields()[0], ("Name", "Delta".to_string()));
    }
}
