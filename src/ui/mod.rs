pub mod components;
pub mod customer_wizard;
pub mod customers;
pub mod dashboard;
pub mod invoice_wizard;
pub mod invoices;
pub mod layout;
pub mod login;
pub mod product_wizard;
pub mod products;
pub mod settings;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FlashKind {
    Info,
    Error,
}

/// Message popup dismissed by the next key press
#[derive(Clone, PartialEq, Debug)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}
