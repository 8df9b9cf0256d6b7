mod auth;
mod customer;
mod exchange_rates;
mod invoice;
mod product;
mod serde_helpers;
mod settings;

pub use auth::{LoginRequest, LoginResponse, User};
pub use customer::Customer;
pub use exchange_rates::ExchangeRates;
pub use invoice::{
    CancelRequest, Invoice, InvoiceItem, InvoiceItemPayload, InvoicePayload, InvoiceStatus,
};
pub use product::{Product, CURRENCIES, RAW_MATERIAL_TYPES};
pub use settings::{BankAccount, CompanySettings};
