use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{flexible_date, flexible_f64, null_as_default};
use super::{Customer, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Proforma,
    Invoiced,
    Cancelled,
}

impl InvoiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Proforma => "Proforma",
            InvoiceStatus::Invoiced => "Invoiced",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }
}

/// An order as returned by `/invoices` and `/invoices/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Invoice {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_no: String,
    #[serde(default)]
    pub customer_id: Option<i32>,
    #[serde(default, rename = "Customer")]
    pub customer: Option<Customer>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub exchange_rate_usd: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, rename = "InvoiceItems", deserialize_with = "null_as_default")]
    pub items: Vec<InvoiceItem>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_amount_currency: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_amount_try: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_invoiced: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_cancelled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cancellation_reason: String,
}

impl Invoice {
    pub fn status(&self) -> InvoiceStatus {
        if self.is_cancelled || self.status.eq_ignore_ascii_case("cancelled") {
            InvoiceStatus::Cancelled
        } else if self.is_invoiced {
            InvoiceStatus::Invoiced
        } else {
            InvoiceStatus::Proforma
        }
    }

    pub fn customer_name(&self) -> &str {
        self.customer.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// Search used by the orders table: order number or customer name, ignoring case
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.invoice_no.to_lowercase().contains(&needle)
            || self.customer_name().to_lowercase().contains(&needle)
    }

    pub fn can_mark_invoiced(&self) -> bool {
        self.status() == InvoiceStatus::Proforma
    }

    pub fn can_cancel(&self) -> bool {
        self.status() != InvoiceStatus::Cancelled
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub product_id: Option<i32>,
    #[serde(default, rename = "Product")]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_location: String,
}

/// Body of `POST /invoices` and `PUT /invoices/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePayload {
    pub customer_id: i32,
    pub date: NaiveDate,
    pub exchange_rate_usd: f64,
    pub notes: String,
    pub items: Vec<InvoiceItemPayload>,
    pub total_amount_currency: f64,
    pub total_amount_try: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItemPayload {
    pub product_id: i32,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub delivery_location: String,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelRequest {
    pub cancellation_reason: String,
}
