use chrono::NaiveDate;

use crate::models::{InvoiceItemPayload, InvoicePayload};

/// Totals of an order in its own currency and in Turkish lira
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub currency: f64,
    pub try_amount: f64,
}

pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Sum `quantity * unit_price` over the items and convert with the USD rate
pub fn compute_totals<I>(lines: I, exchange_rate_usd: f64) -> Totals
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let currency: f64 = lines
        .into_iter()
        .map(|(quantity, unit_price)| line_total(quantity, unit_price))
        .sum();

    Totals {
        currency,
        try_amount: currency * exchange_rate_usd,
    }
}

/// Line item as entered in the order form, before line totals are known
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub product_id: i32,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub delivery_location: String,
}

/// Fill in line totals and both order totals.
pub fn build_payload(
    customer_id: i32,
    date: NaiveDate,
    exchange_rate_usd: f64,
    notes: String,
    items: Vec<ItemInput>,
) -> InvoicePayload {
    let totals = compute_totals(
        items.iter().map(|item| (item.quantity, item.unit_price)),
        exchange_rate_usd,
    );

    let items = items
        .into_iter()
        .map(|item| InvoiceItemPayload {
            line_total: line_total(item.quantity, item.unit_price),
            product_id: item.product_id,
            quantity: item.quantity,
            unit: item.unit,
            unit_price: item.unit_price,
            delivery_location: item.delivery_location,
        })
        .collect();

    InvoicePayload {
        customer_id,
        date,
        exchange_rate_usd,
        notes,
        items,
        total_amount_currency: totals.currency,
        total_amount_try: totals.try_amount,
    }
}

/// `1234.5` -> `1,234.50`
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn format_usd(amount: f64) -> String {
    format!("$ {}", format_amount(amount))
}

/// Turkish short date, `dd.mm.yyyy`
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_default()
}
