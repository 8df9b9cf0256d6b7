use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::serde_helpers::{flexible_f64, flexible_opt_f64, null_as_default};

pub const RAW_MATERIAL_TYPES: [&str; 11] = [
    "PP", "PE", "PVC", "PET", "PS", "ABS", "LDPE", "HDPE", "LLDPE", "GPPS", "HIPS",
];

pub const CURRENCIES: [&str; 2] = ["USD", "EUR"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[serde(default, skip_serializing)]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_code: String,
    #[validate(length(min = 1, message = "Product name is required"))]
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_material_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub packaging: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub unit_price: f64,
    #[serde(default = "default_currency", deserialize_with = "currency_or_default")]
    pub currency: String,
    #[serde(default = "default_vat_rate", deserialize_with = "vat_rate_or_default")]
    pub default_vat_rate: f64,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_vat_rate() -> f64 {
    20.0
}

// Unset columns come back as `null`, which must not erase the defaults.
fn currency_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(default_currency))
}

fn vat_rate_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flexible_opt_f64(deserializer)?.unwrap_or_else(default_vat_rate))
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: 0,
            product_code: String::new(),
            product_name: String::new(),
            raw_material_type: String::new(),
            description: String::new(),
            origin: String::new(),
            packaging: String::new(),
            unit_price: 0.0,
            currency: default_currency(),
            default_vat_rate: default_vat_rate(),
        }
    }
}

impl Product {
    /// Label used wherever a product is picked, e.g. `PP-01 - Polypropylene`
    pub fn label(&self) -> String {
        format!("{} - {}", self.product_code, self.product_name)
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.product_code.to_lowercase().contains(&needle)
            || self.product_name.to_lowercase().contains(&needle)
    }
}
