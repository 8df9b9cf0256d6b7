use serde::{Deserialize, Serialize};
use validator::Validate;

use super::serde_helpers::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[serde(default, skip_serializing)]
    pub id: i32,
    #[validate(length(min = 1, message = "Required"))]
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_office: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_person: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

impl Customer {
    /// Search used by the customers table: name or city ignoring case, phone as typed.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.city.to_lowercase().contains(&needle)
            || self.phone.contains(query)
    }
}
