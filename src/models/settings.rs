use serde::{Deserialize, Serialize};

use super::serde_helpers::{list_or_json_string, null_as_default};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bank_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_holder: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub iban_tl: String,
}

/// Company profile printed on every order PDF
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySettings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_office: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_registry_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mersis_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub watermark_path: String,
    #[serde(default, deserialize_with = "list_or_json_string")]
    pub bank_accounts: Vec<BankAccount>,
}

impl CompanySettings {
    /// Scalar fields sent as text parts of the multipart update
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("company_name", self.company_name.clone()),
            ("address", self.address.clone()),
            ("city", self.city.clone()),
            ("tax_office", self.tax_office.clone()),
            ("tax_id", self.tax_id.clone()),
            ("trade_registry_no", self.trade_registry_no.clone()),
            ("mersis_no", self.mersis_no.clone()),
            ("phone", self.phone.clone()),
            ("email", self.email.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bank_accounts_accept_array_or_json_string() {
        let from_array: CompanySettings = serde_json::from_value(json!({
            "company_name": "My Polimer",
            "bank_accounts": [{ "bank_name": "Ziraat", "iban_tl": "TR00" }]
        }))
        .unwrap();
        let from_string: CompanySettings = serde_json::from_value(json!({
            "company_name": "My Polimer",
            "bank_accounts": "[{\"bank_name\":\"Ziraat\",\"iban_tl\":\"TR00\"}]"
        }))
        .unwrap();

        assert_eq!(from_array.bank_accounts, from_string.bank_accounts);
        assert_eq!(from_array.bank_accounts[0].bank_name, "Ziraat");
        assert_eq!(from_array.bank_accounts[0].branch_name, "");
    }

    #[test]
    fn empty_settings_deserialize() {
        let s: CompanySettings = serde_json::from_value(json!({ "bank_accounts": null, "logo_path": null })).unwrap();
        assert!(s.bank_accounts.is_empty());
        assert_eq!(s.logo_path, "");
    }

    #[test]
    fn form_fields_skip_assets_and_accounts() {
        let fields = CompanySettings::default().form_fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), 9);
        assert!(!names.contains(&"bank_accounts"));
        assert!(!names.contains(&"logo_path"));
    }
}
