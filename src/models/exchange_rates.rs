use serde::Deserialize;

use super::serde_helpers::flexible_f64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Rate {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub buying: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub selling: f64,
}

/// Central bank rates served by `/common/exchange-rates`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExchangeRates {
    #[serde(default, rename = "USD")]
    pub usd: Option<Rate>,
    #[serde(default, rename = "EUR")]
    pub eur: Option<Rate>,
}

impl ExchangeRates {
    pub fn usd_selling(&self) -> Option<f64> {
        self.usd.map(|r| r.selling).filter(|r| *r > 0.0)
    }

    pub fn eur_selling(&self) -> Option<f64> {
        self.eur.map(|r| r.selling).filter(|r| *r > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rates_in_either_number_form() {
        let rates: ExchangeRates = serde_json::from_value(json!({
            "USD": { "buying": 32.1, "selling": "32.25" },
            "EUR": { "buying": "35.0", "selling": 35.2 },
            "date": "2024-05-02"
        }))
        .unwrap();

        assert_eq!(rates.usd_selling(), Some(32.25));
        assert_eq!(rates.eur_selling(), Some(35.2));
    }

    #[test]
    fn missing_currency_has_no_rate() {
        let rates: ExchangeRates = serde_json::from_value(json!({ "USD": { "selling": 0 } })).unwrap();
        assert_eq!(rates.usd_selling(), None);
        assert_eq!(rates.eur_selling(), None);
    }
}
