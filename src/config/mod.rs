use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use serde::Deserialize;

/// Command line overrides for the environment configuration
#[derive(Debug, Default, Parser)]
#[command(name = "proforma_manager", about = "Terminal panel for proforma orders, customers and products")]
pub struct Cli {
    /// Base URL of the REST backend, e.g. http://localhost:3000/api
    #[arg(long)]
    pub api_url: Option<String>,

    /// Directory downloaded order PDFs are written to
    #[arg(long)]
    pub output_dir: Option<String>,

    /// File the application log is written to
    #[arg(long)]
    pub log_file: Option<String>,

    /// Prefill the login form with this username
    #[arg(long)]
    pub username: Option<String>,
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// REST backend base URL
    pub api_url: String,

    #[serde(default = "default_pdf_output_dir")]
    pub pdf_output_dir: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Exchange rate prefilled in new orders
    #[serde(default = "default_exchange_rate")]
    pub default_exchange_rate: f64,

    #[serde(skip)]
    pub username: Option<String>,
}

fn default_pdf_output_dir() -> String {
    "./pdfs".to_string()
}

fn default_log_file() -> String {
    "proforma_manager.log".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_exchange_rate() -> f64 {
    30.0
}

impl Config {
    /// Build a configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        Ok(config)
    }

    /// Apply command line flags on top of the loaded values
    pub fn apply_cli(mut self, cli: Cli) -> Self {
        if let Some(api_url) = cli.api_url {
            self.api_url = api_url;
        }
        if let Some(output_dir) = cli.output_dir {
            self.pdf_output_dir = output_dir;
        }
        if let Some(log_file) = cli.log_file {
            self.log_file = log_file;
        }
        self.username = cli.username;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Load environment configuration and apply command line overrides.
///
/// `API_URL` may be left unset when `--api-url` is passed.
pub fn init(cli: Cli) -> Result<Config> {
    dotenv().ok();

    let mut vars: Vec<(String, String)> = std::env::vars().collect();
    if let Some(api_url) = &cli.api_url {
        vars.retain(|(key, _)| !key.eq_ignore_ascii_case("API_URL"));
        vars.push(("API_URL".to_string(), api_url.clone()));
    }

    let config = Config::from_vars(vars)?.apply_cli(cli);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = Config::from_vars(vars(&[("API_URL", "http://localhost:3000/api")])).unwrap();

        assert_eq!(config.api_url(), "http://localhost:3000/api");
        assert_eq!(config.pdf_output_dir, "./pdfs");
        assert_eq!(config.log_file, "proforma_manager.log");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_exchange_rate, 30.0);
    }

    #[test]
    fn missing_api_url_is_an_error() {
        assert!(Config::from_vars(vars(&[("PDF_OUTPUT_DIR", "/tmp")])).is_err());
    }

    #[test]
    fn numeric_values_are_parsed() {
        let config = Config::from_vars(vars(&[
            ("API_URL", "http://api"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("DEFAULT_EXCHANGE_RATE", "34.25"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.default_exchange_rate, 34.25);
    }

    #[test]
    fn cli_flags_override_environment() {
        let config = Config::from_vars(vars(&[("API_URL", "http://env"), ("PDF_OUTPUT_DIR", "/env")]))
            .unwrap()
            .apply_cli(Cli {
                api_url: Some("http://flag".to_string()),
                output_dir: Some("/flag".to_string()),
                log_file: None,
                username: Some("admin".to_string()),
            });

        assert_eq!(config.api_url, "http://flag");
        assert_eq!(config.pdf_output_dir, "/flag");
        assert_eq!(config.log_file, "proforma_manager.log");
        assert_eq!(config.username.as_deref(), Some("admin"));
    }
}
