mod error;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{
    CancelRequest, CompanySettings, Customer, ExchangeRates, Invoice, InvoicePayload,
    LoginRequest, LoginResponse, Product, User,
};

pub use error::ApiError;

/// Error body the backend sends alongside non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the proforma backend
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Self::with_base_url(
            config.api_url(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(client)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("request failed: {}", e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message.or(body.error))
            .filter(|m| !m.trim().is_empty());

        tracing::error!(status = status.as_u16(), path = %url, message = ?message, "backend returned an error");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(message));
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!("could not decode response: {}", e);
            ApiError::Decode(e)
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await?;
        Ok(())
    }

    // Auth
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .fetch(self.request(Method::POST, "/auth/login").json(&body))
            .await?;

        self.token = Some(response.token);
        tracing::info!(username, "signed in");

        Ok(response.user.unwrap_or_else(|| User {
            id: None,
            username: username.to_string(),
        }))
    }

    pub fn logout(&mut self) {
        self.token = None;
        tracing::info!("signed out");
    }

    // Customers
    pub async fn load_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.fetch(self.request(Method::GET, "/customers")).await
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, "/customers").json(customer))
            .await
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        let path = format!("/customers/{}", customer.id);
        self.execute(self.request(Method::PUT, &path).json(customer))
            .await
    }

    pub async fn delete_customer(&self, id: i32) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/customers/{}", id)))
            .await
    }

    // Products
    pub async fn load_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch(self.request(Method::GET, "/products")).await
    }

    pub async fn create_product(&self, product: &Product) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, "/products").json(product))
            .await
    }

    pub async fn update_product(&self, product: &Product) -> Result<(), ApiError> {
        let path = format!("/products/{}", product.id);
        self.execute(self.request(Method::PUT, &path).json(product))
            .await
    }

    pub async fn delete_product(&self, id: i32) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/products/{}", id)))
            .await
    }

    // Invoices
    pub async fn load_invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        self.fetch(self.request(Method::GET, "/invoices")).await
    }

    pub async fn get_invoice(&self, id: i32) -> Result<Invoice, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/invoices/{}", id)))
            .await
    }

    pub async fn create_invoice(&self, payload: &InvoicePayload) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, "/invoices").json(payload))
            .await
    }

    pub async fn update_invoice(&self, id: i32, payload: &InvoicePayload) -> Result<(), ApiError> {
        self.execute(self.request(Method::PUT, &format!("/invoices/{}", id)).json(payload))
            .await
    }

    pub async fn delete_invoice(&self, id: i32) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/invoices/{}", id)))
            .await
    }

    pub async fn download_invoice_pdf(&self, id: i32) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(self.request(Method::GET, &format!("/invoices/{}/pdf", id)))
            .await?;
        let bytes = response.bytes().await.map_err(ApiError::Decode)?;
        Ok(bytes.to_vec())
    }

    /// Turn a proforma into a final invoice
    pub async fn mark_invoiced(&self, id: i32) -> Result<(), ApiError> {
        self.execute(self.request(Method::PUT, &format!("/invoices/{}/mark-invoiced", id)))
            .await
    }

    pub async fn cancel_invoice(&self, id: i32, reason: &str) -> Result<(), ApiError> {
        let body = CancelRequest {
            cancellation_reason: reason.to_string(),
        };
        self.execute(self.request(Method::PUT, &format!("/invoices/{}/cancel", id)).json(&body))
            .await
    }

    // Settings
    pub async fn get_settings(&self) -> Result<CompanySettings, ApiError> {
        self.fetch(self.request(Method::GET, "/settings")).await
    }

    /// Multipart update. Bank accounts travel as one JSON-encoded text part;
    /// logo and watermark are attached only when a local file was chosen.
    pub async fn update_settings(
        &self,
        settings: &CompanySettings,
        logo: Option<&Path>,
        watermark: Option<&Path>,
    ) -> Result<CompanySettings, ApiError> {
        let mut form = Form::new();
        for (name, value) in settings.form_fields() {
            form = form.text(name, value);
        }

        let bank_accounts = serde_json::to_string(&settings.bank_accounts)?;
        form = form.text("bank_accounts", bank_accounts);

        if let Some(path) = logo {
            form = form.part("logo", image_part(path).await?);
        }
        if let Some(path) = watermark {
            form = form.part("watermark", image_part(path).await?);
        }

        self.fetch(self.request(Method::PUT, "/settings").multipart(form))
            .await
    }

    // Common
    pub async fn load_exchange_rates(&self) -> Result<ExchangeRates, ApiError> {
        self.fetch(self.request(Method::GET, "/common/exchange-rates"))
            .await
    }
}

async fn image_part(path: &Path) -> Result<Part, ApiError> {
    let data = tokio::fs::read(path).await.map_err(|source| ApiError::File {
        path: path.display().to_string(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Part::bytes(data)
        .file_name(file_name)
        .mime_str(image_mime(path).as_ref())
        .map_err(ApiError::Transport)
}

fn image_mime(path: &Path) -> mime::Mime {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("bmp") => mime::IMAGE_BMP,
        Some("svg") => mime::IMAGE_SVG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
