mod api;
mod config;
mod invoice_calc;
mod logging;
mod models;
mod pdf_export;
mod ui;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};

use crate::api::{ApiClient, ApiError};
use crate::config::{Cli, Config};
use crate::models::{Customer, Product, User};
use crate::pdf_export::PdfExporter;
use crate::ui::{
    components::popup::render_flash,
    customer_wizard::{self, render_customer_wizard, CustomerWizardAction, CustomerWizardState},
    customers::{self, render_customers, CustomerAction, CustomersState},
    dashboard::{self, render_dashboard, DashboardAction, DashboardState, RatesStatus},
    invoice_wizard::{self, render_invoice_wizard, InvoiceWizardAction, InvoiceWizardState},
    invoices::{self, render_invoices, InvoiceAction, InvoicesState},
    layout::{render_shell, Page},
    login::{self, render_login, LoginAction, LoginState},
    product_wizard::{self, render_product_wizard, ProductWizardAction, ProductWizardState},
    products::{self, render_products, ProductAction, ProductsState},
    settings::{self, render_settings, SettingsAction, SettingsState},
    Flash,
};

// Represents the current screen in the app
#[derive(Clone, Copy, PartialEq, Debug)]
enum AppScreen {
    Login,
    Dashboard,
    Customers,
    CustomerWizard,
    Products,
    ProductWizard,
    Invoices,
    InvoiceWizard,
    Settings,
}

impl AppScreen {
    fn page(&self) -> Option<Page> {
        match self {
            AppScreen::Login => None,
            AppScreen::Dashboard => Some(Page::Dashboard),
            AppScreen::Customers | AppScreen::CustomerWizard => Some(Page::Customers),
            AppScreen::Products | AppScreen::ProductWizard => Some(Page::Products),
            AppScreen::Invoices | AppScreen::InvoiceWizard => Some(Page::Invoices),
            AppScreen::Settings => Some(Page::Settings),
        }
    }

    /// Forms keep function keys to themselves so unsaved input is not dropped.
    fn is_form(&self) -> bool {
        matches!(
            self,
            AppScreen::CustomerWizard
                | AppScreen::ProductWizard
                | AppScreen::InvoiceWizard
                | AppScreen::Settings
        )
    }
}

// Main application state
struct AppState {
    api: ApiClient,
    config: Config,
    pdf: PdfExporter,
    user: Option<User>,
    screen: AppScreen,
    flash: Option<Flash>,
    should_quit: bool,
    // Lookup lists for the order form
    customers: Vec<Customer>,
    products: Vec<Product>,
    login_state: LoginState,
    dashboard_state: DashboardState,
    customers_state: Option<CustomersState>,
    customer_wizard_state: Option<CustomerWizardState>,
    products_state: Option<ProductsState>,
    product_wizard_state: Option<ProductWizardState>,
    invoices_state: Option<InvoicesState>,
    invoice_wizard_state: Option<InvoiceWizardState>,
    settings_state: Option<SettingsState>,
}

impl AppState {
    fn new(api: ApiClient, config: Config) -> Self {
        Self {
            api,
            pdf: PdfExporter::new(&config.pdf_output_dir),
            login_state: LoginState::new(config.username.clone()),
            config,
            user: None,
            screen: AppScreen::Login,
            flash: None,
            should_quit: false,
            customers: Vec::new(),
            products: Vec::new(),
            dashboard_state: DashboardState::new(),
            customers_state: None,
            customer_wizard_state: None,
            products_state: None,
            product_wizard_state: None,
            invoices_state: None,
            invoice_wizard_state: None,
            settings_state: None,
        }
    }

    fn username(&self) -> &str {
        self.user.as_ref().map(|u| u.username.as_str()).unwrap_or("")
    }

    /// Drop the token and every loaded screen, back to the login form.
    fn sign_out(&mut self, message: Option<String>) {
        self.api.logout();
        self.user = None;
        self.customers.clear();
        self.products.clear();
        self.dashboard_state = DashboardState::new();
        self.customers_state = None;
        self.customer_wizard_state = None;
        self.products_state = None;
        self.product_wizard_state = None;
        self.invoices_state = None;
        self.invoice_wizard_state = None;
        self.settings_state = None;
        self.login_state.reset(message);
        self.screen = AppScreen::Login;
    }

    /// Log a failed operation and tell the user. An expired session signs out.
    fn report(&mut self, err: anyhow::Error) {
        tracing::error!("{:#}", err);

        let api_error = err.downcast_ref::<ApiError>();
        if api_error.is_some_and(ApiError::is_unauthorized) && self.api.is_authenticated() {
            let message = api_error.map(ApiError::user_message);
            self.sign_out(message);
            return;
        }

        let detail = api_error
            .map(ApiError::user_message)
            .unwrap_or_else(|| err.root_cause().to_string());
        let text = if err.chain().count() > 1 {
            format!("{}: {}", err, detail)
        } else {
            detail
        };
        self.flash = Some(Flash::error(text));
    }

    fn suggested_rate(&self) -> Option<f64> {
        self.dashboard_state.rates().and_then(|r| r.usd_selling())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init(cli)?;
    logging::init(&config.log_file)?;
    tracing::info!(api_url = config.api_url(), "starting proforma manager");

    let api = ApiClient::new(&config)?;
    let mut app_state = AppState::new(api, config);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("fatal: {:#}", err);
        println!("Error: {:#}", err);
    }

    tracing::info!("exiting");
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    while !app_state.should_quit {
        terminal.draw(|f| draw(f, app_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Err(err) = handle_key(app_state, key).await {
                app_state.report(err);
            }
        }
    }

    Ok(())
}

fn draw<B: Backend>(f: &mut Frame<B>, app_state: &mut AppState) {
    if app_state.screen == AppScreen::Login {
        let size = f.size();
        render_login(f, size, &mut app_state.login_state);
    } else {
        let area = render_shell(f, app_state.screen.page(), app_state.username());

        match app_state.screen {
            AppScreen::Login => {}
            AppScreen::Dashboard => render_dashboard(f, area, &app_state.dashboard_state),
            AppScreen::Customers => {
                if let Some(state) = &mut app_state.customers_state {
                    render_customers(f, area, state);
                }
            }
            AppScreen::CustomerWizard => {
                if let Some(state) = &mut app_state.customer_wizard_state {
                    render_customer_wizard(f, area, state);
                }
            }
            AppScreen::Products => {
                if let Some(state) = &mut app_state.products_state {
                    render_products(f, area, state);
                }
            }
            AppScreen::ProductWizard => {
                if let Some(state) = &mut app_state.product_wizard_state {
                    render_product_wizard(f, area, state);
                }
            }
            AppScreen::Invoices => {
                if let Some(state) = &mut app_state.invoices_state {
                    render_invoices(f, area, state);
                }
            }
            AppScreen::InvoiceWizard => {
                if let Some(state) = &mut app_state.invoice_wizard_state {
                    render_invoice_wizard(f, area, state);
                }
            }
            AppScreen::Settings => {
                if let Some(state) = &mut app_state.settings_state {
                    render_settings(f, area, state);
                }
            }
        }
    }

    if let Some(flash) = &app_state.flash {
        render_flash(f, flash);
    }
}

async fn handle_key(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app_state.should_quit = true;
        return Ok(());
    }

    // Any key dismisses the message popup
    if app_state.flash.take().is_some() {
        return Ok(());
    }

    if app_state.screen != AppScreen::Login {
        if ctrl && key.code == KeyCode::Char('l') {
            app_state.sign_out(None);
            return Ok(());
        }
        if let KeyCode::F(n) = key.code {
            if !app_state.screen.is_form() {
                if let Some(page) = Page::from_function_key(n) {
                    return open_page(app_state, page).await;
                }
            }
        }
    }

    match app_state.screen {
        AppScreen::Login => handle_login_screen(app_state, key).await,
        AppScreen::Dashboard => handle_dashboard_screen(app_state, key).await,
        AppScreen::Customers => handle_customers_screen(app_state, key).await,
        AppScreen::CustomerWizard => handle_customer_wizard_screen(app_state, key).await,
        AppScreen::Products => handle_products_screen(app_state, key).await,
        AppScreen::ProductWizard => handle_product_wizard_screen(app_state, key).await,
        AppScreen::Invoices => handle_invoices_screen(app_state, key).await,
        AppScreen::InvoiceWizard => handle_invoice_wizard_screen(app_state, key).await,
        AppScreen::Settings => handle_settings_screen(app_state, key).await,
    }
}

async fn refresh_rates(app_state: &mut AppState) {
    app_state.dashboard_state.rates = match app_state.api.load_exchange_rates().await {
        Ok(rates) => RatesStatus::Loaded(rates),
        Err(err) => {
            tracing::warn!("could not load exchange rates: {}", err);
            RatesStatus::Unavailable
        }
    };
}

async fn load_customers(app_state: &mut AppState) -> Result<()> {
    let customers = app_state
        .api
        .load_customers()
        .await
        .context("Failed to load customers")?;
    app_state
        .customers_state
        .get_or_insert_with(|| CustomersState::new(Vec::new()))
        .replace(customers);
    Ok(())
}

async fn load_products(app_state: &mut AppState) -> Result<()> {
    let products = app_state
        .api
        .load_products()
        .await
        .context("Failed to load products")?;
    app_state
        .products_state
        .get_or_insert_with(|| ProductsState::new(Vec::new()))
        .replace(products);
    Ok(())
}

/// Orders plus the customer and product lists the order form picks from.
async fn load_invoices(app_state: &mut AppState) -> Result<()> {
    let api = &app_state.api;
    let (invoices, customers, products) = tokio::try_join!(
        api.load_invoices(),
        api.load_customers(),
        api.load_products()
    )
    .context("Failed to load orders")?;

    app_state.customers = customers;
    app_state.products = products;
    app_state
        .invoices_state
        .get_or_insert_with(|| InvoicesState::new(Vec::new()))
        .replace(invoices);
    Ok(())
}

async fn open_page(app_state: &mut AppState, page: Page) -> Result<()> {
    match page {
        Page::Dashboard => {
            app_state.screen = AppScreen::Dashboard;
            refresh_rates(app_state).await;
        }
        Page::Customers => {
            load_customers(app_state).await?;
            app_state.screen = AppScreen::Customers;
        }
        Page::Products => {
            load_products(app_state).await?;
            app_state.screen = AppScreen::Products;
        }
        Page::Invoices => {
            load_invoices(app_state).await?;
            app_state.screen = AppScreen::Invoices;
        }
        Page::Settings => {
            let settings = app_state
                .api
                .get_settings()
                .await
                .context("Failed to load settings")?;
            app_state.settings_state = Some(SettingsState::new(settings));
            app_state.screen = AppScreen::Settings;
        }
    }
    Ok(())
}

async fn handle_login_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    match login::handle_key(&mut app_state.login_state, key) {
        Some(LoginAction::Exit) => app_state.should_quit = true,
        Some(LoginAction::Submit { username, password }) => {
            match app_state.api.login(&username, &password).await {
                Ok(user) => {
                    app_state.user = Some(user);
                    app_state.login_state.reset(None);
                    open_page(app_state, Page::Dashboard).await?;
                }
                Err(err) => {
                    tracing::warn!(%username, "login failed: {}", err);
                    let message = err.backend_message().unwrap_or("Login failed").to_string();
                    app_state.login_state.reset(Some(message));
                }
            }
        }
        None => {}
    }
    Ok(())
}

async fn handle_dashboard_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    match dashboard::handle_key(key) {
        Some(DashboardAction::Exit) => app_state.should_quit = true,
        Some(DashboardAction::RefreshRates) => refresh_rates(app_state).await,
        Some(DashboardAction::NewInvoice) => {
            open_page(app_state, Page::Invoices).await?;
            open_new_invoice(app_state);
        }
        Some(DashboardAction::NewCustomer) => {
            open_page(app_state, Page::Customers).await?;
            app_state.customer_wizard_state = Some(CustomerWizardState::new());
            app_state.screen = AppScreen::CustomerWizard;
        }
        Some(DashboardAction::NewProduct) => {
            open_page(app_state, Page::Products).await?;
            app_state.product_wizard_state = Some(ProductWizardState::new());
            app_state.screen = AppScreen::ProductWizard;
        }
        None => {}
    }
    Ok(())
}

async fn handle_customers_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.customers_state {
        Some(state) => customers::handle_key(state, key),
        None => None,
    };

    match action {
        Some(CustomerAction::Back) => open_page(app_state, Page::Dashboard).await?,
        Some(CustomerAction::NewCustomer) => {
            app_state.customer_wizard_state = Some(CustomerWizardState::new());
            app_state.screen = AppScreen::CustomerWizard;
        }
        Some(CustomerAction::EditCustomer(customer)) => {
            app_state.customer_wizard_state = Some(CustomerWizardState::from_existing(customer));
            app_state.screen = AppScreen::CustomerWizard;
        }
        Some(CustomerAction::DeleteCustomer(id)) => {
            app_state
                .api
                .delete_customer(id)
                .await
                .context("Failed to delete customer")?;
            tracing::info!(id, "customer deleted");
            load_customers(app_state).await?;
            app_state.flash = Some(Flash::info("Customer deleted"));
        }
        None => {}
    }
    Ok(())
}

async fn handle_customer_wizard_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.customer_wizard_state {
        Some(state) => customer_wizard::handle_key(state, key),
        None => None,
    };

    match action {
        Some(CustomerWizardAction::Cancel) => {
            app_state.customer_wizard_state = None;
            app_state.screen = AppScreen::Customers;
        }
        Some(CustomerWizardAction::Save(customer)) => {
            let saved = if customer.id == 0 {
                app_state.api.create_customer(&customer).await
            } else {
                app_state.api.update_customer(&customer).await
            };
            saved.context("Failed to save customer")?;
            tracing::info!(name = %customer.name, "customer saved");

            app_state.customer_wizard_state = None;
            load_customers(app_state).await?;
            app_state.screen = AppScreen::Customers;
            app_state.flash = Some(Flash::info("Customer saved"));
        }
        None => {}
    }
    Ok(())
}

async fn handle_products_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.products_state {
        Some(state) => products::handle_key(state, key),
        None => None,
    };

    match action {
        Some(ProductAction::Back) => open_page(app_state, Page::Dashboard).await?,
        Some(ProductAction::NewProduct) => {
            app_state.product_wizard_state = Some(ProductWizardState::new());
            app_state.screen = AppScreen::ProductWizard;
        }
        Some(ProductAction::EditProduct(product)) => {
            app_state.product_wizard_state = Some(ProductWizardState::from_existing(product));
            app_state.screen = AppScreen::ProductWizard;
        }
        Some(ProductAction::DeleteProduct(id)) => {
            app_state
                .api
                .delete_product(id)
                .await
                .context("Failed to delete product")?;
            tracing::info!(id, "product deleted");
            load_products(app_state).await?;
            app_state.flash = Some(Flash::info("Product deleted"));
        }
        None => {}
    }
    Ok(())
}

async fn handle_product_wizard_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.product_wizard_state {
        Some(state) => product_wizard::handle_key(state, key),
        None => None,
    };

    match action {
        Some(ProductWizardAction::Cancel) => {
            app_state.product_wizard_state = None;
            app_state.screen = AppScreen::Products;
        }
        Some(ProductWizardAction::Save(product)) => {
            let saved = if product.id == 0 {
                app_state.api.create_product(&product).await
            } else {
                app_state.api.update_product(&product).await
            };
            saved.context("Failed to save product")?;
            tracing::info!(code = %product.product_code, "product saved");

            app_state.product_wizard_state = None;
            load_products(app_state).await?;
            app_state.screen = AppScreen::Products;
            app_state.flash = Some(Flash::info("Product saved"));
        }
        None => {}
    }
    Ok(())
}

fn open_new_invoice(app_state: &mut AppState) {
    app_state.invoice_wizard_state = Some(InvoiceWizardState::new(
        app_state.customers.clone(),
        app_state.products.clone(),
        app_state.config.default_exchange_rate,
        app_state.suggested_rate(),
    ));
    app_state.screen = AppScreen::InvoiceWizard;
}

async fn handle_invoices_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.invoices_state {
        Some(state) => invoices::handle_key(state, key),
        None => None,
    };

    match action {
        Some(InvoiceAction::Back) => open_page(app_state, Page::Dashboard).await?,
        Some(InvoiceAction::NewInvoice) => open_new_invoice(app_state),
        Some(InvoiceAction::EditInvoice(id)) => {
            let invoice = app_state
                .api
                .get_invoice(id)
                .await
                .context("Failed to load order")?;
            app_state.invoice_wizard_state = Some(InvoiceWizardState::from_existing(
                &invoice,
                app_state.customers.clone(),
                app_state.products.clone(),
                app_state.config.default_exchange_rate,
                app_state.suggested_rate(),
            ));
            app_state.screen = AppScreen::InvoiceWizard;
        }
        Some(InvoiceAction::DownloadPdf { id, invoice_no }) => {
            let bytes = app_state
                .api
                .download_invoice_pdf(id)
                .await
                .context("Failed to download PDF")?;
            let path = app_state
                .pdf
                .save(&invoice_no, &bytes)
                .context("Failed to save PDF")?;
            app_state.flash = Some(Flash::info(format!("PDF saved to {}", path.display())));
        }
        Some(InvoiceAction::MarkInvoiced(id)) => {
            app_state
                .api
                .mark_invoiced(id)
                .await
                .context("Failed to mark order as invoiced")?;
            tracing::info!(id, "order marked as invoiced");
            load_invoices(app_state).await?;
            app_state.flash = Some(Flash::info("Order marked as invoiced"));
        }
        Some(InvoiceAction::CancelInvoice { id, reason }) => {
            app_state
                .api
                .cancel_invoice(id, &reason)
                .await
                .context("Failed to cancel order")?;
            tracing::info!(id, %reason, "order cancelled");
            load_invoices(app_state).await?;
            app_state.flash = Some(Flash::info("Order cancelled"));
        }
        Some(InvoiceAction::DeleteInvoice(id)) => {
            app_state
                .api
                .delete_invoice(id)
                .await
                .context("Failed to delete order")?;
            tracing::info!(id, "order deleted");
            load_invoices(app_state).await?;
            app_state.flash = Some(Flash::info("Order deleted"));
        }
        None => {}
    }
    Ok(())
}

async fn handle_invoice_wizard_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.invoice_wizard_state {
        Some(state) => invoice_wizard::handle_key(state, key),
        None => None,
    };

    match action {
        Some(InvoiceWizardAction::Cancel) => {
            app_state.invoice_wizard_state = None;
            app_state.screen = AppScreen::Invoices;
        }
        Some(InvoiceWizardAction::Save { invoice_id, payload }) => {
            let saved = match invoice_id {
                Some(id) => app_state.api.update_invoice(id, &payload).await,
                None => app_state.api.create_invoice(&payload).await,
            };
            saved.context("Failed to save order")?;
            tracing::info!(
                customer_id = payload.customer_id,
                total = payload.total_amount_currency,
                "order saved"
            );

            app_state.invoice_wizard_state = None;
            load_invoices(app_state).await?;
            app_state.screen = AppScreen::Invoices;
            app_state.flash = Some(Flash::info("Order saved"));
        }
        None => {}
    }
    Ok(())
}

async fn handle_settings_screen(app_state: &mut AppState, key: KeyEvent) -> Result<()> {
    let action = match &mut app_state.settings_state {
        Some(state) => settings::handle_key(state, key),
        None => None,
    };

    match action {
        Some(SettingsAction::Back) => open_page(app_state, Page::Dashboard).await?,
        Some(SettingsAction::Save { settings, logo, watermark }) => {
            let stored = app_state
                .api
                .update_settings(&settings, logo.as_deref(), watermark.as_deref())
                .await
                .context("Failed to update settings")?;
            tracing::info!("settings updated");

            if let Some(state) = &mut app_state.settings_state {
                state.saved(stored);
            }
            app_state.flash = Some(Flash::info("Settings updated successfully"));
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompanySettings;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    async fn signed_in_app(server: &MockServer) -> AppState {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "secret-token",
                "user": { "id": 1, "username": "admin" }
            })))
            .mount(server)
            .await;

        let config = Config::from_vars(vec![("API_URL".to_string(), server.uri())]).unwrap();
        let mut api = ApiClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap();
        let user = api.login("admin", "pw").await.unwrap();

        let mut app_state = AppState::new(api, config);
        app_state.user = Some(user);
        app_state.customers = vec![Customer::default()];
        app_state.customers_state = Some(CustomersState::new(vec![Customer::default()]));
        app_state.screen = AppScreen::Customers;
        app_state
    }

    #[tokio::test]
    async fn expired_session_returns_to_login() {
        let server = MockServer::start().await;
        let mut app_state = signed_in_app(&server).await;

        let err = anyhow::Error::from(ApiError::Unauthorized(Some("expired".to_string())))
            .context("Failed to load customers");
        app_state.report(err);

        assert_eq!(app_state.screen, AppScreen::Login);
        assert!(!app_state.api.is_authenticated());
        assert!(app_state.user.is_none());
        assert!(app_state.customers.is_empty());
        assert!(app_state.customers_state.is_none());
        assert_eq!(app_state.login_state.error.as_deref(), Some("expired"));
        assert!(app_state.flash.is_none());
    }

    #[tokio::test]
    async fn other_errors_flash_and_keep_the_screen() {
        let server = MockServer::start().await;
        let mut app_state = signed_in_app(&server).await;

        let err = anyhow::Error::from(ApiError::Status {
            status: 500,
            message: Some("Database unavailable".to_string()),
        })
        .context("Failed to load customers");
        app_state.report(err);

        assert_eq!(app_state.screen, AppScreen::Customers);
        assert!(app_state.api.is_authenticated());
        assert_eq!(
            app_state.flash,
            Some(Flash::error("Failed to load customers: Database unavailable"))
        );
    }

    #[tokio::test]
    async fn ctrl_l_signs_out() {
        let server = MockServer::start().await;
        let mut app_state = signed_in_app(&server).await;

        handle_key(&mut app_state, press(KeyCode::Char('l'), KeyModifiers::CONTROL))
            .await
            .unwrap();

        assert_eq!(app_state.screen, AppScreen::Login);
        assert!(!app_state.api.is_authenticated());
        assert!(app_state.customers_state.is_none());
        assert_eq!(app_state.login_state.error, None);
    }

    #[tokio::test]
    async fn settings_keeps_function_keys() {
        let server = MockServer::start().await;
        let mut app_state = signed_in_app(&server).await;
        app_state.settings_state = Some(SettingsState::new(CompanySettings::default()));
        app_state.screen = AppScreen::Settings;

        handle_key(&mut app_state, press(KeyCode::F(2), KeyModifiers::NONE))
            .await
            .unwrap();

        assert_eq!(app_state.screen, AppScreen::Settings);
        assert!(app_state.settings_state.is_some());
    }
}
