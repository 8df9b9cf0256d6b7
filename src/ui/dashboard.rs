use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::ExchangeRates;

pub enum RatesStatus {
    Loading,
    Loaded(ExchangeRates),
    Unavailable,
}

pub struct DashboardState {
    pub rates: RatesStatus,
}

pub enum DashboardAction {
    Exit,
    NewInvoice,
    NewCustomer,
    NewProduct,
    RefreshRates,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            rates: RatesStatus::Loading,
        }
    }

    pub fn rates(&self) -> Option<&ExchangeRates> {
        match &self.rates {
            RatesStatus::Loaded(rates) => Some(rates),
            _ => None,
        }
    }
}

fn rate_text(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.4}", r)).unwrap_or_else(|| "-".to_string())
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);

    let rates = match &state.rates {
        RatesStatus::Loading => vec![Spans::from("Loading rates...")],
        RatesStatus::Unavailable => vec![
            Spans::from("Loading rates..."),
            Spans::from(""),
            Spans::from(Span::styled("<R> Retry", Style::default().fg(Color::Red))),
        ],
        RatesStatus::Loaded(rates) => vec![
            Spans::from(vec![
                Span::styled("USD Selling: ", Style::default().fg(Color::Yellow)),
                Span::raw(rate_text(rates.usd_selling())),
            ]),
            Spans::from(vec![
                Span::styled("EUR Selling: ", Style::default().fg(Color::Yellow)),
                Span::raw(rate_text(rates.eur_selling())),
            ]),
            Spans::from(""),
            Spans::from("<R> Refresh"),
        ],
    };

    let rates = Paragraph::new(rates).block(
        Block::default()
            .title("Exchange Rates (TCMB)")
            .borders(Borders::ALL),
    );
    frame.render_widget(rates, chunks[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let actions = Paragraph::new(vec![
        Spans::from(vec![Span::styled("<N>", bold), Span::raw(" New order")]),
        Spans::from(vec![Span::styled("<C>", bold), Span::raw(" Add customer")]),
        Spans::from(vec![Span::styled("<P>", bold), Span::raw(" Add product")]),
        Spans::from(""),
        Spans::from(vec![Span::styled("<Q>", bold), Span::raw(" Quit")]),
    ])
    .block(Block::default().title("Quick Actions").borders(Borders::ALL));
    frame.render_widget(actions, chunks[1]);
}

pub fn handle_key(key: KeyEvent) -> Option<DashboardAction> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(DashboardAction::Exit),
        KeyCode::Char('n') => Some(DashboardAction::NewInvoice),
        KeyCode::Char('c') => Some(DashboardAction::NewCustomer),
        KeyCode::Char('p') => Some(DashboardAction::NewProduct),
        KeyCode::Char('r') => Some(DashboardAction::RefreshRates),
        _ => None,
    }
}
