use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::invoice_calc::{format_amount, format_date, format_usd};
use crate::models::{Invoice, InvoiceStatus};
use crate::ui::components::form::edit_text;
use crate::ui::components::popup::{centered_rect, render_confirmation};
use crate::ui::components::selection::{clamp_index, next_index, previous_index};

enum Popup {
    ConfirmDelete,
    CancelReason { reason: String, error: Option<String> },
}

// Represents the state of the orders table screen
pub struct InvoicesState {
    invoices: Vec<Invoice>,
    pub search: String,
    pub searching: bool,
    table_state: TableState,
    popup: Option<Popup>,
}

pub enum InvoiceAction {
    Back,
    NewInvoice,
    EditInvoice(i32),
    DownloadPdf { id: i32, invoice_no: String },
    MarkInvoiced(i32),
    CancelInvoice { id: i32, reason: String },
    DeleteInvoice(i32),
}

impl InvoicesState {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        let mut state = Self {
            invoices,
            search: String::new(),
            searching: false,
            table_state: TableState::default(),
            popup: None,
        };
        state.clamp_selection();
        state
    }

    pub fn replace(&mut self, invoices: Vec<Invoice>) {
        self.invoices = invoices;
        self.clamp_selection();
    }

    pub fn total(&self) -> usize {
        self.invoices.len()
    }

    pub fn filtered(&self) -> Vec<&Invoice> {
        self.invoices
            .iter()
            .filter(|i| i.matches(&self.search))
            .collect()
    }

    pub fn selected_invoice(&self) -> Option<&Invoice> {
        let filtered = self.filtered();
        self.table_state
            .selected()
            .and_then(|i| filtered.get(i).copied())
    }

    pub fn selected_invoice_id(&self) -> Option<i32> {
        self.selected_invoice().map(|i| i.id)
    }

    pub fn next(&mut self) {
        let len = self.filtered().len();
        self.table_state.select(next_index(self.table_state.selected(), len));
    }

    pub fn previous(&mut self) {
        let len = self.filtered().len();
        self.table_state.select(previous_index(self.table_state.selected(), len));
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        self.table_state.select(clamp_index(self.table_state.selected(), len));
    }
}

fn status_style(status: InvoiceStatus) -> Style {
    match status {
        InvoiceStatus::Proforma => Style::default().fg(Color::Cyan),
        InvoiceStatus::Invoiced => Style::default().fg(Color::Green),
        InvoiceStatus::Cancelled => Style::default().fg(Color::Red),
    }
}

/// TRY total of the highlighted order, plus the reason when it was cancelled
fn selected_detail(invoice: &Invoice) -> String {
    let mut detail = format!("TRY total: ₺ {}", format_amount(invoice.total_amount_try));
    if invoice.status() == InvoiceStatus::Cancelled && !invoice.cancellation_reason.is_empty() {
        detail.push_str(&format!(" | Reason: {}", invoice.cancellation_reason));
    }
    detail
}

pub fn render_invoices<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut InvoicesState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut header = vec![
        Span::styled(format!("Total {} orders", state.total()), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Search: ", search_style),
        Span::raw(format!("{}{}", state.search, if state.searching { "|" } else { "" })),
    ];
    if let Some(invoice) = state.selected_invoice() {
        header.push(Span::raw("   "));
        header.push(Span::styled(selected_detail(invoice), Style::default().fg(Color::Gray)));
    }
    let search = Paragraph::new(Spans::from(header))
        .block(Block::default().title("Orders").borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);

    let header_cells = ["Order No", "Date", "Customer", "Total", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows: Vec<Row> = state
        .filtered()
        .into_iter()
        .map(|invoice| {
            let status = invoice.status();
            Row::new(vec![
                Cell::from(invoice.invoice_no.clone()),
                Cell::from(format_date(invoice.date)),
                Cell::from(invoice.customer_name().to_string()),
                Cell::from(format_usd(invoice.total_amount_currency)),
                Cell::from(status.label()).style(status_style(status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(16),
        Constraint::Percentage(14),
        Constraint::Percentage(36),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&widths);
    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    let buttons_text = if state.searching {
        "Type to filter | <Enter> Keep | <Esc> Clear".to_string()
    } else if let Some(invoice) = state.selected_invoice() {
        let mut text = String::from("<N> New | <E> Edit | <P> PDF");
        if invoice.can_mark_invoiced() {
            text.push_str(" | <I> Mark invoiced");
        }
        if invoice.can_cancel() {
            text.push_str(" | <X> Cancel order");
        }
        text.push_str(" | <D> Delete | </> Search | <Esc> Back");
        text
    } else {
        "<N> New | </> Search | <Esc> Back".to_string()
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);

    match &state.popup {
        Some(Popup::ConfirmDelete) => {
            render_confirmation(frame, area, "Confirm Delete", "Are you sure you want to delete this order?");
        }
        Some(Popup::CancelReason { reason, error }) => render_cancel_reason(frame, area, reason, error.as_deref()),
        None => {}
    }
}

fn render_cancel_reason<B: Backend>(frame: &mut Frame<B>, area: Rect, reason: &str, error: Option<&str>) {
    let popup_area = centered_rect(60, 30, area);

    let mut lines = vec![
        Spans::from("Cancellation reason:"),
        Spans::from(Span::styled(format!("{}|", reason), Style::default().add_modifier(Modifier::BOLD))),
        Spans::from(""),
    ];
    if let Some(error) = error {
        lines.push(Spans::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Spans::from("<Enter> Cancel order  <Esc> Back"));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Cancel Order").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

fn handle_popup_key(state: &mut InvoicesState, key: KeyEvent) -> Option<InvoiceAction> {
    let id = state.selected_invoice_id()?;

    match state.popup.as_mut()? {
        Popup::ConfirmDelete => match key.code {
            KeyCode::Char('y') => {
                state.popup = None;
                return Some(InvoiceAction::DeleteInvoice(id));
            }
            KeyCode::Char('n') | KeyCode::Esc => state.popup = None,
            _ => {}
        },
        Popup::CancelReason { reason, error } => match key.code {
            KeyCode::Esc => state.popup = None,
            KeyCode::Enter if reason.trim().is_empty() => {
                *error = Some("Cancellation reason is required".to_string());
            }
            KeyCode::Enter => {
                let reason = reason.trim().to_string();
                state.popup = None;
                return Some(InvoiceAction::CancelInvoice { id, reason });
            }
            code => edit_text(reason, code),
        },
    }
    None
}

pub fn handle_key(state: &mut InvoicesState, key: KeyEvent) -> Option<InvoiceAction> {
    if state.popup.is_some() {
        let action = handle_popup_key(state, key);
        if state.selected_invoice().is_none() {
            state.popup = None;
        }
        return action;
    }

    if state.searching {
        match key.code {
            KeyCode::Enter => state.searching = false,
            KeyCode::Esc => {
                state.searching = false;
                state.search.clear();
            }
            KeyCode::Up => state.previous(),
            KeyCode::Down => state.next(),
            code => edit_text(&mut state.search, code),
        }
        state.clamp_selection();
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(InvoiceAction::Back),
        KeyCode::Char('n') => return Some(InvoiceAction::NewInvoice),
        KeyCode::Char('/') => state.searching = true,
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        code => {
            let invoice = state.selected_invoice()?;
            let id = invoice.id;
            match code {
                KeyCode::Char('e') | KeyCode::Enter => return Some(InvoiceAction::EditInvoice(id)),
                KeyCode::Char('p') => {
                    return Some(InvoiceAction::DownloadPdf {
                        id,
                        invoice_no: invoice.invoice_no.clone(),
                    });
                }
                KeyCode::Char('i') if invoice.can_mark_invoiced() => {
                    return Some(InvoiceAction::MarkInvoiced(id));
                }
                KeyCode::Char('x') if invoice.can_cancel() => {
                    state.popup = Some(Popup::CancelReason {
                        reason: String::new(),
                        error: None,
                    });
                }
                KeyCode::Char('d') => state.popup = Some(Popup::ConfirmDelete),
                _ => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Customer;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut InvoicesState, code: KeyCode) -> Option<InvoiceAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn invoice(id: i32, no: &str, customer: &str) -> Invoice {
        Invoice {
            id,
            invoice_no: no.to_string(),
            customer: Some(Customer {
                name: customer.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn invoices() -> Vec<Invoice> {
        let mut cancelled = invoice(3, "PRF-0003", "Ege Plastik");
        cancelled.is_cancelled = true;
        let mut invoiced = invoice(2, "PRF-0002", "Delta Kimya");
        invoiced.is_invoiced = true;
        vec![invoice(1, "PRF-0001", "Acme Ambalaj"), invoiced, cancelled]
    }

    #[test]
    fn search_matches_number_or_customer() {
        let mut state = InvoicesState::new(invoices());
        state.search = "delta".to_string();
        assert_eq!(state.filtered().len(), 1);
        state.search = "prf-000".to_string();
        assert_eq!(state.filtered().len(), 3);
    }

    #[test]
    fn total_ignores_search() {
        let mut state = InvoicesState::new(invoices());
        state.search = "ege".to_string();
        assert_eq!(state.filtered().len(), 1);
        assert_eq!(state.total(), 3);
    }

    #[test]
    fn mark_invoiced_only_for_proforma() {
        let mut state = InvoicesState::new(invoices());
        assert!(matches!(press(&mut state, KeyCode::Char('i')), Some(InvoiceAction::MarkInvoiced(1))));

        press(&mut state, KeyCode::Down);
        assert!(press(&mut state, KeyCode::Char('i')).is_none());
    }

    #[test]
    fn cancel_needs_a_reason() {
        let mut state = InvoicesState::new(invoices());
        press(&mut state, KeyCode::Char('x'));
        assert!(press(&mut state, KeyCode::Enter).is_none());
        assert!(matches!(
            &state.popup,
            Some(Popup::CancelReason { error: Some(_), .. })
        ));

        for c in "wrong price".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        match press(&mut state, KeyCode::Enter) {
            Some(InvoiceAction::CancelInvoice { id, reason }) => {
                assert_eq!(id, 1);
                assert_eq!(reason, "wrong price");
            }
            _ => panic!("expected cancel"),
        }
        assert!(state.popup.is_none());
    }

    #[test]
    fn cancelled_order_cannot_be_cancelled_again() {
        let mut state = InvoicesState::new(invoices());
        press(&mut state, KeyCode::Up);
        assert!(press(&mut state, KeyCode::Char('x')).is_none());
        assert!(state.popup.is_none());
    }

    #[test]
    fn pdf_carries_order_number() {
        let mut state = InvoicesState::new(invoices());
        match press(&mut state, KeyCode::Char('p')) {
            Some(InvoiceAction::DownloadPdf { id, invoice_no }) => {
                assert_eq!(id, 1);
                assert_eq!(invoice_no, "PRF-0001");
            }
            _ => panic!("expected pdf download"),
        }
    }

    #[test]
    fn detail_shows_cancellation_reason() {
        let mut cancelled = invoice(3, "PRF-0003", "Ege Plastik");
        cancelled.is_cancelled = true;
        cancelled.total_amount_try = 1500.0;
        cancelled.cancellation_reason = "Duplicate order".to_string();
        assert_eq!(selected_detail(&cancelled), "TRY total: ₺ 1,500.00 | Reason: Duplicate order");
    }

    #[test]
    fn delete_is_confirmed() {
        let mut state = InvoicesState::new(invoices());
        press(&mut state, KeyCode::Char('d'));
        assert!(press(&mut state, KeyCode::Char('e')).is_none());
        assert!(matches!(press(&mut state, KeyCode::Char('y')), Some(InvoiceAction::DeleteInvoice(1))));
    }
}
