use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::models::{BankAccount, CompanySettings};
use crate::ui::components::form::{edit_text, render_fields};
use crate::ui::components::selection::{clamp_index, next_index, previous_index};

const COMPANY_LABELS: [&str; 9] = [
    "Company Name",
    "Address",
    "City",
    "Tax Office",
    "Tax ID",
    "Trade Registry No",
    "MERSIS No",
    "Phone",
    "Email",
];

const IMAGE_LABELS: [&str; 2] = ["Logo file", "Watermark file"];

const BANK_LABELS: [&str; 4] = ["Bank Name", "Branch", "Account Holder", "IBAN (TL)"];

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SettingsTab {
    Company,
    Images,
    BankAccounts,
}

impl SettingsTab {
    const ALL: [SettingsTab; 3] = [SettingsTab::Company, SettingsTab::Images, SettingsTab::BankAccounts];

    fn title(&self) -> &'static str {
        match self {
            SettingsTab::Company => "Company Info",
            SettingsTab::Images => "Logo & Watermark",
            SettingsTab::BankAccounts => "Bank Accounts",
        }
    }

    fn field_count(&self) -> usize {
        match self {
            SettingsTab::Company => COMPANY_LABELS.len(),
            SettingsTab::Images => IMAGE_LABELS.len(),
            SettingsTab::BankAccounts => 0,
        }
    }
}

pub enum SettingsAction {
    Back,
    Save {
        settings: CompanySettings,
        logo: Option<PathBuf>,
        watermark: Option<PathBuf>,
    },
}

fn bank_field(account: &mut BankAccount, field: usize) -> Option<&mut String> {
    match field {
        0 => Some(&mut account.bank_name),
        1 => Some(&mut account.branch_name),
        2 => Some(&mut account.account_holder),
        3 => Some(&mut account.iban_tl),
        _ => None,
    }
}

fn path_input(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

pub struct SettingsState {
    pub settings: CompanySettings,
    pub tab: SettingsTab,
    pub current_field: usize,
    pub editing: bool,
    pub logo_input: String,
    pub watermark_input: String,
    bank_list_state: ListState,
    editing_bank: Option<(usize, usize)>,
}

impl SettingsState {
    pub fn new(settings: CompanySettings) -> Self {
        let mut bank_list_state = ListState::default();
        bank_list_state.select(clamp_index(None, settings.bank_accounts.len()));

        Self {
            settings,
            tab: SettingsTab::Company,
            current_field: 0,
            editing: false,
            logo_input: String::new(),
            watermark_input: String::new(),
            bank_list_state,
            editing_bank: None,
        }
    }

    /// Take the settings the server stored after a successful update.
    pub fn saved(&mut self, settings: CompanySettings) {
        self.settings = settings;
        self.logo_input.clear();
        self.watermark_input.clear();
        self.bank_list_state
            .select(clamp_index(self.bank_list_state.selected(), self.settings.bank_accounts.len()));
    }

    pub fn next_tab(&mut self) {
        let i = (self.tab as usize + 1) % SettingsTab::ALL.len();
        self.tab = SettingsTab::ALL[i];
        self.current_field = 0;
    }

    fn company_field(&mut self, field: usize) -> Option<&mut String> {
        let s = &mut self.settings;
        match field {
            0 => Some(&mut s.company_name),
            1 => Some(&mut s.address),
            2 => Some(&mut s.city),
            3 => Some(&mut s.tax_office),
            4 => Some(&mut s.tax_id),
            5 => Some(&mut s.trade_registry_no),
            6 => Some(&mut s.mersis_no),
            7 => Some(&mut s.phone),
            8 => Some(&mut s.email),
            _ => None,
        }
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        let field = self.current_field;
        let value = match self.tab {
            SettingsTab::Company => self.company_field(field),
            SettingsTab::Images if field == 0 => Some(&mut self.logo_input),
            SettingsTab::Images => Some(&mut self.watermark_input),
            SettingsTab::BankAccounts => None,
        };
        if let Some(value) = value {
            edit_text(value, key);
        }
    }

    pub fn add_bank_account(&mut self) {
        self.settings.bank_accounts.push(BankAccount::default());
        let idx = self.settings.bank_accounts.len() - 1;
        self.bank_list_state.select(Some(idx));
        self.editing_bank = Some((idx, 0));
    }

    pub fn remove_bank_account(&mut self) {
        let Some(idx) = self.bank_list_state.selected() else {
            return;
        };
        if idx < self.settings.bank_accounts.len() {
            self.settings.bank_accounts.remove(idx);
        }
        self.bank_list_state
            .select(clamp_index(Some(idx), self.settings.bank_accounts.len()));
    }

    fn save_action(&self) -> SettingsAction {
        SettingsAction::Save {
            settings: self.settings.clone(),
            logo: path_input(&self.logo_input),
            watermark: path_input(&self.watermark_input),
        }
    }
}

pub fn render_settings<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut SettingsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let titles = SettingsTab::ALL
        .iter()
        .map(|tab| Spans::from(tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.tab as usize)
        .block(Block::default().title("Settings").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    match state.tab {
        SettingsTab::Company => {
            let fields: Vec<(&str, String)> = COMPANY_LABELS
                .iter()
                .zip(state.settings.form_fields())
                .map(|(label, (_, value))| (*label, value))
                .collect();
            render_fields(frame, chunks[1], "Company Info", &fields, state.current_field, state.editing);
        }
        SettingsTab::Images => render_images(frame, chunks[1], state),
        SettingsTab::BankAccounts => render_bank_accounts(frame, chunks[1], state),
    }

    let help_text = if state.editing_bank.is_some() {
        "Tab/Down - Next field | Shift+Tab/Up - Previous | Enter/Esc - Done"
    } else if state.editing {
        "Enter - Save field | Esc - Done"
    } else if state.tab == SettingsTab::BankAccounts {
        "Tab - Next tab | A - Add account | E/Enter - Edit | D - Remove | S - Save | Esc - Back"
    } else {
        "Tab - Next tab | Enter - Edit field | Up/Down - Navigate | S - Save | Esc - Back"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);
}

fn render_images<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &SettingsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)].as_ref())
        .split(area);

    let current = |path: &str| {
        if path.is_empty() {
            "(none)".to_string()
        } else {
            path.to_string()
        }
    };
    let stored = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("Current logo: ", Style::default().fg(Color::Gray)),
            Span::raw(current(&state.settings.logo_path)),
        ]),
        Spans::from(vec![
            Span::styled("Current watermark: ", Style::default().fg(Color::Gray)),
            Span::raw(current(&state.settings.watermark_path)),
        ]),
    ])
    .block(Block::default().title("On server").borders(Borders::ALL));
    frame.render_widget(stored, chunks[0]);

    let fields = [
        (IMAGE_LABELS[0], state.logo_input.clone()),
        (IMAGE_LABELS[1], state.watermark_input.clone()),
    ];
    render_fields(frame, chunks[1], "Upload local file", &fields, state.current_field, state.editing);
}

fn render_bank_accounts<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut SettingsState) {
    if let Some((idx, field)) = state.editing_bank {
        if let Some(account) = state.settings.bank_accounts.get(idx) {
            let values = [
                account.bank_name.clone(),
                account.branch_name.clone(),
                account.account_holder.clone(),
                account.iban_tl.clone(),
            ];
            let fields: Vec<(&str, String)> = BANK_LABELS.iter().copied().zip(values).collect();
            let title = format!("Bank Account {}", idx + 1);
            render_fields(frame, area, &title, &fields, field, true);
        }
        return;
    }

    let items: Vec<ListItem> = if state.settings.bank_accounts.is_empty() {
        vec![ListItem::new("No bank accounts yet")]
    } else {
        state
            .settings
            .bank_accounts
            .iter()
            .map(|account| {
                ListItem::new(format!(
                    "{} / {} | {} | {}",
                    account.bank_name, account.branch_name, account.account_holder, account.iban_tl
                ))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().title("Bank Accounts").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut state.bank_list_state);
}

fn handle_bank_key(state: &mut SettingsState, key: KeyEvent) -> Option<SettingsAction> {
    if let Some((idx, field)) = state.editing_bank {
        let count = BANK_LABELS.len();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.editing_bank = None,
            KeyCode::Tab | KeyCode::Down => state.editing_bank = Some((idx, (field + 1) % count)),
            KeyCode::BackTab | KeyCode::Up => state.editing_bank = Some((idx, (field + count - 1) % count)),
            code => {
                if let Some(value) = state
                    .settings
                    .bank_accounts
                    .get_mut(idx)
                    .and_then(|account| bank_field(account, field))
                {
                    edit_text(value, code);
                }
            }
        }
        return None;
    }

    let len = state.settings.bank_accounts.len();
    match key.code {
        KeyCode::Esc => return Some(SettingsAction::Back),
        KeyCode::Tab => state.next_tab(),
        KeyCode::Char('s') => return Some(state.save_action()),
        KeyCode::Char('a') => state.add_bank_account(),
        KeyCode::Char('d') => state.remove_bank_account(),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(idx) = state.bank_list_state.selected().filter(|i| *i < len) {
                state.editing_bank = Some((idx, 0));
            }
        }
        KeyCode::Down => state.bank_list_state.select(next_index(state.bank_list_state.selected(), len)),
        KeyCode::Up => state.bank_list_state.select(previous_index(state.bank_list_state.selected(), len)),
        _ => {}
    }
    None
}

pub fn handle_key(state: &mut SettingsState, key: KeyEvent) -> Option<SettingsAction> {
    if state.tab == SettingsTab::BankAccounts {
        return handle_bank_key(state, key);
    }

    if state.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.editing = false,
            code => state.edit_current_field(code),
        }
        return None;
    }

    let count = state.tab.field_count();
    match key.code {
        KeyCode::Esc => return Some(SettingsAction::Back),
        KeyCode::Tab => state.next_tab(),
        KeyCode::Char('s') => return Some(state.save_action()),
        KeyCode::Enter => state.editing = true,
        KeyCode::Down => state.current_field = (state.current_field + 1) % count,
        KeyCode::Up => state.current_field = (state.current_field + count - 1) % count,
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut SettingsState, code: KeyCode) -> Option<SettingsAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut SettingsState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn settings() -> CompanySettings {
        CompanySettings {
            company_name: "My Polimer".to_string(),
            logo_path: "uploads/logo.png".to_string(),
            bank_accounts: vec![BankAccount {
                bank_name: "Ziraat".to_string(),
                iban_tl: "TR00 0001".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn company_field_edit_is_saved() {
        let mut state = SettingsState::new(settings());
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "Bursa");
        press(&mut state, KeyCode::Enter);

        match press(&mut state, KeyCode::Char('s')) {
            Some(SettingsAction::Save { settings, logo, watermark }) => {
                assert_eq!(settings.city, "Bursa");
                assert_eq!(logo, None);
                assert_eq!(watermark, None);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn tabs_cycle() {
        let mut state = SettingsState::new(settings());
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.tab, SettingsTab::Images);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.tab, SettingsTab::BankAccounts);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.tab, SettingsTab::Company);
    }

    #[test]
    fn image_paths_go_into_save() {
        let mut state = SettingsState::new(settings());
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "/tmp/wm.png");
        press(&mut state, KeyCode::Esc);

        match press(&mut state, KeyCode::Char('s')) {
            Some(SettingsAction::Save { logo, watermark, .. }) => {
                assert_eq!(logo, None);
                assert_eq!(watermark, Some(PathBuf::from("/tmp/wm.png")));
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn bank_accounts_add_edit_remove() {
        let mut state = SettingsState::new(settings());
        state.tab = SettingsTab::BankAccounts;

        press(&mut state, KeyCode::Char('a'));
        type_text(&mut state, "Garanti");
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        type_text(&mut state, "TR99");
        press(&mut state, KeyCode::Enter);

        let accounts = &state.settings.bank_accounts;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].bank_name, "Garanti");
        assert_eq!(accounts[1].iban_tl, "TR99");

        press(&mut state, KeyCode::Up);
        press(&mut state, KeyCode::Char('d'));
        assert_eq!(state.settings.bank_accounts.len(), 1);
        assert_eq!(state.settings.bank_accounts[0].bank_name, "Garanti");
    }

    #[test]
    fn saved_clears_pending_uploads() {
        let mut state = SettingsState::new(settings());
        state.logo_input = "/tmp/logo.png".to_string();
        let mut stored = settings();
        stored.bank_accounts.clear();
        state.saved(stored);

        assert!(state.logo_input.is_empty());
        assert!(state.settings.bank_accounts.is_empty());
        assert!(matches!(press(&mut state, KeyCode::Esc), Some(SettingsAction::Back)));
    }
}
