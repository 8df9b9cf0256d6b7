use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::form::edit_text;
use crate::ui::components::popup::centered_rect;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LoginField {
    Username,
    Password,
}

pub struct LoginState {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    pub show_password: bool,
    pub error: Option<String>,
}

pub enum LoginAction {
    Exit,
    Submit { username: String, password: String },
}

impl LoginState {
    pub fn new(username: Option<String>) -> Self {
        let field = if username.is_some() {
            LoginField::Password
        } else {
            LoginField::Username
        };

        Self {
            username: username.unwrap_or_default(),
            password: String::new(),
            field,
            show_password: false,
            error: None,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Forget the password after a failed attempt or a logout
    pub fn reset(&mut self, error: Option<String>) {
        self.password.clear();
        self.field = if self.username.is_empty() {
            LoginField::Username
        } else {
            LoginField::Password
        };
        self.error = error;
    }

    fn masked_password(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "*".repeat(self.password.chars().count())
        }
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut LoginState) {
    let panel = centered_rect(50, 60, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Length(3), // Username
                Constraint::Length(3), // Password
                Constraint::Length(3), // Error
                Constraint::Min(1),    // Help
            ]
            .as_ref(),
        )
        .split(panel);

    let title = Paragraph::new("My Polimer - Proforma Management")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let field_style = |field: LoginField| {
        if state.field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };
    let cursor = |field: LoginField| if state.field == field { "|" } else { "" };

    let username = Paragraph::new(Spans::from(vec![
        Span::styled("Username: ", field_style(LoginField::Username)),
        Span::raw(format!("{}{}", state.username, cursor(LoginField::Username))),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(username, chunks[1]);

    let password = Paragraph::new(Spans::from(vec![
        Span::styled("Password: ", field_style(LoginField::Password)),
        Span::raw(format!("{}{}", state.masked_password(), cursor(LoginField::Password))),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(password, chunks[2]);

    if let Some(error) = &state.error {
        let error = Paragraph::new(error.clone())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[3]);
    }

    let help = Paragraph::new("Tab - Switch field | Enter - Sign in | Ctrl+R - Show password | Esc - Quit")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, chunks[4]);
}

pub fn handle_key(state: &mut LoginState, key: KeyEvent) -> Option<LoginAction> {
    match key.code {
        KeyCode::Esc => return Some(LoginAction::Exit),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => state.toggle_field(),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.show_password = !state.show_password;
        }
        KeyCode::Enter => {
            if state.username.trim().is_empty() || state.password.is_empty() {
                state.error = Some("Please enter your username and password".to_string());
            } else {
                state.error = None;
                return Some(LoginAction::Submit {
                    username: state.username.trim().to_string(),
                    password: state.password.clone(),
                });
            }
        }
        code => match state.field {
            LoginField::Username => edit_text(&mut state.username, code),
            LoginField::Password => edit_text(&mut state.password, code),
        },
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut LoginState, code: KeyCode) -> Option<LoginAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut LoginState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut state = LoginState::new(None);
        assert!(press(&mut state, KeyCode::Enter).is_none());
        assert!(state.error.is_some());
    }

    #[test]
    fn submits_trimmed_username() {
        let mut state = LoginState::new(None);
        type_text(&mut state, " admin ");
        press(&mut state, KeyCode::Tab);
        type_text(&mut state, "s3cret");

        match press(&mut state, KeyCode::Enter) {
            Some(LoginAction::Submit { username, password }) => {
                assert_eq!(username, "admin");
                assert_eq!(password, "s3cret");
            }
            _ => panic!("expected submit"),
        }
        assert!(state.error.is_none());
    }

    #[test]
    fn prefilled_username_starts_on_password() {
        let mut state = LoginState::new(Some("admin".to_string()));
        assert_eq!(state.field, LoginField::Password);
        type_text(&mut state, "pw");
        assert_eq!(state.masked_password(), "**");

        handle_key(&mut state, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(state.masked_password(), "pw");
    }

    #[test]
    fn reset_clears_password_and_sets_error() {
        let mut state = LoginState::new(Some("admin".to_string()));
        type_text(&mut state, "pw");
        state.reset(Some("Invalid credentials".to_string()));

        assert!(state.password.is_empty());
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(state.field, LoginField::Password);
    }
}
