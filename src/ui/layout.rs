use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const APP_NAME: &str = "My Polimer";

/// Pages reachable from the sidebar
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Dashboard,
    Customers,
    Products,
    Invoices,
    Settings,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Customers,
        Page::Products,
        Page::Invoices,
        Page::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Customers => "Customers",
            Page::Products => "Products",
            Page::Invoices => "Orders",
            Page::Settings => "Settings",
        }
    }

    /// F1..F5 follow sidebar order
    pub fn from_function_key(n: u8) -> Option<Page> {
        Page::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}

pub fn page_title(page: Option<Page>) -> &'static str {
    page.map(|p| p.title()).unwrap_or(APP_NAME)
}

/// Draw navbar and sidebar around the content and return the content area
pub fn render_shell<B: Backend>(frame: &mut Frame<B>, page: Option<Page>, username: &str) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)].as_ref())
        .split(frame.size());

    render_navbar(frame, rows[0], page, username);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)].as_ref())
        .split(rows[1]);

    render_sidebar(frame, columns[0], page);

    columns[1]
}

fn render_navbar<B: Backend>(frame: &mut Frame<B>, area: Rect, page: Option<Page>, username: &str) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let title = Paragraph::new(Spans::from(vec![
        Span::styled(APP_NAME, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("  /  "),
        Span::styled(page_title(page), Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM | Borders::LEFT | Borders::TOP));
    frame.render_widget(title, chunks[0]);

    let user = if username.is_empty() { "User" } else { username };
    let account = Paragraph::new(Spans::from(vec![
        Span::styled(user.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw("  <Ctrl+L> Logout"),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::BOTTOM | Borders::RIGHT | Borders::TOP));
    frame.render_widget(account, chunks[1]);
}

fn render_sidebar<B: Backend>(frame: &mut Frame<B>, area: Rect, page: Option<Page>) {
    let items: Vec<ListItem> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| ListItem::new(format!("F{} {}", i + 1, p.title())))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(page.and_then(|current| Page::ALL.iter().position(|p| *p == current)));

    let sidebar = List::new(items)
        .block(Block::default().title("Menu").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(sidebar, area, &mut list_state);
}
