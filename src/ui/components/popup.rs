use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::{Flash, FlashKind};

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn render_confirmation<B: Backend>(frame: &mut Frame<B>, area: Rect, title: &str, question: &str) {
    let popup_area = centered_rect(50, 25, area);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(question.to_string()),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title(title.to_string()).borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

pub fn render_flash<B: Backend>(frame: &mut Frame<B>, flash: &Flash) {
    let popup_area = centered_rect(60, 25, frame.size());

    let (title, color) = match flash.kind {
        FlashKind::Info => ("Info", Color::Green),
        FlashKind::Error => ("Error", Color::Red),
    };

    let message = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(flash.text.clone()),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title(title).borders(Borders::ALL))
    .style(Style::default().fg(color).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(message, popup_area);
}
