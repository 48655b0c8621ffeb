use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::listing::ListingWidget;
use crate::components::status_bar::{page_info, StatusBarWidget};
use crate::remote::ListingProvider;

/// Render the application UI.
pub fn render<P: ListingProvider>(app: &App<P>, frame: &mut Frame) {
    let screen = app.screen();
    if screen.exit {
        return;
    }
    let theme = &app.theme;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let title = Span::styled(
        format!(" rclone explorer - {} ", screen.breadcrumb),
        Style::default()
            .fg(theme.title_fg)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg))
        .style(Style::default().bg(theme.list_bg).fg(theme.list_fg));
    frame.render_widget(ListingWidget::new(&screen, theme).block(block), chunks[0]);

    let info = page_info(&screen);
    let mut status = StatusBarWidget::new(&info, theme);
    if let Some(msg) = screen.status_message.as_deref() {
        status = status.status_message(msg, screen.status_is_error);
    }
    frame.render_widget(status, chunks[1]);
}
