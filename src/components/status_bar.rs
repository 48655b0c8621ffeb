use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::nav::ScreenModel;
use crate::theme::ThemeColors;

const KEY_HINTS: &str = " ↑↓:move  ⏎:open  b:back  q:quit ";

/// Page indicator, e.g. `page 2/3 · 25 items · more below`.
pub fn page_info(screen: &ScreenModel) -> String {
    let mut info = format!(
        "page {}/{} · {} item{}",
        screen.page_index + 1,
        screen.page_count,
        screen.total_entries,
        if screen.total_entries == 1 { "" } else { "s" }
    );
    match (screen.has_previous_page, screen.has_next_page) {
        (true, true) => info.push_str(" · more above/below"),
        (false, true) => info.push_str(" · more below"),
        (true, false) => info.push_str(" · more above"),
        (false, false) => {}
    }
    info
}

/// Status bar widget that displays the page indicator and key hints, or a
/// status message when one is set.
pub struct StatusBarWidget<'a> {
    page_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(page_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            page_info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default().fg(self.theme.info_fg)
            };

            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints_len = KEY_HINTS.chars().count();
        let info: String = self
            .page_info
            .chars()
            .take(width.saturating_sub(hints_len))
            .collect();
        let pad = width
            .saturating_sub(info.chars().count())
            .saturating_sub(hints_len);

        let info_style = Style::default().fg(self.theme.status_fg);
        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);

        let line = Line::from(vec![
            Span::styled(info, info_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(KEY_HINTS, hints_style),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
