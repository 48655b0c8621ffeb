use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::format::{format_modified, format_size};
use crate::nav::engine::Row;
use crate::nav::ScreenModel;
use crate::theme::ThemeColors;

/// Width of the right-aligned size column.
const SIZE_WIDTH: usize = 10;
/// Width of the modification time column (`YYYY-MM-DD HH:MM`).
const MODIFIED_WIDTH: usize = 16;
/// Below this inner width the modification time column is dropped.
const MODIFIED_MIN_WIDTH: usize = 60;

/// Renders the rows of one page of a directory listing.
pub struct ListingWidget<'a> {
    screen: &'a ScreenModel,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ListingWidget<'a> {
    pub fn new(screen: &'a ScreenModel, theme: &'a ThemeColors) -> Self {
        Self {
            screen,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn indicator(row: &Row) -> &'static str {
        if row.entry.is_dir {
            "[D] "
        } else {
            "[F] "
        }
    }

    /// First row to draw so the selection stays inside `height` lines.
    fn scroll_offset(rows: &[Row], height: usize) -> usize {
        let selected = rows.iter().position(|r| r.selected).unwrap_or(0);
        selected.saturating_sub(height.saturating_sub(1))
    }

    /// Cut `name` to `max` characters, ending in "..." when shortened.
    fn truncate(name: &str, max: usize) -> String {
        if name.chars().count() <= max {
            return name.to_string();
        }
        if max <= 3 {
            return name.chars().take(max).collect();
        }
        let mut out: String = name.chars().take(max - 3).collect();
        out.push_str("...");
        out
    }

    fn row_line(&self, row: &Row, width: usize) -> Line<'static> {
        let show_modified = width >= MODIFIED_MIN_WIDTH;
        let indicator = Self::indicator(row);
        let size = if row.entry.is_dir {
            "<DIR>".to_string()
        } else {
            format_size(row.entry.size_bytes)
        };
        let modified = if show_modified {
            row.entry
                .modified_at
                .as_ref()
                .map(format_modified)
                .unwrap_or_default()
        } else {
            String::new()
        };

        let meta_width = SIZE_WIDTH + 1 + if show_modified { MODIFIED_WIDTH + 1 } else { 0 };
        let name_width = width.saturating_sub(indicator.len() + meta_width);
        let name = Self::truncate(&row.entry.name, name_width);

        let (name_style, meta_style) = if row.selected {
            let s = Style::default()
                .bg(self.theme.list_selected_bg)
                .fg(self.theme.list_selected_fg)
                .add_modifier(Modifier::BOLD);
            (s, s)
        } else if row.entry.is_dir {
            (
                Style::default()
                    .fg(self.theme.list_dir_fg)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(self.theme.list_meta_fg),
            )
        } else {
            (
                Style::default().fg(self.theme.list_file_fg),
                Style::default().fg(self.theme.list_meta_fg),
            )
        };

        let mut spans = vec![
            Span::styled(indicator, name_style),
            Span::styled(format!("{name:<name_width$}"), name_style),
            Span::styled(format!(" {size:>SIZE_WIDTH$}"), meta_style),
        ];
        if show_modified {
            spans.push(Span::styled(format!(" {modified:>MODIFIED_WIDTH$}"), meta_style));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        if self.screen.rows.is_empty() {
            let line = Line::from(Span::styled(
                "(empty directory)",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }

        let width = inner_area.width as usize;
        let height = inner_area.height as usize;
        for (i, row) in self
            .screen
            .rows
            .iter()
            .skip(Self::scroll_offset(&self.screen.rows, height))
            .take(height)
            .enumerate()
        {
            let y = inner_area.y + i as u16;
            let line = self.row_line(row, width);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
