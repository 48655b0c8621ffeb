//! Theme data model: built-in palettes and resolution from config.
//!
//! The theme system provides two built-in palettes (dark and light) and
//! supports custom color overrides from the config file.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Listing panel
    pub list_bg: Color,
    pub list_fg: Color,
    pub list_selected_bg: Color,
    pub list_selected_fg: Color,
    pub list_dir_fg: Color,
    pub list_file_fg: Color,
    pub list_meta_fg: Color,

    // Title / breadcrumb
    pub title_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders
    pub border_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        list_bg: Color::Reset,
        list_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        list_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        list_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        list_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        list_file_fg: Color::Rgb(205, 214, 244),     // #cdd6f4
        list_meta_fg: Color::Rgb(166, 173, 200),     // #a6adc8 (subtext0)

        title_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        error_fg: Color::Rgb(243, 139, 168), // #f38ba8 (red)
        info_fg: Color::Rgb(137, 180, 250),  // #89b4fa (blue)
        dim_fg: Color::Rgb(108, 112, 134),   // #6c7086
    }
}

/// Light theme palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        list_bg: Color::Reset,
        list_fg: Color::Rgb(76, 79, 105),             // #4c4f69 (text)
        list_selected_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface1)
        list_selected_fg: Color::Rgb(76, 79, 105),
        list_dir_fg: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
        list_file_fg: Color::Rgb(76, 79, 105),
        list_meta_fg: Color::Rgb(108, 111, 133),      // #6c6f85 (subtext0)

        title_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)

        error_fg: Color::Rgb(210, 15, 57), // #d20f39 (red)
        info_fg: Color::Rgb(30, 102, 245),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides: [(&Option<String>, &mut Color); 11] = [
        (&custom.list_bg, &mut theme.list_bg),
        (&custom.list_fg, &mut theme.list_fg),
        (&custom.list_selected_bg, &mut theme.list_selected_bg),
        (&custom.list_selected_fg, &mut theme.list_selected_fg),
        (&custom.list_dir_fg, &mut theme.list_dir_fg),
        (&custom.list_file_fg, &mut theme.list_file_fg),
        (&custom.list_meta_fg, &mut theme.list_meta_fg),
        (&custom.title_fg, &mut theme.title_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
        (&custom.border_fg, &mut theme.border_fg),
    ];
    for (hex, slot) in overrides {
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
