//! Neon palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Type badges ───────────────────────────────────────────────────────

/// Badge color for a type name. The catalog serves French names; English
/// spellings are accepted too.
pub fn type_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "feu" | "fire" => Color::Rgb(240, 128, 48),
        "eau" | "water" => Color::Rgb(104, 144, 240),
        "plante" | "grass" => Color::Rgb(120, 200, 80),
        "électrik" | "electrik" | "electric" => Color::Rgb(248, 208, 48),
        "glace" | "ice" => Color::Rgb(152, 216, 216),
        "combat" | "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "sol" | "ground" => Color::Rgb(224, 192, 104),
        "vol" | "flying" => Color::Rgb(168, 144, 240),
        "psy" | "psychic" => Color::Rgb(248, 88, 136),
        "insecte" | "bug" => Color::Rgb(168, 184, 32),
        "roche" | "rock" => Color::Rgb(184, 160, 56),
        "spectre" | "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "ténèbres" | "tenebres" | "dark" => Color::Rgb(112, 88, 72),
        "acier" | "steel" => Color::Rgb(184, 184, 208),
        "fée" | "fee" | "fairy" => Color::Rgb(238, 153, 172),
        _ => DIM_WHITE,
    }
}

/// Gauge color by how full a stat bar is.
pub fn stat_color(percent: u8) -> Color {
    match percent {
        0..=29 => ERROR_RED,
        30..=59 => ELECTRIC_YELLOW,
        _ => SUCCESS_GREEN,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_in_either_language_share_a_color() {
        assert_eq!(type_color("Feu"), type_color("fire"));
        assert_eq!(type_color("Plante"), type_color("Grass"));
        assert_eq!(type_color("???"), DIM_WHITE);
    }

    #[test]
    fn stat_color_bands() {
        assert_eq!(stat_color(10), ERROR_RED);
        assert_eq!(stat_color(45), ELECTRIC_YELLOW);
        assert_eq!(stat_color(90), SUCCESS_GREEN);
    }
}
