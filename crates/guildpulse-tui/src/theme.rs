//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const EMBER_RED: Color = Color::Rgb(255, 82, 82); // #ff5252
pub const SOFT_ROSE: Color = Color::Rgb(255, 138, 160); // #ff8aa0
pub const MINT_GREEN: Color = Color::Rgb(105, 240, 174); // #69f0ae
pub const AMBER: Color = Color::Rgb(255, 202, 40); // #ffca28
pub const SKY_BLUE: Color = Color::Rgb(100, 181, 246); // #64b5f6

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(197, 200, 209); // #c5c8d1
pub const BORDER_GRAY: Color = Color::Rgb(92, 99, 122); // #5c637a
pub const BG_DARK: Color = Color::Rgb(21, 22, 30); // #15161e

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(EMBER_RED).add_modifier(Modifier::BOLD)
}

/// Default panel border.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// A status value in its resting state.
pub fn status_value() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

/// A status value during the post-update pulse window.
pub fn status_value_pulse() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Status slot caption ("Members", "Online", ...).
pub fn status_caption() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Active choice in the range selector.
pub fn range_active() -> Style {
    Style::default().fg(EMBER_RED).add_modifier(Modifier::BOLD)
}

/// Inactive choice in the range selector.
pub fn range_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  r refresh").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD)
}
