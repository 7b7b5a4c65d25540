use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl ResolvedTheme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => dark(),
        ThemeVariant::Light => light(),
    }
}

fn hex(rgb: u32) -> Color {
    Color::from_u32(rgb)
}

fn dark() -> ResolvedTheme {
    ResolvedTheme {
        variant: ThemeVariant::Dark,
        foreground: hex(0xF8F8F2),
        foreground_dim: hex(0x75715E),
        border: hex(0x75715E),
        selection_bg: hex(0x49483E),
        primary: hex(0xE6DB74),
        success: hex(0xA6E22E),
        warning: hex(0xFD971F),
        error: hex(0xF92672),
        status_bar_bg: hex(0x49483E),
        status_bar_fg: hex(0xF8F8F2),
        spinner: hex(0x66D9EF),
    }
}

fn light() -> ResolvedTheme {
    ResolvedTheme {
        variant: ThemeVariant::Light,
        foreground: Color::Black,
        foreground_dim: Color::DarkGray,
        border: Color::Gray,
        selection_bg: Color::Gray,
        primary: Color::Blue,
        success: Color::Green,
        warning: Color::Yellow,
        error: Color::Red,
        status_bar_bg: Color::Blue,
        status_bar_fg: Color::White,
        spinner: Color::Magenta,
    }
}
