// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

const DEFAULT_ACCENT: Color = Color::LightGreen;
const DEFAULT_ERROR: Color = Color::Red;

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn accent_color(&self) -> Color {
        match &self.palette {
            Some(palette) => palette.accent,
            None => DEFAULT_ACCENT,
        }
    }

    fn error_color(&self) -> Color {
        match &self.palette {
            Some(palette) => palette.error,
            None => DEFAULT_ERROR,
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.accent_color())
        } else {
            self.base_style()
        }
    }

    pub(crate) fn accent_style(&self) -> Style {
        self.base_style().fg(self.accent_color())
    }

    pub(crate) fn label_style(&self) -> Style {
        self.base_style()
            .fg(self.accent_color())
            .add_modifier(Modifier::UNDERLINED)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.error_color())
    }

    pub(crate) fn dim_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::DIM)
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    accent: Color,
    error: Color,
}

impl TuiPalette {
    const CSV_LEN: usize = 4;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg,accent,error), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        Ok(Self {
            fg: parse_palette_color(parts[0])?,
            bg: parse_palette_color(parts[1])?,
            accent: parse_palette_color(parts[2])?,
            error: parse_palette_color(parts[3])?,
        })
    }
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    let (name, value) = match env::var("PROTEUS_TUI_PALETTE") {
        Ok(value) => ("PROTEUS_TUI_PALETTE", value),
        Err(env::VarError::NotPresent) => match env::var("PROTEUS_PALETTE") {
            Ok(value) => ("PROTEUS_PALETTE", value),
            Err(env::VarError::NotPresent) => return Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: "PROTEUS_PALETTE".to_string(),
                    value: "<non-unicode>".to_string(),
                });
            }
        },
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: "PROTEUS_TUI_PALETTE".to_string(),
                value: "<non-unicode>".to_string(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
        name: name.to_string(),
        value: format!("{trimmed} ({error})"),
    })?;

    Ok(Some(parsed))
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Ok(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use super::{parse_palette_color, TuiPalette, TuiTheme};
    use ratatui::style::{Color, Style};

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = TuiPalette::parse_csv("#111111,#222222,0xffaa00,ff0000").expect("palette");

        assert_eq!(palette.fg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette.bg, Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(palette.accent, Color::Rgb(0xff, 0xaa, 0x00));
        assert_eq!(palette.error, Color::Rgb(0xff, 0x00, 0x00));
    }

    #[test]
    fn palette_override_rejects_wrong_arity() {
        let err = TuiPalette::parse_csv("#111111,#222222").unwrap_err();
        assert!(err.contains("expected 4"));
    }

    #[test]
    fn palette_color_rejects_short_hex() {
        let err = parse_palette_color("#fff").unwrap_err();
        assert!(err.contains("expected #RRGGBB"));
    }

    #[test]
    fn default_theme_leaves_terminal_colors_alone() {
        let theme = TuiTheme::default();
        assert_eq!(theme.base_style(), Style::default());
        assert_eq!(theme.panel_border_style(false), Style::default());
        assert_eq!(
            theme.panel_border_style(true),
            Style::default().fg(Color::LightGreen)
        );
    }
}
