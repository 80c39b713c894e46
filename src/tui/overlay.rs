// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{error::Error, fmt, fs, io, io::Read, time::Duration};

use image::{DynamicImage, GenericImageView};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::TuiTheme;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024;
/// Popup takes at most this share of each frame dimension.
const POPUP_PERCENT: u16 = 90;

/// Modal image popup opened by clicking a node label in the diagram pane.
///
/// Cells render two pixels each with the upper-half-block glyph, foreground
/// for the top pixel and background for the bottom one.
pub(crate) struct ImageOverlay {
    image: DynamicImage,
    caption: Option<String>,
}

impl ImageOverlay {
    /// Loads `reference` as an image. `http(s)` references are fetched over
    /// the network, anything else is treated as a filesystem path.
    pub(crate) fn load(reference: &str, caption: Option<String>) -> Result<Self, OverlayError> {
        let bytes = if reference.starts_with("http://") || reference.starts_with("https://") {
            fetch_image_bytes(reference)?
        } else {
            fs::read(reference).map_err(|source| OverlayError::Read {
                path: reference.to_string(),
                source,
            })?
        };

        let image = image::load_from_memory(&bytes).map_err(|error| OverlayError::Decode {
            message: error.to_string(),
        })?;

        Ok(Self { image, caption })
    }

    pub(crate) fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &TuiTheme) {
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(theme.dim_style()),
            area,
        );

        let caption_rows: u16 = if self.caption.is_some() { 1 } else { 0 };
        let max_cols = (area.width * POPUP_PERCENT / 100).saturating_sub(2).max(1);
        let max_rows = (area.height * POPUP_PERCENT / 100)
            .saturating_sub(2 + caption_rows)
            .max(1);

        let mut lines = half_block_lines(&self.image, max_cols, max_rows);
        let image_cols = lines
            .iter()
            .map(|line| line.spans.len())
            .max()
            .unwrap_or(1) as u16;
        let image_rows = lines.len() as u16;

        if let Some(caption) = &self.caption {
            lines.push(Line::styled(caption.clone(), theme.dim_style()).centered());
        }

        let popup = super::centered_fixed_rect(image_cols + 2, image_rows + caption_rows + 2, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.accent_style())
            .style(theme.base_style());
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), popup);
    }
}

impl fmt::Debug for ImageOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageOverlay")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("caption", &self.caption)
            .finish()
    }
}

fn fetch_image_bytes(url: &str) -> Result<Vec<u8>, OverlayError> {
    let response = ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .map_err(|error| OverlayError::Fetch {
            url: url.to_string(),
            message: error.to_string(),
        })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|error| OverlayError::Fetch {
            url: url.to_string(),
            message: error.to_string(),
        })?;
    Ok(bytes)
}

/// Downscales the image to fit `max_cols` x `max_rows` terminal cells and
/// renders it as half-block lines, two pixel rows per cell.
fn half_block_lines(image: &DynamicImage, max_cols: u16, max_rows: u16) -> Vec<Line<'static>> {
    let max_px_w = u32::from(max_cols.max(1));
    let max_px_h = u32::from(max_rows.max(1)) * 2;

    let scaled = if image.width() > max_px_w || image.height() > max_px_h {
        image.thumbnail(max_px_w, max_px_h)
    } else {
        image.clone()
    };
    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut lines = Vec::with_capacity(((height + 1) / 2) as usize);
    for cell_row in 0..(height + 1) / 2 {
        let top_y = cell_row * 2;
        let bottom_y = top_y + 1;
        let mut spans = Vec::with_capacity(width as usize);
        for x in 0..width {
            let top = opaque_color(rgba.get_pixel(x, top_y).0);
            let bottom = if bottom_y < height {
                opaque_color(rgba.get_pixel(x, bottom_y).0)
            } else {
                None
            };
            spans.push(match (top, bottom) {
                (Some(top), Some(bottom)) => {
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                }
                (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
                (None, Some(bottom)) => Span::styled("▄", Style::default().fg(bottom)),
                (None, None) => Span::raw(" "),
            });
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn opaque_color(rgba: [u8; 4]) -> Option<Color> {
    if rgba[3] < 128 {
        return None;
    }
    Some(Color::Rgb(rgba[0], rgba[1], rgba[2]))
}

#[derive(Debug)]
pub(crate) enum OverlayError {
    Fetch { url: String, message: String },
    Read { path: String, source: io::Error },
    Decode { message: String },
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { url, message } => write!(f, "failed to fetch {url}: {message}"),
            Self::Read { path, source } => write!(f, "failed to read {path}: {source}"),
            Self::Decode { message } => write!(f, "failed to decode image: {message}"),
        }
    }
}

impl Error for OverlayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}
