// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, help, and style helpers used by TUI rendering.
fn stack_main_panes_vertically(area: Rect) -> bool {
    area.width < 80
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Editor,
    Diagram,
}

impl Focus {
    fn cycle(self) -> Self {
        match self {
            Self::Editor => Self::Diagram,
            Self::Diagram => Self::Editor,
        }
    }
}

fn view_title(label: &str, key: &str, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn clamp_positive_i32_to_u16(value: i32) -> u16 {
    value.max(0).min(u16::MAX as i32) as u16
}

fn pad_text(mut text: Text<'static>, left_pad: usize, top_pad: usize) -> Text<'static> {
    if left_pad == 0 && top_pad == 0 {
        return text;
    }

    if left_pad > 0 {
        let pad = " ".repeat(left_pad);
        for line in &mut text.lines {
            line.spans.insert(0, Span::raw(pad.clone()));
        }
    }

    if top_pad > 0 {
        let blank = Line::from(String::new());
        let mut lines = Vec::with_capacity(top_pad + text.lines.len());
        for _ in 0..top_pad {
            lines.push(blank.clone());
        }
        lines.extend(text.lines);
        text.lines = lines;
    }

    text
}

/// Splits the rendered diagram into spans so label cells pick up the
/// clickable-label style while everything else keeps the base style.
fn styled_diagram_text(
    text: &str,
    labels: &LabelIndex,
    base: Style,
    label_style: Style,
) -> Text<'static> {
    let mut spans_by_pos: Vec<(usize, usize, usize)> = labels
        .values()
        .map(|span| (span.y, span.x0, span.x1))
        .collect();
    spans_by_pos.sort_unstable();

    let mut lines = Vec::new();
    for (y, line) in text.lines().enumerate() {
        let ranges: Vec<(usize, usize)> = spans_by_pos
            .iter()
            .filter(|(row, _, _)| *row == y)
            .map(|(_, x0, x1)| (*x0, *x1))
            .collect();
        if ranges.is_empty() {
            lines.push(Line::styled(line.to_owned(), base));
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut spans = Vec::new();
        let mut cursor = 0usize;
        for (x0, x1) in ranges {
            let start = x0.min(chars.len());
            let end = (x1 + 1).min(chars.len());
            if start > cursor {
                spans.push(Span::styled(
                    chars[cursor..start].iter().collect::<String>(),
                    base,
                ));
            }
            if end > start {
                spans.push(Span::styled(
                    chars[start..end].iter().collect::<String>(),
                    label_style,
                ));
            }
            cursor = end.max(cursor);
        }
        if cursor < chars.len() {
            spans.push(Span::styled(
                chars[cursor..].iter().collect::<String>(),
                base,
            ));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match app.focus {
        Focus::Editor => {
            push_footer_entry(&mut spans, "TYPE", "text");
            push_footer_entry(&mut spans, "DIAGRAM", "Esc");
            push_footer_entry(&mut spans, "QUIT", "Ctrl-C");
        }
        Focus::Diagram => {
            push_footer_entry(&mut spans, "EDITOR", "i");
            push_footer_entry(&mut spans, "PAN", "←↓↑→");
            push_footer_entry(&mut spans, "CENTER", "z");
            push_footer_entry(&mut spans, "URL", "u");
            push_footer_entry(&mut spans, "JSON", "j");
            push_footer_entry(&mut spans, "SVG", "s");
            push_footer_entry(&mut spans, "PNG", "p");
            push_footer_entry(&mut spans, "COPY", "c");
            push_footer_entry(&mut spans, "EDIT", "e");
            push_footer_entry(&mut spans, "HELP", "?");
            push_footer_entry(&mut spans, "QUIT", "q");
        }
    }

    append_toast_spans(&mut spans, toast_suffix);
    Line::from(spans)
}

fn url_footer_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let input = app.url_input.as_deref().unwrap_or_default();
    let mut spans = vec![
        Span::styled(
            "URL> ".to_owned(),
            Style::default()
                .fg(FOOTER_KEY_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(input.to_owned()),
        Span::raw("   "),
    ];

    push_footer_entry_with_separator(&mut spans, "Fetch", "Enter", " | ");
    push_footer_entry_with_separator(&mut spans, "Cancel", "Esc", " | ");

    append_toast_spans(&mut spans, toast_suffix);
    Line::from(spans)
}

fn append_toast_spans(spans: &mut Vec<Span<'static>>, toast_suffix: &str) {
    let toast_message = toast_suffix
        .strip_prefix(" | ")
        .unwrap_or(toast_suffix)
        .trim();
    if !toast_message.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::styled(
            "Toast:".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
        spans.push(Span::raw(toast_message.to_owned()));
    }
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(82, 84, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let dim_style = Style::default().fg(Color::DarkGray);

    let key_col_width = ["↑/↓, PgUp/PgDn, Home/End", "Enter/Backspace/Delete"]
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();

    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(help_kv(
        "Tab",
        "Cycle focus between panes",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Ctrl-C", "Quit", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Editor ---", header_style)));
    lines.push(help_kv(
        "Type",
        "Edit JSON; diagram re-renders live",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "Enter/Backspace/Delete",
        "Edit line structure",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "↑/↓, PgUp/PgDn, Home/End",
        "Move cursor",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "Esc",
        "Focus diagram pane",
        key_col_width,
        key_style,
    ));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Diagram ---", header_style)));
    lines.push(help_kv("i", "Focus editor pane", key_col_width, key_style));
    lines.push(help_kv("↑↓←→", "Pan diagram by 1", key_col_width, key_style));
    lines.push(help_kv(
        "PgUp/PgDn",
        "Pan diagram by 10",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("z", "Center diagram", key_col_width, key_style));
    lines.push(help_kv(
        "u",
        "Load document JSON from a URL",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("j", "Export flow.json", key_col_width, key_style));
    lines.push(help_kv("s", "Export diagram.svg", key_col_width, key_style));
    lines.push(help_kv("p", "Export diagram.png", key_col_width, key_style));
    lines.push(help_kv(
        "c",
        "Copy diagram image to clipboard",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "e",
        "Edit document in $EDITOR",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("q", "Quit", key_col_width, key_style));
    lines.push(help_kv(
        "Click label",
        "Open the node's image popup",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Wheel", "Pan diagram", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- URL prompt ---", header_style)));
    lines.push(help_kv("Type", "Edit the URL", key_col_width, key_style));
    lines.push(help_kv(
        "Enter",
        "Fetch and replace the buffer",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Esc", "Cancel", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Help ---", header_style)));
    lines.push(help_kv(
        "↑/↓, PgUp/PgDn, Home/End",
        "Scroll help",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Esc/?", "Close help", key_col_width, key_style));
    lines.push(Line::from(vec![
        Span::styled("Note: ", dim_style),
        Span::styled("image popups", key_style),
        Span::styled(" close on any mouse click.", dim_style),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(Style::default().fg(app.theme.accent_style().fg.unwrap_or(Color::LightGreen)))
        .title_style(
            Style::default()
                .fg(app.theme.accent_style().fg.unwrap_or(Color::LightGreen))
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    app.help_viewport_height = inner.height;
    let max_scroll = lines
        .len()
        .saturating_sub(inner.height.max(1) as usize)
        .min(u16::MAX as usize) as u16;
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .style(Style::default())
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_with_separator(spans, label, value, " | ");
}

fn push_footer_entry_with_separator(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    separator: &'static str,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            separator.to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
