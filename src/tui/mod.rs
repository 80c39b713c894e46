// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Provides the interactive TUI shell (ratatui + crossterm): a JSON source
//! pane, a live-rendered diagram pane, the exporters, URL loading, and the
//! per-node image popup.

use std::{
    env,
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    process::Command,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;

use crate::export::{export_json, export_png, export_svg, rasterize_svg_to_png};
use crate::format::mermaid::{document_to_mermaid, parse_flowchart};
use crate::model::{pretty_json_value, Document, DocumentNode, NodeId};
use crate::render::{LabelIndex, RenderArtifact, RenderOutcome, RenderPipeline, RenderedDiagram};

mod editor;
mod overlay;
mod theme;

use editor::EditorBuffer;
use overlay::ImageOverlay;
use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "🅿 🆁 🅾 🆃 🅴 🆄 🆂 ";
const CENTER_BORDER_PADDING: i32 = 1;
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_secs(2);
const PAGE_PAN_STEP: i32 = 10;
const WHEEL_PAN_STEP: i32 = 3;
const URL_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Placeholder shown in the diagram pane while the buffer is not valid JSON.
const INVALID_JSON_PLACEHOLDER: &str = "❌ Invalid JSON";

/// Runs the interactive terminal UI until the user quits.
///
/// `initial_source` seeds the editor buffer; when absent the built-in sample
/// document is loaded. Exports land in `export_dir`.
pub fn run(initial_source: Option<String>, export_dir: PathBuf) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(initial_source, export_dir, theme);

    while !app.should_quit {
        app.adopt_completed_renders();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    if let Some(action) = app.take_external_action() {
                        let result =
                            terminal.run_external_action(|| app.execute_external_action(action));
                        if let Err(err) = result {
                            app.set_toast(format!("External action failed: {err}"));
                        }
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        app.schedule_render_if_dirty();
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let direction = if stack_main_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(main_area);
    draw_editor_pane(frame, app, panes[0]);
    draw_diagram_pane(frame, app, panes[1]);

    let toast_snapshot = app.toast.as_ref().map(|toast| (toast.message.clone(), toast.expires_at));
    let toast_suffix = match toast_snapshot {
        Some((message, expires_at)) if expires_at > Instant::now() => format!(" | {message}"),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    if app.url_input.is_some() {
        let input_len = app.url_input.as_deref().unwrap_or_default().chars().count() as u16;
        let status = Paragraph::new(url_footer_line(app, &toast_suffix));
        frame.render_widget(status, status_area);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, status_area);
        let cursor_x = status_area
            .x
            .saturating_add(5)
            .saturating_add(input_len)
            .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
        frame.set_cursor_position((cursor_x, status_area.y));
    } else {
        let status = Paragraph::new(footer_help_line(app, &toast_suffix));
        frame.render_widget(status, status_area);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, status_area);
    }

    if app.show_help {
        render_help(frame, app, main_area);
    }

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area, &app.theme);
    }
}

fn draw_editor_pane(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Editor", "i", None))
        .border_style(app.theme.panel_border_style(focused))
        .style(app.theme.base_style());
    let inner = block.inner(area);
    app.editor_area = Some(inner);

    let gutter_width = editor_gutter_width(app.editor.lines().len());
    let text_width = (inner.width as usize).saturating_sub(gutter_width).max(1);
    app.editor.scroll_to_cursor(inner.height as usize, text_width);
    let (scroll_row, scroll_col) = app.editor.scroll();

    let mut lines = Vec::with_capacity(inner.height as usize);
    for (offset, line) in app
        .editor
        .lines()
        .iter()
        .skip(scroll_row)
        .take(inner.height as usize)
        .enumerate()
    {
        let number = scroll_row + offset + 1;
        let content: String = line.chars().skip(scroll_col).take(text_width).collect();
        lines.push(Line::from(vec![
            Span::styled(
                format!("{number:>width$} ", width = gutter_width.saturating_sub(1)),
                app.theme.dim_style(),
            ),
            Span::styled(content, app.theme.base_style()),
        ]));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);

    if focused && app.url_input.is_none() && !app.show_help && app.overlay.is_none() {
        let (row, col) = app.editor.cursor();
        let x = inner.x + gutter_width as u16 + (col - scroll_col) as u16;
        let y = inner.y + (row - scroll_row) as u16;
        if x < inner.x.saturating_add(inner.width) && y < inner.y.saturating_add(inner.height) {
            frame.set_cursor_position((x, y));
        }
    }
}

fn draw_diagram_pane(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Diagram;
    let node_count = match &app.view {
        DiagramView::Ready(diagram) => Some(format!("({} nodes)", diagram.labels.len())),
        _ => None,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Diagram", "Esc", node_count.as_deref()))
        .border_style(app.theme.panel_border_style(focused))
        .style(app.theme.base_style());
    let inner = block.inner(area);
    app.diagram_area = Some(inner);

    if matches!(app.view, DiagramView::Ready(_)) {
        app.center_diagram_if_needed(inner.width as usize, inner.height as usize);
    }
    let (scroll_x, scroll_y, left_pad, top_pad) = app.diagram_render_offsets();

    let (content, scroll, wrap) = match &app.view {
        DiagramView::Ready(diagram) => {
            let mut text = styled_diagram_text(
                &diagram.text,
                &diagram.labels,
                app.theme.base_style(),
                app.theme.label_style(),
            );
            if left_pad > 0 || top_pad > 0 {
                text = pad_text(text, left_pad, top_pad);
            }
            (text, Some((scroll_y, scroll_x)), false)
        }
        DiagramView::Invalid => (
            Text::from(Line::styled(
                INVALID_JSON_PLACEHOLDER.to_owned(),
                app.theme.error_style(),
            )),
            None,
            false,
        ),
        DiagramView::Failed(message) => (
            Text::from(vec![
                Line::styled("Diagram render error:".to_owned(), app.theme.error_style()),
                Line::styled(message.clone(), app.theme.error_style()),
            ]),
            None,
            true,
        ),
        DiagramView::Empty => (Text::default(), None, false),
    };

    let mut paragraph = Paragraph::new(content).block(block);
    if let Some(scroll) = scroll {
        paragraph = paragraph.scroll(scroll);
    }
    if wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, area);
}

fn editor_gutter_width(line_count: usize) -> usize {
    line_count.to_string().len().max(2) + 1
}

/// One transient footer notice.
#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExternalAction {
    EditDocument,
}

/// What the diagram pane currently shows.
#[derive(Debug, Clone, Default)]
enum DiagramView {
    #[default]
    Empty,
    Invalid,
    Failed(String),
    Ready(RenderedDiagram),
}

struct App {
    editor: EditorBuffer,
    pipeline: RenderPipeline,
    scheduled_rev: u64,
    adopted_seq: u64,
    view: DiagramView,
    export_dir: PathBuf,
    theme: TuiTheme,
    focus: Focus,
    pan_x: i32,
    pan_y: i32,
    center_diagram_on_next_draw: bool,
    editor_area: Option<Rect>,
    diagram_area: Option<Rect>,
    overlay: Option<ImageOverlay>,
    url_input: Option<String>,
    show_help: bool,
    help_scroll: u16,
    help_viewport_height: u16,
    toast: Option<Toast>,
    pending_external_action: Option<ExternalAction>,
    should_quit: bool,
}

impl App {
    fn new(initial_source: Option<String>, export_dir: PathBuf, theme: TuiTheme) -> Self {
        let source = initial_source.unwrap_or_else(|| Document::sample().to_pretty_json());
        let editor = EditorBuffer::new(&source);
        let pipeline = RenderPipeline::new();
        let scheduled_rev = editor.rev();
        pipeline.schedule(editor.text());

        Self {
            editor,
            pipeline,
            scheduled_rev,
            adopted_seq: 0,
            view: DiagramView::Empty,
            export_dir,
            theme,
            focus: Focus::Editor,
            pan_x: 0,
            pan_y: 0,
            center_diagram_on_next_draw: true,
            editor_area: None,
            diagram_area: None,
            overlay: None,
            url_input: None,
            show_help: false,
            help_scroll: 0,
            help_viewport_height: 0,
            toast: None,
            pending_external_action: None,
            should_quit: false,
        }
    }

    /// Re-renders when the buffer changed since the last scheduled pass.
    /// Every schedule supersedes any in-flight one in the pipeline.
    fn schedule_render_if_dirty(&mut self) {
        if self.editor.rev() != self.scheduled_rev {
            self.scheduled_rev = self.editor.rev();
            self.pipeline.schedule(self.editor.text());
        }
    }

    fn adopt_completed_renders(&mut self) {
        while let Some(artifact) = self.pipeline.take_completed() {
            self.adopt_artifact(artifact);
        }
    }

    fn adopt_artifact(&mut self, artifact: RenderArtifact) {
        if artifact.seq < self.adopted_seq {
            return;
        }
        self.adopted_seq = artifact.seq;

        let was_ready = matches!(self.view, DiagramView::Ready(_));
        self.view = match artifact.outcome {
            RenderOutcome::Rendered(diagram) => DiagramView::Ready(diagram),
            RenderOutcome::InvalidJson => DiagramView::Invalid,
            RenderOutcome::Failed { message } => DiagramView::Failed(message),
        };

        // Keep the pan stable across re-renders of a live buffer; center only
        // when the diagram (re)appears.
        if matches!(self.view, DiagramView::Ready(_)) && !was_ready {
            self.pan_x = 0;
            self.pan_y = 0;
            self.center_diagram_on_next_draw = true;
        }
    }

    fn current_diagram(&self) -> Option<&RenderedDiagram> {
        match &self.view {
            DiagramView::Ready(diagram) => Some(diagram),
            _ => None,
        }
    }

    fn center_diagram_if_needed(&mut self, viewport_width: usize, viewport_height: usize) {
        if !self.center_diagram_on_next_draw {
            return;
        }
        if viewport_width == 0 || viewport_height == 0 {
            return;
        }
        let Some(diagram) = self.current_diagram() else {
            return;
        };

        let diagram_width =
            diagram.text.split('\n').map(|line| line.chars().count()).max().unwrap_or(0) as i32;
        let diagram_height = diagram.text.split('\n').count() as i32;
        let viewport_width = viewport_width as i32;
        let viewport_height = viewport_height as i32;

        let centered_pan_x = (diagram_width - viewport_width) / 2;
        let centered_pan_y = (diagram_height - viewport_height) / 2;
        let max_pan = -CENTER_BORDER_PADDING;
        // Never start clipped on the left/top; when full centering would do
        // that, align with a one-cell margin to the diagram border.
        self.pan_x = centered_pan_x.min(max_pan);
        self.pan_y = centered_pan_y.min(max_pan);
        self.center_diagram_on_next_draw = false;
    }

    fn diagram_render_offsets(&self) -> (u16, u16, usize, usize) {
        let scroll_x = clamp_positive_i32_to_u16(self.pan_x);
        let scroll_y = clamp_positive_i32_to_u16(self.pan_y);
        let left_pad = self.pan_x.saturating_neg().max(0) as usize;
        let top_pad = self.pan_y.saturating_neg().max(0) as usize;
        (scroll_x, scroll_y, left_pad, top_pad)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.should_quit = true;
            }
            return;
        }
        if self.overlay.is_some() {
            // The popup dismisses on a mouse click only; keys are swallowed
            // while it is up.
            return;
        }
        if self.url_input.is_some() {
            self.handle_url_key(key.code);
            return;
        }
        if self.show_help {
            self.handle_help_key(key.code);
            return;
        }

        match self.focus {
            Focus::Editor => self.handle_editor_key(key.code),
            Focus::Diagram => self.handle_diagram_key(key.code),
        }
    }

    fn handle_editor_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.focus = Focus::Diagram,
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            KeyCode::PageUp => {
                let page = self.editor_page_rows();
                self.editor.move_page_up(page);
            }
            KeyCode::PageDown => {
                let page = self.editor_page_rows();
                self.editor.move_page_down(page);
            }
            KeyCode::Tab => self.editor.insert_char('\t'),
            KeyCode::Char(ch) => self.editor.insert_char(ch),
            _ => {}
        }
    }

    fn handle_diagram_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            KeyCode::Char('i') => self.focus = Focus::Editor,
            KeyCode::Tab => self.focus = self.focus.cycle(),
            KeyCode::Left => self.pan_x -= 1,
            KeyCode::Right => self.pan_x += 1,
            KeyCode::Up => self.pan_y -= 1,
            KeyCode::Down => self.pan_y += 1,
            KeyCode::PageUp => self.pan_y -= PAGE_PAN_STEP,
            KeyCode::PageDown => self.pan_y += PAGE_PAN_STEP,
            KeyCode::Char('z') => self.center_diagram_on_next_draw = true,
            KeyCode::Char('u') => self.url_input = Some(String::new()),
            KeyCode::Char('j') => self.export_document_json(),
            KeyCode::Char('s') => self.export_diagram_svg(),
            KeyCode::Char('p') => self.export_diagram_png(),
            KeyCode::Char('c') => self.copy_diagram_image(),
            KeyCode::Char('e') => self.queue_edit_document(),
            _ => {}
        }
    }

    fn handle_url_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.url_input = None,
            KeyCode::Enter => self.submit_url(),
            KeyCode::Backspace => {
                if let Some(input) = self.url_input.as_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(input) = self.url_input.as_mut() {
                    input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
            KeyCode::Char('q') => {
                self.show_help = false;
                self.should_quit = true;
            }
            KeyCode::Up => self.help_scroll = self.help_scroll.saturating_sub(1),
            KeyCode::Down => self.help_scroll = self.help_scroll.saturating_add(1),
            KeyCode::PageUp => {
                self.help_scroll =
                    self.help_scroll.saturating_sub(self.help_viewport_height.max(1));
            }
            KeyCode::PageDown => {
                self.help_scroll =
                    self.help_scroll.saturating_add(self.help_viewport_height.max(1));
            }
            KeyCode::Home => self.help_scroll = 0,
            // Clamped to the real maximum during the next help draw.
            KeyCode::End => self.help_scroll = u16::MAX,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.overlay.is_some() {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.overlay = None;
            }
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            MouseEventKind::ScrollUp => self.handle_wheel(mouse.column, mouse.row, -WHEEL_PAN_STEP),
            MouseEventKind::ScrollDown => self.handle_wheel(mouse.column, mouse.row, WHEEL_PAN_STEP),
            _ => {}
        }
    }

    fn handle_wheel(&mut self, column: u16, row: u16, delta: i32) {
        if rect_contains(self.diagram_area, column, row) {
            self.pan_y += delta;
        } else if rect_contains(self.editor_area, column, row) {
            for _ in 0..delta.unsigned_abs() {
                if delta < 0 {
                    self.editor.move_up();
                } else {
                    self.editor.move_down();
                }
            }
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        if rect_contains(self.editor_area, column, row) {
            self.focus = Focus::Editor;
            if let Some(area) = self.editor_area {
                let (scroll_row, scroll_col) = self.editor.scroll();
                let gutter = editor_gutter_width(self.editor.lines().len());
                let row_idx = scroll_row + (row - area.y) as usize;
                let col_idx = scroll_col + ((column - area.x) as usize).saturating_sub(gutter);
                self.editor.move_cursor_to(row_idx, col_idx);
            }
            return;
        }

        if rect_contains(self.diagram_area, column, row) {
            self.focus = Focus::Diagram;
            if let Some(area) = self.diagram_area {
                let cell_x = i32::from(column - area.x) + self.pan_x;
                let cell_y = i32::from(row - area.y) + self.pan_y;
                if cell_x >= 0 && cell_y >= 0 {
                    self.handle_label_click(cell_y as usize, cell_x as usize);
                }
            }
        }
    }

    fn handle_label_click(&mut self, y: usize, x: usize) {
        let clicked = self.current_diagram().and_then(|diagram| {
            diagram
                .labels
                .iter()
                .find(|(_, span)| span.contains(y, x))
                .map(|(node_id, _)| node_id.clone())
        });
        if let Some(node_id) = clicked {
            self.open_image_for_node(&node_id);
        }
    }

    fn open_image_for_node(&mut self, node_id: &NodeId) {
        // The popup consults a fresh parse of the editor text, not the
        // snapshot that produced the render.
        let Ok(document) = Document::from_json(&self.editor.text()) else {
            self.set_toast("No image for this node");
            return;
        };
        let Some(node) = find_document_node_for_label(&document, node_id) else {
            self.set_toast("No image for this node");
            return;
        };
        let Some(image) = node.image.clone() else {
            self.set_toast("No image for this node");
            return;
        };
        let caption = node.preview.clone();

        match ImageOverlay::load(&image, caption) {
            Ok(overlay) => self.overlay = Some(overlay),
            Err(err) => {
                debug!(image = image.as_str(), error = %err, "image load failed");
                self.set_toast(format!("Image load failed: {err}"));
            }
        }
    }

    fn submit_url(&mut self) {
        let url = self.url_input.take().unwrap_or_default().trim().to_owned();
        if url.is_empty() {
            self.set_toast("Enter a JSON URL.");
            return;
        }

        match fetch_document_json(&url) {
            Ok(pretty) => {
                self.editor.set_text(&pretty);
                self.center_diagram_on_next_draw = true;
            }
            Err(err) => {
                debug!(url = url.as_str(), error = err.as_str(), "url load failed");
                self.set_toast("Invalid or inaccessible JSON URL.");
            }
        }
    }

    fn export_document_json(&mut self) {
        match export_json(&self.export_dir, &self.editor.text()) {
            Ok(path) => self.set_toast(format!("Wrote {}", path.display())),
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }

    fn export_diagram_svg(&mut self) {
        let Some(diagram) = self.current_diagram() else {
            self.set_toast("Render failed.");
            return;
        };
        let svg = diagram.svg.clone();
        match export_svg(&self.export_dir, &svg) {
            Ok(path) => self.set_toast(format!("Wrote {}", path.display())),
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }

    fn export_diagram_png(&mut self) {
        let Some(diagram) = self.current_diagram() else {
            self.set_toast("No diagram to download");
            return;
        };
        let svg = diagram.svg.clone();
        match export_png(&self.export_dir, &svg) {
            Ok(path) => self.set_toast(format!("Wrote {}", path.display())),
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }

    fn copy_diagram_image(&mut self) {
        let Some(diagram) = self.current_diagram() else {
            self.set_toast("Render failed.");
            return;
        };
        let svg = diagram.svg.clone();

        match rasterize_svg_to_png(&svg) {
            Ok(png) => match copy_image_to_clipboard(&png) {
                Ok(_backend) => self.set_toast("Copied!"),
                Err(_err) => self.set_toast("Failed to copy"),
            },
            Err(_err) => self.set_toast("Failed to copy"),
        }
    }

    fn queue_edit_document(&mut self) {
        self.pending_external_action = Some(ExternalAction::EditDocument);
    }

    fn take_external_action(&mut self) -> Option<ExternalAction> {
        self.pending_external_action.take()
    }

    fn execute_external_action(&mut self, action: ExternalAction) -> Result<(), String> {
        match action {
            ExternalAction::EditDocument => self.edit_document_in_editor(),
        }
    }

    fn edit_document_in_editor(&mut self) -> Result<(), String> {
        let original = self.editor.text();
        let temp_path = write_temp_document_file(&original)?;
        let editor_command = resolve_editor_command();

        let launch_result = launch_editor_command(&editor_command, &temp_path);
        let edited = fs::read_to_string(&temp_path).map_err(|err| {
            format!("failed reading edited document from {}: {err}", temp_path.display())
        });
        let _ = fs::remove_file(&temp_path);

        launch_result?;
        let edited = edited?;

        if edited == original {
            self.set_toast("Edit cancelled (no changes)");
            return Ok(());
        }

        self.editor.set_text(&edited);
        self.center_diagram_on_next_draw = true;
        Ok(())
    }

    fn editor_page_rows(&self) -> usize {
        self.editor_area.map(|area| area.height as usize).unwrap_or(10).max(1)
    }

    #[cfg(test)]
    fn wait_for_render(&mut self, timeout: Duration) -> bool {
        match self.pipeline.wait_for_latest(timeout) {
            Some(artifact) => {
                self.adopt_artifact(artifact);
                true
            }
            None => false,
        }
    }
}

fn rect_contains(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|area| area.contains(Position::new(column, row)))
}

/// Resolves a rendered label back to the first document node whose text,
/// trimmed, matches it. Later nodes sharing the same text are shadowed.
fn find_document_node_for_label<'doc>(
    document: &'doc Document,
    node_id: &NodeId,
) -> Option<&'doc DocumentNode> {
    let mermaid = document_to_mermaid(document);
    let ast = parse_flowchart(&mermaid).ok()?;
    let label = ast.node(node_id)?.label().trim().to_owned();
    document.nodes.iter().find(|node| node.text.trim() == label)
}

fn fetch_document_json(url: &str) -> Result<String, String> {
    let response =
        ureq::get(url).timeout(URL_FETCH_TIMEOUT).call().map_err(|err| err.to_string())?;
    let value: serde_json::Value = response.into_json().map_err(|err| err.to_string())?;
    Ok(pretty_json_value(&value))
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }

    fn run_external_action(
        &mut self,
        action: impl FnOnce() -> Result<(), String>,
    ) -> Result<(), String> {
        let _suspend = TerminalSuspendGuard::new(&mut self.terminal)
            .map_err(|err| format!("terminal suspend failed: {err}"))?;
        action()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

struct TerminalSuspendGuard<'a> {
    terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>,
}

impl<'a> TerminalSuspendGuard<'a> {
    fn new(terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<Self> {
        terminal.show_cursor()?;
        disable_raw_mode()?;

        if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
        {
            let _ = enable_raw_mode();
            let _ = execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture);
            let _ = terminal.hide_cursor();
            let _ = ratatui::backend::Backend::flush(terminal.backend_mut());
            return Err(err);
        }

        ratatui::backend::Backend::flush(terminal.backend_mut())?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSuspendGuard<'_> {
    fn drop(&mut self) {
        let _ = enable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture);
        let _ = self.terminal.clear();
        let _ = self.terminal.hide_cursor();
        let _ = ratatui::backend::Backend::flush(self.terminal.backend_mut());
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
}

fn copy_image_to_clipboard(png: &[u8]) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(png))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(payload: &[u8]) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(payload);
    format!("\x1b]52;c;{encoded}\x1b\\")
}

fn resolve_editor_command() -> String {
    env::var("VISUAL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env::var("EDITOR").ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_owned())
}

fn write_temp_document_file(content: &str) -> Result<PathBuf, String> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    let mut temp_path = env::temp_dir();
    temp_path.push(format!("proteus-document-{ts}.json"));
    fs::write(&temp_path, content).map_err(|err| {
        format!("failed to create temporary document file {}: {err}", temp_path.display())
    })?;
    Ok(temp_path)
}

fn launch_editor_command(command: &str, path: &Path) -> Result<(), String> {
    let path_text = path.to_string_lossy();
    if path_text.starts_with('-') {
        return Err("invalid editor temp path".to_owned());
    }

    let status = Command::new("sh")
        .arg("-lc")
        .arg(format!("{command} {}", shell_single_quote(path_text.as_ref())))
        .status()
        .map_err(|err| format!("failed to run editor command `{command}`: {err}"))?;
    if !status.success() {
        return Err(format!("editor command failed with status {status}"));
    }
    Ok(())
}

fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

// Extracted panel/header/footer/help rendering helpers.
include!("chrome.rs");
