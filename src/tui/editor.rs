// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Line-based edit buffer behind the source pane.
///
/// Columns are counted in characters, not bytes, so cursor movement stays
/// stable across multi-byte content. Every mutation bumps `rev`, which the
/// app compares against the last scheduled render to decide when to re-render.
#[derive(Debug, Clone)]
pub(crate) struct EditorBuffer {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll_row: usize,
    scroll_col: usize,
    rev: u64,
}

impl EditorBuffer {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            lines: split_lines(text),
            cursor_row: 0,
            cursor_col: 0,
            scroll_row: 0,
            scroll_col: 0,
            rev: 0,
        }
    }

    pub(crate) fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub(crate) fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll_row = 0;
        self.scroll_col = 0;
        self.rev += 1;
    }

    pub(crate) fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    pub(crate) fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub(crate) fn scroll(&self) -> (usize, usize) {
        (self.scroll_row, self.scroll_col)
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        if ch == '\t' {
            self.insert_char(' ');
            self.insert_char(' ');
            return;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = byte_index(line, self.cursor_col);
        line.insert(at, ch);
        self.cursor_col += 1;
        self.rev += 1;
    }

    pub(crate) fn insert_newline(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let at = byte_index(line, self.cursor_col);
        let rest = line.split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.rev += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let line = &mut self.lines[self.cursor_row];
            let at = byte_index(line, self.cursor_col);
            line.remove(at);
            self.rev += 1;
        } else if self.cursor_row > 0 {
            let tail = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = char_len(&self.lines[self.cursor_row]);
            self.lines[self.cursor_row].push_str(&tail);
            self.rev += 1;
        }
    }

    pub(crate) fn delete(&mut self) {
        let line_chars = char_len(&self.lines[self.cursor_row]);
        if self.cursor_col < line_chars {
            let line = &mut self.lines[self.cursor_row];
            let at = byte_index(line, self.cursor_col);
            line.remove(at);
            self.rev += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            let tail = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&tail);
            self.rev += 1;
        }
    }

    pub(crate) fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = char_len(&self.lines[self.cursor_row]);
        }
    }

    pub(crate) fn move_right(&mut self) {
        if self.cursor_col < char_len(&self.lines[self.cursor_row]) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub(crate) fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_col();
        } else {
            self.cursor_col = 0;
        }
    }

    pub(crate) fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_col();
        } else {
            self.cursor_col = char_len(&self.lines[self.cursor_row]);
        }
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor_col = char_len(&self.lines[self.cursor_row]);
    }

    pub(crate) fn move_page_up(&mut self, page: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(page.max(1));
        self.clamp_col();
    }

    pub(crate) fn move_page_down(&mut self, page: usize) {
        let last = self.lines.len() - 1;
        self.cursor_row = (self.cursor_row + page.max(1)).min(last);
        self.clamp_col();
    }

    /// Places the cursor at the given position, clamping to buffer bounds.
    /// Used when the source pane is clicked.
    pub(crate) fn move_cursor_to(&mut self, row: usize, col: usize) {
        self.cursor_row = row.min(self.lines.len() - 1);
        self.cursor_col = col.min(char_len(&self.lines[self.cursor_row]));
    }

    /// Adjusts scroll so the cursor falls inside a viewport of the given
    /// size. Called once per draw with the inner pane dimensions.
    pub(crate) fn scroll_to_cursor(&mut self, height: usize, width: usize) {
        if height > 0 {
            if self.cursor_row < self.scroll_row {
                self.scroll_row = self.cursor_row;
            } else if self.cursor_row >= self.scroll_row + height {
                self.scroll_row = self.cursor_row + 1 - height;
            }
        }
        if width > 0 {
            if self.cursor_col < self.scroll_col {
                self.scroll_col = self.cursor_col;
            } else if self.cursor_col >= self.scroll_col + width {
                self.scroll_col = self.cursor_col + 1 - width;
            }
        }
    }

    fn clamp_col(&mut self) {
        let max = char_len(&self.lines[self.cursor_row]);
        if self.cursor_col > max {
            self.cursor_col = max;
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = text.split('\n').map(|line| line.to_string()).collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}
