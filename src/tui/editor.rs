// Editing surface - the contract the session core needs, and a plain
// multi-line text widget implementing it
//
// The session controller only requires that an editing surface can be
// loaded with content for a language, report its contents, and signal
// edits. Syntax highlighting and completion are deliberately absent;
// `CodeArea` is a straightforward gap-free line buffer with a cursor.

use crate::session::Language;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Contract between the session core and whatever widget edits code
pub trait EditSurface {
    /// Replace the surface's content and language wholesale
    fn load(&mut self, content: &str, language: Language);
    /// Current text content
    fn contents(&self) -> String;
    /// Language the surface is editing
    fn language(&self) -> Language;
    /// Feed a key into the surface. Returns true when content changed.
    fn handle_key(&mut self, key: KeyEvent) -> bool;
}

const TAB_WIDTH: usize = 4;

/// Plain-text multi-line editor widget
pub struct CodeArea {
    lines: Vec<String>,
    /// Cursor position as (row, column) in characters
    row: usize,
    col: usize,
    /// First visible line, maintained by the renderer
    pub scroll: usize,
    language: Language,
}

impl CodeArea {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
            language: Language::default(),
        }
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Keep the cursor inside a viewport of the given height
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }

    fn current_line(&mut self) -> &mut String {
        &mut self.lines[self.row]
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    /// Byte offset of a character column in the current line
    fn byte_at(&self, row: usize, col: usize) -> usize {
        self.lines[row]
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.lines[row].len())
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.row, self.col);
        self.current_line().insert(at, c);
        self.col += 1;
    }

    fn insert_newline(&mut self) {
        let at = self.byte_at(self.row, self.col);
        let rest = self.current_line().split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    fn backspace(&mut self) -> bool {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_at(self.row, self.col);
            self.current_line().remove(at);
            true
        } else if self.row > 0 {
            // Join with the previous line
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
            true
        } else {
            false
        }
    }

    fn delete_forward(&mut self) -> bool {
        if self.col < self.line_len(self.row) {
            let at = self.byte_at(self.row, self.col);
            self.current_line().remove(at);
            true
        } else if self.row + 1 < self.lines.len() {
            let line = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&line);
            true
        } else {
            false
        }
    }

    fn move_cursor(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
            }
            KeyCode::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            KeyCode::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            KeyCode::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            KeyCode::Home => self.col = 0,
            KeyCode::End => self.col = self.line_len(self.row),
            _ => {}
        }
    }
}

impl Default for CodeArea {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSurface for CodeArea {
    fn load(&mut self, content: &str, language: Language) {
        self.lines = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        self.row = 0;
        self.col = 0;
        self.scroll = 0;
        self.language = language;
    }

    fn contents(&self) -> String {
        self.lines.join("\n")
    }

    fn language(&self) -> Language {
        self.language
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Control chords belong to the application, not the text
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Enter => {
                self.insert_newline();
                true
            }
            KeyCode::Tab => {
                for _ in 0..TAB_WIDTH {
                    self.insert_char(' ');
                }
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End => {
                self.move_cursor(key.code);
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(area: &mut CodeArea, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                area.handle_key(key(KeyCode::Enter));
            } else {
                area.handle_key(key(KeyCode::Char(c)));
            }
        }
    }

    #[test]
    fn load_and_contents_roundtrip() {
        let mut area = CodeArea::new();
        area.load("def solve():\n    pass", Language::Python);
        assert_eq!(area.contents(), "def solve():\n    pass");
        assert_eq!(area.language(), Language::Python);
        assert_eq!(area.cursor(), (0, 0));
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut area = CodeArea::new();
        type_str(&mut area, "print(1)");
        assert_eq!(area.contents(), "print(1)");
        assert_eq!(area.cursor(), (0, 8));
    }

    #[test]
    fn enter_splits_the_line() {
        let mut area = CodeArea::new();
        type_str(&mut area, "ab");
        area.handle_key(key(KeyCode::Left));
        area.handle_key(key(KeyCode::Enter));
        assert_eq!(area.contents(), "a\nb");
        assert_eq!(area.cursor(), (1, 0));
    }

    #[test]
    fn backspace_joins_lines_at_start() {
        let mut area = CodeArea::new();
        area.load("a\nb", Language::Python);
        area.handle_key(key(KeyCode::Down));
        area.handle_key(key(KeyCode::Backspace));
        assert_eq!(area.contents(), "ab");
    }

    #[test]
    fn control_chords_do_not_edit() {
        let mut area = CodeArea::new();
        let changed =
            area.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(!changed);
        assert_eq!(area.contents(), "");
    }

    #[test]
    fn cursor_handles_multibyte_content() {
        let mut area = CodeArea::new();
        type_str(&mut area, "héllo");
        area.handle_key(key(KeyCode::Backspace));
        assert_eq!(area.contents(), "héll");
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut area = CodeArea::new();
        area.load(&vec!["x"; 50].join("\n"), Language::Python);
        for _ in 0..30 {
            area.handle_key(key(KeyCode::Down));
        }
        area.scroll_to_cursor(10);
        assert_eq!(area.scroll, 21);

        for _ in 0..30 {
            area.handle_key(key(KeyCode::Up));
        }
        area.scroll_to_cursor(10);
        assert_eq!(area.scroll, 0);
    }
}
