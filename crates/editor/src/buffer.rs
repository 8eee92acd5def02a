//! Multi-cursor editing surface over [`Lines`] and [`Cursors`].
//!
//! Every public editing method is one command: all the `Lines` operations it
//! records are undone and redone together, and the cursors are put back where
//! they were before (undo) or after (redo) the command.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use teditor_buffer::{Cursors, Excursion, Lines, Position};
use teditor_config::EditorSettings;

/// Name shown for buffers that are not backed by a file.
pub const UNTITLED: &str = "Untitled";

/// Line ending used when writing the buffer back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum LineEnding {
    #[default]
    LF, // Unix \n
    CRLF, // Windows \r\n
}

/// Undo/redo unit: the operations one command recorded.
#[derive(Debug, Clone)]
struct EditGroup {
    /// Number of `Lines` operations
    ops: usize,
    /// Cursors before the command
    before: Excursion,
    /// Cursors after the command
    after: Excursion,
}

/// An open text buffer with its cursors and file association.
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Lines,
    cursors: Cursors,
    settings: EditorSettings,
    /// File path (if exists)
    file_path: Option<PathBuf>,
    line_ending: LineEnding,
    /// Modified flag
    modified: bool,
    undo_groups: VecDeque<EditGroup>,
    redo_groups: Vec<EditGroup>,
    /// Operations recorded by the command in progress
    pending_ops: usize,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            lines: Lines::with_history_limit(settings.history_limit),
            cursors: Cursors::new(),
            settings,
            file_path: None,
            line_ending: LineEnding::LF,
            modified: false,
            undo_groups: VecDeque::new(),
            redo_groups: Vec::new(),
            pending_ops: 0,
        }
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str, settings: EditorSettings) -> Self {
        let mut buffer = Self::new(settings);
        buffer.load(text);
        buffer
    }

    /// Create an empty buffer that will be saved to `path`.
    pub fn with_path<P: AsRef<Path>>(path: P, settings: EditorSettings) -> Self {
        let mut buffer = Self::new(settings);
        buffer.file_path = Some(path.as_ref().to_path_buf());
        buffer
    }

    /// Load a file. Its content is not recorded in the history.
    pub fn open<P: AsRef<Path>>(path: P, settings: EditorSettings) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let mut buffer = Self::with_path(path, settings);
        if contents.contains("\r\n") {
            buffer.line_ending = LineEnding::CRLF;
            buffer.load(&contents.replace("\r\n", "\n"));
        } else {
            buffer.load(&contents);
        }
        log::info!("Opened {} ({} lines)", path.display(), buffer.lines.len());
        Ok(buffer)
    }

    /// Replace the content, resetting cursors and history.
    pub fn load(&mut self, text: &str) {
        self.lines.load(text);
        self.cursors.reset();
        self.undo_groups.clear();
        self.redo_groups.clear();
        self.modified = false;
    }

    /// Save to the associated file.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            bail!("No file path set");
        };
        self.save_to(path)
    }

    /// Save to `path` and associate the buffer with it.
    pub fn save_to<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut contents = self.lines.to_string();
        if self.line_ending == LineEnding::CRLF {
            contents = contents.replace('\n', "\r\n");
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    pub fn cursors(&self) -> &Cursors {
        &self.cursors
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Whole content with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.to_string()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// File name for display, or [`UNTITLED`].
    pub fn name(&self) -> &str {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .unwrap_or(UNTITLED)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_groups.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_groups.is_empty()
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Insert `text` at every visible cursor, replacing an active region.
    pub fn insert(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.command(|buf| {
            if buf.cursors.is_region_active() {
                buf.delete_regions()?;
            }
            for i in 0..buf.cursors.count() {
                let Some(at) = buf.cursors.at(i) else {
                    continue;
                };
                let after = buf.insert_at(at, text)?;
                buf.cursors.set(i, after);
                buf.cursors.shift_after_insert(i, at, after);
            }
            Ok(())
        })
    }

    pub fn insert_newline(&mut self) -> Result<()> {
        self.insert("\n")
    }

    /// Insert `tab_size` spaces at every cursor.
    pub fn insert_tab(&mut self) -> Result<()> {
        let spaces = " ".repeat(self.settings.tab_size);
        self.insert(&spaces)
    }

    /// Delete the character before every cursor.
    ///
    /// At column 0 the line is joined onto the previous one; at the start of
    /// the buffer nothing happens. An active region is deleted instead.
    pub fn backspace(&mut self) -> Result<()> {
        self.command(|buf| {
            if buf.cursors.is_region_active() && !buf.delete_regions()?.is_empty() {
                return Ok(());
            }
            for i in 0..buf.cursors.count() {
                let Some(at) = buf.cursors.at(i) else {
                    continue;
                };
                let Some(prev) = buf.previous_position(at) else {
                    continue;
                };
                buf.remove_span(prev, at)?;
                buf.cursors.set(i, prev);
                buf.cursors.shift_after_delete(i, prev, at);
            }
            Ok(())
        })
    }

    /// Delete the character under every cursor.
    ///
    /// At the end of a line the next line is joined onto it; at the end of
    /// the buffer nothing happens. An active region is deleted instead.
    pub fn delete_forward(&mut self) -> Result<()> {
        self.command(|buf| {
            if buf.cursors.is_region_active() && !buf.delete_regions()?.is_empty() {
                return Ok(());
            }
            for i in 0..buf.cursors.count() {
                let Some(at) = buf.cursors.at(i) else {
                    continue;
                };
                let Some(next) = buf.next_position(at) else {
                    continue;
                };
                buf.remove_span(at, next)?;
                buf.cursors.shift_after_delete(i, at, next);
            }
            Ok(())
        })
    }

    /// Delete the region of every cursor and return the removed texts.
    pub fn kill_region(&mut self) -> Result<Vec<String>> {
        self.command(Self::delete_regions)
    }

    /// Text of the region of every cursor, without changing anything.
    pub fn region_text(&self) -> Vec<String> {
        self.cursors
            .region_spans()
            .into_iter()
            .map(|(start, end)| self.lines.region_text(start, end))
            .collect()
    }

    /// Undo the last command. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.undo_groups.pop_back() else {
            return false;
        };
        for _ in 0..group.ops {
            assert!(self.lines.undo(), "undo group larger than the line history");
        }
        self.cursors.clear_region();
        self.cursors.restore_excursion(&group.before);
        self.redo_groups.push(group);
        self.modified = self.is_content_modified();
        true
    }

    /// Redo the last undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(group) = self.redo_groups.pop() else {
            return false;
        };
        for _ in 0..group.ops {
            assert!(self.lines.redo(), "redo group larger than the line history");
        }
        self.cursors.clear_region();
        self.cursors.restore_excursion(&group.after);
        self.undo_groups.push_back(group);
        self.modified = self.is_content_modified();
        true
    }

    /// Run one editing command, grouping the operations it records.
    fn command<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let before = self.cursors.save_excursion();
        self.pending_ops = 0;
        let result = f(self);
        self.cursors.hide_duplicates();

        let ops = std::mem::take(&mut self.pending_ops);
        if ops > 0 {
            self.modified = true;
            self.redo_groups.clear();
            self.undo_groups.push_back(EditGroup {
                ops,
                before,
                after: self.cursors.save_excursion(),
            });
            self.trim_groups();
        }
        result
    }

    /// Drop the oldest groups once `Lines` no longer holds all their operations.
    fn trim_groups(&mut self) {
        let available = self.lines.history().undo_len();
        let mut total: usize = self.undo_groups.iter().map(|group| group.ops).sum();
        while total > available {
            let Some(group) = self.undo_groups.pop_front() else {
                break;
            };
            total -= group.ops;
            log::debug!("Dropped undo step of {} operations", group.ops);
        }
    }

    fn insert_at(&mut self, pos: Position, text: &str) -> Result<Position> {
        let after = self.lines.insert(pos, text)?;
        if !text.is_empty() {
            self.pending_ops += 1;
        }
        Ok(after)
    }

    fn remove_span(&mut self, start: Position, end: Position) -> Result<String> {
        let removed = self.lines.remove_range(start, end)?;
        if !removed.is_empty() {
            self.pending_ops += 1;
        }
        Ok(removed)
    }

    fn delete_regions(&mut self) -> Result<Vec<String>> {
        let mut killed = Vec::new();
        for i in 0..self.cursors.count() {
            let (Some(pos), Some(anchor)) = (self.cursors.at(i), self.cursors.anchor(i)) else {
                continue;
            };
            let (start, end) = anchor.ordered(pos);
            // Equal endpoints would remove the character under the cursor
            if start == end {
                continue;
            }
            killed.push(self.remove_span(start, end)?);
            self.cursors.set(i, start);
            self.cursors.shift_after_delete(i, start, end);
        }
        self.cursors.clear_region();
        Ok(killed)
    }

    fn previous_position(&self, pos: Position) -> Option<Position> {
        if pos.x > 0 {
            Some(Position::new(pos.x - 1, pos.y))
        } else if pos.y > 0 {
            Some(Position::new(self.lines.line_len(pos.y - 1), pos.y - 1))
        } else {
            None
        }
    }

    fn next_position(&self, pos: Position) -> Option<Position> {
        if pos.x < self.lines.line_len(pos.y) {
            Some(Position::new(pos.x + 1, pos.y))
        } else if pos.y + 1 < self.lines.len() {
            Some(Position::new(0, pos.y + 1))
        } else {
            None
        }
    }

    /// Check if buffer content differs from file on disk
    fn is_content_modified(&self) -> bool {
        // If no file path, use current modified flag
        let Some(path) = &self.file_path else {
            return true;
        };

        match std::fs::read_to_string(path) {
            Ok(file_content) => {
                let buffer_content = match self.line_ending {
                    LineEnding::LF => self.text(),
                    LineEnding::CRLF => self.text().replace('\n', "\r\n"),
                };
                buffer_content != file_content
            }
            // Deleted or unreadable file
            Err(_) => true,
        }
    }

    // ========================================================================
    // Cursors and region
    // ========================================================================

    pub fn move_left(&mut self) {
        self.cursors.left(&self.lines);
    }

    pub fn move_right(&mut self) {
        self.cursors.right(&self.lines);
    }

    pub fn move_up(&mut self) {
        self.cursors.up(&self.lines);
    }

    pub fn move_down(&mut self) {
        self.cursors.down(&self.lines);
    }

    pub fn move_to_line_start(&mut self) {
        self.cursors.home();
    }

    pub fn move_to_line_end(&mut self) {
        self.cursors.line_end(&self.lines);
    }

    pub fn move_to_buffer_start(&mut self) {
        self.cursors.buffer_start();
    }

    pub fn move_to_buffer_end(&mut self) {
        self.cursors.buffer_end(&self.lines);
    }

    pub fn next_word(&mut self) {
        self.cursors.next_word(&self.lines, &self.settings.word_chars);
    }

    pub fn previous_word(&mut self) {
        self.cursors.previous_word(&self.lines, &self.settings.word_chars);
    }

    pub fn next_paragraph(&mut self) {
        self.cursors.next_para(&self.lines);
    }

    pub fn previous_paragraph(&mut self) {
        self.cursors.previous_para(&self.lines);
    }

    /// Page down in a view `view_height` rows tall.
    pub fn page_down(&mut self, view_height: usize) {
        let rows = self.settings.page_rows(view_height);
        self.cursors.page_down(&self.lines, rows);
    }

    /// Page up in a view `view_height` rows tall.
    pub fn page_up(&mut self, view_height: usize) {
        let rows = self.settings.page_rows(view_height);
        self.cursors.page_up(rows);
    }

    /// Add a cursor one line below the last cursor.
    pub fn add_cursor_below(&mut self) -> bool {
        let Some(last) = self.cursors.positions().max() else {
            return false;
        };
        let y = last.y + 1;
        if y >= self.lines.len() {
            return false;
        }
        let x = last.x.min(self.lines.line_len(y));
        self.cursors.add_back(Position::new(x, y))
    }

    /// Add a cursor one line above the first cursor.
    pub fn add_cursor_above(&mut self) -> bool {
        let Some(first) = self.cursors.positions().min() else {
            return false;
        };
        if first.y == 0 {
            return false;
        }
        let y = first.y - 1;
        let x = first.x.min(self.lines.line_len(y));
        self.cursors.add_front(Position::new(x, y))
    }

    /// Anchor a region at every cursor.
    pub fn start_region(&mut self) {
        self.cursors.start_region();
    }

    /// Drop the region and every cursor but the first.
    pub fn cancel(&mut self) {
        self.cursors.clear_region();
        self.cursors.clear_all_but_first();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pos(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    fn buffer(text: &str) -> Buffer {
        Buffer::from_text(text, EditorSettings::default())
    }

    fn contents(buffer: &Buffer) -> Vec<String> {
        buffer.lines().iter().map(|line| line.to_string()).collect()
    }

    fn cursors(buffer: &Buffer) -> Vec<Position> {
        buffer.cursors().positions().collect()
    }

    #[test]
    fn test_insert_at_every_cursor() {
        let mut buf = buffer("* Hello\nTesting123");
        assert!(buf.add_cursor_below());
        buf.insert("T").unwrap();

        assert_eq!(contents(&buf), ["T* Hello", "TTesting123"]);
        assert_eq!(cursors(&buf), [pos(1, 0), pos(1, 1)]);
        assert!(buf.is_modified());
    }

    #[test]
    fn test_undo_restores_cursors() {
        let mut buf = buffer("* Hello\nTesting123");
        buf.add_cursor_below();
        buf.insert("T").unwrap();
        buf.insert_newline().unwrap();
        assert_eq!(contents(&buf), ["T", "* Hello", "T", "Testing123"]);
        assert_eq!(cursors(&buf), [pos(0, 1), pos(0, 3)]);

        // One step per command, however many cursors it touched
        assert!(buf.undo());
        assert_eq!(contents(&buf), ["T* Hello", "TTesting123"]);
        assert_eq!(cursors(&buf), [pos(1, 0), pos(1, 1)]);
        assert!(buf.undo());
        assert_eq!(contents(&buf), ["* Hello", "Testing123"]);
        assert_eq!(cursors(&buf), [pos(0, 0), pos(0, 1)]);
        assert!(!buf.undo());

        assert!(buf.redo());
        assert!(buf.redo());
        assert_eq!(contents(&buf), ["T", "* Hello", "T", "Testing123"]);
        assert_eq!(cursors(&buf), [pos(0, 1), pos(0, 3)]);
        assert!(!buf.redo());
    }

    #[test]
    fn test_backspace() {
        let mut buf = buffer("ab\ncd");
        buf.move_down();
        buf.backspace().unwrap();
        assert_eq!(contents(&buf), ["abcd"]);
        assert_eq!(cursors(&buf), [pos(2, 0)]);

        buf.move_to_buffer_start();
        buf.backspace().unwrap();
        assert_eq!(contents(&buf), ["abcd"]);

        assert!(buf.undo());
        assert_eq!(contents(&buf), ["ab", "cd"]);
        assert!(!buf.undo());
    }

    #[test]
    fn test_backspace_merges_adjacent_cursors() {
        let mut buf = buffer("abc");
        buf.move_right();
        buf.cursors.add_back(pos(2, 0));
        buf.backspace().unwrap();
        assert_eq!(contents(&buf), ["c"]);
        assert_eq!(cursors(&buf), [pos(0, 0)]);
    }

    #[test]
    fn test_delete_forward() {
        let mut buf = buffer("ab\ncd");
        buf.move_to_line_end();
        buf.delete_forward().unwrap();
        assert_eq!(contents(&buf), ["abcd"]);
        assert_eq!(cursors(&buf), [pos(2, 0)]);

        // End of buffer: nothing deleted, nothing to undo
        buf.move_to_buffer_end();
        buf.delete_forward().unwrap();
        assert_eq!(contents(&buf), ["abcd"]);
        assert!(buf.undo());
        assert!(!buf.undo());
    }

    #[test]
    fn test_kill_region() {
        let mut buf = buffer("Hello World\nsecond line");
        buf.add_cursor_below();
        buf.start_region();
        buf.next_word();
        assert_eq!(buf.region_text(), ["Hello", "second"]);

        let killed = buf.kill_region().unwrap();
        assert_eq!(killed, ["Hello", "second"]);
        assert_eq!(contents(&buf), [" World", " line"]);
        assert_eq!(cursors(&buf), [pos(0, 0), pos(0, 1)]);
        assert!(!buf.cursors().is_region_active());

        assert!(buf.undo());
        assert_eq!(contents(&buf), ["Hello World", "second line"]);
    }

    #[test]
    fn test_insert_replaces_active_region() {
        let mut buf = buffer("one two three");
        buf.next_word();
        buf.start_region();
        buf.next_word();
        buf.insert("2").unwrap();
        assert_eq!(contents(&buf), ["one2 three"]);

        // Region replacement and insertion undo together
        assert!(buf.undo());
        assert_eq!(contents(&buf), ["one two three"]);
        assert_eq!(cursors(&buf), [pos(7, 0)]);
    }

    #[test]
    fn test_backspace_deletes_active_region() {
        let mut buf = buffer("abcdef");
        buf.move_right();
        buf.start_region();
        buf.move_right();
        buf.move_right();
        buf.backspace().unwrap();
        assert_eq!(contents(&buf), ["adef"]);
        assert_eq!(cursors(&buf), [pos(1, 0)]);
    }

    #[test]
    fn test_tab_inserts_spaces() {
        let mut buf = buffer("x");
        buf.insert_tab().unwrap();
        assert_eq!(buf.text(), "    x");
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut buf = buffer("");
        buf.insert("a").unwrap();
        buf.insert("b").unwrap();
        assert!(buf.undo());
        assert!(buf.can_redo());
        buf.insert("c").unwrap();
        assert!(!buf.can_redo());
        assert_eq!(buf.text(), "ac");
    }

    #[test]
    fn test_history_limit_drops_oldest_commands() {
        let settings = EditorSettings {
            history_limit: 3,
            ..Default::default()
        };
        let mut buf = Buffer::from_text("", settings);
        for ch in ["a", "b", "c", "d", "e"] {
            buf.insert(ch).unwrap();
        }
        assert!(buf.undo());
        assert!(buf.undo());
        assert!(buf.undo());
        assert!(!buf.undo());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    #[should_panic(expected = "undo group larger than the line history")]
    fn test_undo_out_of_sync_with_history_panics() {
        let mut buf = buffer("abc");
        buf.insert("x").unwrap();
        if let Some(group) = buf.undo_groups.back_mut() {
            group.ops += 1;
        }
        buf.undo();
    }

    #[test]
    #[should_panic(expected = "redo group larger than the line history")]
    fn test_redo_out_of_sync_with_history_panics() {
        let mut buf = buffer("abc");
        buf.insert("x").unwrap();
        assert!(buf.undo());
        if let Some(group) = buf.redo_groups.last_mut() {
            group.ops += 1;
        }
        buf.redo();
    }

    #[test]
    fn test_add_cursor_above_and_below() {
        let mut buf = buffer("long line\nab\nlong again");
        buf.move_to_line_end();
        assert!(buf.add_cursor_below());
        assert!(buf.add_cursor_below());
        assert!(!buf.add_cursor_below());
        assert_eq!(cursors(&buf), [pos(9, 0), pos(2, 1), pos(2, 2)]);
        assert!(!buf.add_cursor_above());

        buf.cancel();
        assert_eq!(cursors(&buf), [pos(9, 0)]);
        buf.move_to_buffer_end();
        assert!(buf.add_cursor_above());
        assert_eq!(cursors(&buf), [pos(2, 1), pos(10, 2)]);
    }

    #[test]
    fn test_page_motion_uses_page_jump() {
        let mut buf = buffer(&"row\n".repeat(100));
        buf.page_down(40);
        assert_eq!(cursors(&buf), [pos(0, 30)]);
        buf.page_up(20);
        assert_eq!(cursors(&buf), [pos(0, 15)]);
    }

    #[test]
    fn test_word_chars_from_settings() {
        let settings = EditorSettings {
            word_chars: "az".to_string(),
            ..Default::default()
        };
        let mut buf = Buffer::from_text("az-b", settings);
        buf.next_word();
        assert_eq!(cursors(&buf), [pos(2, 0)]);
    }

    #[test]
    fn test_open_and_save() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond").unwrap();

        let mut buf = Buffer::open(file.path(), EditorSettings::default()).unwrap();
        assert_eq!(contents(&buf), ["first", "second"]);
        assert_eq!(buf.line_ending(), LineEnding::CRLF);
        assert!(!buf.is_modified());
        assert!(!buf.can_undo());

        buf.insert("> ").unwrap();
        assert!(buf.is_modified());
        buf.save().unwrap();
        assert!(!buf.is_modified());
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "> first\r\nsecond"
        );

        // Undoing back to the saved content is a modification, redoing is not
        assert!(buf.undo());
        assert!(buf.is_modified());
        assert!(buf.redo());
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(Buffer::open(&missing, EditorSettings::default()).is_err());

        let mut buf = Buffer::with_path(&missing, EditorSettings::default());
        assert_eq!(buf.name(), "missing.txt");
        buf.insert("new").unwrap();
        buf.save().unwrap();
        assert_eq!(std::fs::read_to_string(&missing).unwrap(), "new");
    }

    #[test]
    fn test_save_without_path() {
        let mut buf = buffer("text");
        assert_eq!(buf.name(), UNTITLED);
        assert!(buf.save().is_err());
    }

    #[test]
    fn test_load_resets_everything() {
        let mut buf = buffer("abc");
        buf.add_cursor_below();
        buf.move_to_line_end();
        buf.insert("!").unwrap();
        buf.load("fresh\ncontent");
        assert_eq!(contents(&buf), ["fresh", "content"]);
        assert_eq!(cursors(&buf), [pos(0, 0)]);
        assert!(!buf.can_undo());
        assert!(!buf.is_modified());
    }
}
