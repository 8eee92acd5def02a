//! Ordered collection of lines with captured, undoable edits.
//!
//! `Lines` knows nothing about cursors or regions. It inserts and removes
//! text at explicit positions and records each captured mutation in its
//! [`History`] so that it can be undone and redone.

use std::fmt;
use std::ops::Index;

use anyhow::{bail, Result};

use crate::{History, Line, Operation, Position};

/// The buffer contents: always at least one (possibly empty) line.
#[derive(Debug, Clone)]
pub struct Lines {
    lines: Vec<Line>,
    history: History,
    /// Whether mutations are recorded for undo/redo
    capture: bool,
}

impl Lines {
    /// Create a buffer holding a single empty line.
    pub fn new() -> Self {
        Self::with_history(History::new())
    }

    /// Create an empty buffer keeping at most `limit` undo steps (0 = unbounded).
    pub fn with_history_limit(limit: usize) -> Self {
        Self::with_history(History::with_capacity(limit))
    }

    fn with_history(history: History) -> Self {
        Self {
            lines: vec![Line::new()],
            history,
            capture: true,
        }
    }

    /// Create a buffer from text, splitting it on `\n`.
    pub fn from_text(text: &str) -> Self {
        let mut lines = Self::new();
        lines.load(text);
        lines
    }

    /// Replace the whole content without recording history.
    ///
    /// Any existing undo/redo entries refer to the old content and are dropped.
    pub fn load(&mut self, text: &str) {
        self.lines = text.split('\n').map(Line::from).collect();
        self.history.clear();
        log::debug!("Loaded {} lines into buffer", self.lines.len());
    }

    /// Number of lines, never 0.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn line(&self, y: usize) -> Option<&Line> {
        self.lines.get(y)
    }

    /// Length of line `y`, 0 when there is no such line.
    pub fn line_len(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, Line::len)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Position just past the last character of the buffer.
    pub fn end_position(&self) -> Position {
        let y = self.lines.len() - 1;
        Position::new(self.lines[y].len(), y)
    }

    /// Whether `pos` is a valid caret location.
    pub fn contains(&self, pos: Position) -> bool {
        pos.y < self.lines.len() && pos.x <= self.lines[pos.y].len()
    }

    /// Start recording mutations.
    pub fn start_capture(&mut self) {
        self.capture = true;
    }

    /// Stop recording mutations.
    pub fn stop_capture(&mut self) {
        self.capture = false;
    }

    pub fn can_capture(&self) -> bool {
        self.capture
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_max_size(limit);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Insert `text` at `pos` and return the position right after it.
    pub fn insert(&mut self, pos: Position, text: &str) -> Result<Position> {
        self.check(pos, "insert")?;
        let after = self.apply_insert(pos, text);
        if self.capture && !text.is_empty() {
            self.history.push(Operation::Insert {
                before: pos,
                after,
                text: text.to_string(),
            });
        }
        Ok(after)
    }

    /// Insert a single character at `pos`.
    pub fn insert_char(&mut self, pos: Position, ch: char) -> Result<Position> {
        let mut buf = [0u8; 4];
        self.insert(pos, ch.encode_utf8(&mut buf))
    }

    /// Remove the character at `pos`.
    ///
    /// At the end of a line this joins the next line onto it. At the end of
    /// the buffer nothing is removed and an empty string is returned.
    pub fn remove(&mut self, pos: Position) -> Result<String> {
        self.remove_range(pos, pos)
    }

    /// Remove the text between `start` and `end` and return it.
    ///
    /// The endpoints may be given in either order. The span is half-open:
    /// the character at the larger endpoint stays. Equal endpoints remove the
    /// single character at that position, like [`Lines::remove`].
    pub fn remove_range(&mut self, start: Position, end: Position) -> Result<String> {
        self.check(start, "remove")?;
        self.check(end, "remove")?;

        let (small, big) = start.ordered(end);
        let big = if small == big {
            match self.next_position(small) {
                Some(next) => next,
                None => return Ok(String::new()),
            }
        } else {
            big
        };

        let removed = self.apply_delete(small, big);
        if self.capture && !removed.is_empty() {
            self.history.push(Operation::Delete {
                before: small,
                after: big,
                text: removed.clone(),
            });
        }
        Ok(removed)
    }

    /// Text between `start` and `end` (either order, half-open), unchanged.
    ///
    /// Returns an empty string when either endpoint is outside the buffer.
    pub fn region_text(&self, start: Position, end: Position) -> String {
        if !self.contains(start) || !self.contains(end) {
            return String::new();
        }
        let (start, end) = start.ordered(end);
        if start.y == end.y {
            return self.lines[start.y].slice(start.x, end.x).to_string();
        }

        let first = &self.lines[start.y];
        let mut out = first.slice(start.x, first.len()).to_string();
        for line in &self.lines[start.y + 1..end.y] {
            out.push('\n');
            out.push_str(line.as_str());
        }
        out.push('\n');
        out.push_str(self.lines[end.y].slice(0, end.x));
        out
    }

    /// Undo the most recent captured mutation.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(op) = self.history.undo() else {
            return false;
        };
        log::debug!("Undo: applying {} at {}", op.kind(), op.before());
        self.apply(&op);
        true
    }

    /// Redo the most recently undone mutation.
    ///
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(op) = self.history.redo() else {
            return false;
        };
        log::debug!("Redo: applying {} at {}", op.kind(), op.before());
        self.apply(&op);
        true
    }

    fn check(&self, pos: Position, what: &str) -> Result<()> {
        if !self.contains(pos) {
            log::warn!("Rejected {} at {}: outside of buffer", what, pos);
            bail!(
                "cannot {} at line {} column {}: buffer has {} lines{}",
                what,
                pos.y,
                pos.x,
                self.lines.len(),
                match self.lines.get(pos.y) {
                    Some(line) => format!(" and line {} has {} characters", pos.y, line.len()),
                    None => String::new(),
                }
            );
        }
        Ok(())
    }

    /// Position one character after `pos`, crossing line ends.
    fn next_position(&self, pos: Position) -> Option<Position> {
        if pos.x < self.lines[pos.y].len() {
            Some(Position::new(pos.x + 1, pos.y))
        } else if pos.y + 1 < self.lines.len() {
            Some(Position::new(0, pos.y + 1))
        } else {
            None
        }
    }

    /// Replay a history entry. History entries always fit the current content.
    fn apply(&mut self, op: &Operation) {
        assert!(
            self.contains(op.before()),
            "history out of sync: {} at {} is outside of buffer",
            op.kind(),
            op.before()
        );
        match op {
            Operation::Insert {
                before,
                after,
                text,
            } => {
                let end = self.apply_insert(*before, text);
                assert_eq!(end, *after, "history out of sync: insert ended early");
            }
            Operation::Delete {
                before,
                after,
                text,
            } => {
                assert!(
                    self.contains(*after),
                    "history out of sync: delete end {} is outside of buffer",
                    after
                );
                let removed = self.apply_delete(*before, *after);
                assert_eq!(&removed, text, "history out of sync: deleted text differs");
            }
        }
    }

    /// Insert `text` at a validated position, splitting lines at every `\n`.
    fn apply_insert(&mut self, pos: Position, text: &str) -> Position {
        let mut cur = pos;
        let mut segments = text.split('\n');

        if let Some(first) = segments.next() {
            self.lines[cur.y].insert(first, cur.x);
            cur.x += first.chars().count();
        }
        for segment in segments {
            // The remainder of the line moves to a new line below
            let rest = self.lines[cur.y].split_off(cur.x);
            self.lines.insert(cur.y + 1, rest);
            cur = Position::new(0, cur.y + 1);
            self.lines[cur.y].insert(segment, 0);
            cur.x = segment.chars().count();
        }
        cur
    }

    /// Delete `[start, end)` (validated, `start <= end`), walking backward
    /// from `end`.
    ///
    /// Characters are collected back to front and reversed at the end, so
    /// the result reads in buffer order.
    fn apply_delete(&mut self, start: Position, end: Position) -> String {
        let mut removed: Vec<char> = Vec::new();
        let mut cur = end;

        while cur > start {
            if cur.x == 0 {
                // Join this line onto the end of the previous one
                let tail = self.lines.remove(cur.y);
                let prev = &mut self.lines[cur.y - 1];
                let x = prev.len();
                prev.append(tail.as_str());
                removed.push('\n');
                cur = Position::new(x, cur.y - 1);
            } else {
                let from = if cur.y == start.y { start.x } else { 0 };
                let chunk = self.lines[cur.y].erase(from, cur.x - from);
                removed.extend(chunk.chars().rev());
                cur.x = from;
            }
        }

        removed.into_iter().rev().collect()
    }
}

impl Default for Lines {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for Lines {
    type Output = Line;

    fn index(&self, y: usize) -> &Line {
        &self.lines[y]
    }
}

impl<'a> IntoIterator for &'a Lines {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl fmt::Display for Lines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line.as_str())?;
        }
        Ok(())
    }
}
